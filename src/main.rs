use std::{fs, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use filmscraper::{
    config::{log_filter, Cli, Command, Settings},
    event::{handle_object_event, ObjectEvent},
    fetch::{build_client, HttpSource, OmdbClient},
    store::LocalStore,
    Pipeline,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter(&log_level)))
        .unwrap_or_else(|_| EnvFilter::new("warn,filmscraper=info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // ─── 2) configuration ────────────────────────────────────────────
    let cli = Cli::parse();
    match cli.command.clone().unwrap_or(Command::Run) {
        Command::Run => run_etl(&cli.settings),
        Command::InspectEvent { event } => {
            let text = fs::read_to_string(&event)
                .with_context(|| format!("reading event {}", event.display()))?;
            let event: ObjectEvent =
                serde_json::from_str(&text).context("parsing object event")?;
            let store = LocalStore::new(&cli.settings.store_root)?;
            let content_type = handle_object_event(&store, &event)?;
            println!("{}", content_type);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_etl(settings: &Settings) -> Result<ExitCode> {
    info!(
        source = %settings.source_url,
        bucket = %settings.bucket,
        api_key = %settings.masked_api_key(),
        "starting film catalog ETL"
    );
    if settings.omdb_api_key.is_empty() {
        warn!("no OMDB_API_KEY set; every enrichment lookup will fail");
    }

    // ─── 3) collaborators ────────────────────────────────────────────
    let client = build_client()?;
    let source = HttpSource::new(client.clone());
    let omdb_url = Url::parse(&settings.omdb_url)
        .with_context(|| format!("parsing provider URL {}", settings.omdb_url))?;
    let provider = OmdbClient::new(client, omdb_url, settings.omdb_api_key.clone());
    let store = LocalStore::new(&settings.store_root)
        .with_context(|| format!("opening store at {}", settings.store_root.display()))?;

    // ─── 4) run ──────────────────────────────────────────────────────
    let outcome = Pipeline::new(&source, &provider, &store, settings).run();
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
