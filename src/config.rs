// src/config.rs

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dataset::object_key;
use crate::fetch::omdb::DEFAULT_OMDB_URL;

pub const DEFAULT_SOURCE_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_Marvel_Cinematic_Universe_films";

/// Command-line interface; every setting can also come from the environment.
#[derive(Parser, Debug)]
#[command(name = "filmscraper", about = "Film catalog ETL: scrape, unify, enrich, persist")]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the full ETL (default)
    Run,
    /// Report the content type of the object named in an object-created event
    InspectEvent {
        /// Path to the event JSON
        #[arg(long)]
        event: PathBuf,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Page holding the film catalog tables
    #[arg(long, env = "SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Metadata provider API key
    #[arg(long, env = "OMDB_API_KEY", default_value = "", hide_env_values = true)]
    pub omdb_api_key: String,

    /// Metadata provider endpoint
    #[arg(long, env = "OMDB_URL", default_value = DEFAULT_OMDB_URL)]
    pub omdb_url: String,

    /// Bucket the datasets are written to
    #[arg(long, env = "S3_BUCKET_NAME", default_value = "films")]
    pub bucket: String,

    /// Directory backing the local object store
    #[arg(long, env = "STORE_ROOT", default_value = "store")]
    pub store_root: PathBuf,

    /// Key prefix for every dataset
    #[arg(long, env = "OUTPUT_PREFIX", default_value = "etl_output")]
    pub prefix: String,
}

impl Settings {
    /// The API key as it may appear in a log line.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.omdb_api_key)
    }

    pub fn dataset_key(&self, file: &str) -> String {
        object_key(&self.prefix, file)
    }
}

/// Filter directives for a `LOG_LEVEL` value. A bare level applies to this
/// crate only, dependencies stay at `warn`; anything with a target passes through.
pub fn log_filter(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        "warn,filmscraper=info".to_string()
    } else if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,filmscraper={}", level)
    }
}

/// Keep at most the first two characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let head: String = secret.chars().take(2).collect();
    format!("{}***", head)
}
