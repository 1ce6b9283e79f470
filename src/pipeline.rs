// src/pipeline.rs

use chrono::Utc;
use scraper::Html;
use serde::Serialize;
use tracing::{error, info, info_span, warn};

use crate::config::Settings;
use crate::dataset::{Dataset, CAST_FILE, ENRICHMENT_FILE, MOVIES_FILE};
use crate::enrich::enrich_titles;
use crate::error::ScrapeError;
use crate::fetch::{DocumentSource, MetadataProvider};
use crate::process::{
    clean_film_table, extract_cast_table, extract_catalog_tables, CaptionMatch, TableLookup,
};
use crate::schema::{unify_tables, ColumnClassifier, FilmTable, TitleColumn};
use crate::store::{persist_dataset, ObjectStore, PersistOutcome};

/// Where a run is. `Failed` is only reachable from `ScrapeCatalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ScrapeCatalog,
    Clean,
    Enrich,
    ExtractCast,
    Persist,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::ScrapeCatalog => "scrape_catalog",
            Stage::Clean => "clean",
            Stage::Enrich => "enrich",
            Stage::ExtractCast => "extract_cast",
            Stage::Persist => "persist",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }
}

/// Counts gathered along a run, for the summary and for callers that care
/// about degraded results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub catalog_tables: usize,
    pub films_scraped: usize,
    pub films_cleaned: usize,
    pub enrichment_failures: usize,
    /// `None` when the page had no cast table.
    pub cast_rows: Option<usize>,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Structured result handed back to whoever invoked the run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(skip)]
    pub stage: Stage,
    #[serde(skip)]
    pub report: RunReport,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.stage == Stage::Done
    }
}

/// Everything the catalog scrape produces; the parsed page is kept for the
/// cast table.
struct Scraped {
    doc: Html,
    tables: usize,
    films: FilmTable,
}

/// One ETL run over its collaborators.
pub struct Pipeline<'a> {
    source: &'a dyn DocumentSource,
    provider: &'a dyn MetadataProvider,
    store: &'a dyn ObjectStore,
    classifier: &'a dyn ColumnClassifier,
    settings: &'a Settings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn DocumentSource,
        provider: &'a dyn MetadataProvider,
        store: &'a dyn ObjectStore,
        settings: &'a Settings,
    ) -> Self {
        Self {
            source,
            provider,
            store,
            classifier: &TitleColumn,
            settings,
        }
    }

    /// Swap the title-column strategy.
    pub fn with_classifier(mut self, classifier: &'a dyn ColumnClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn run(&self) -> RunOutcome {
        let started = Utc::now();
        let mut report = RunReport::default();

        // ─── 1) scrape catalog: the only stage that can fail the run ─────
        let scraped = {
            let _s = info_span!("stage", stage = Stage::ScrapeCatalog.as_str()).entered();
            match self.scrape_catalog() {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "scraping film catalog failed");
                    return RunOutcome {
                        status_code: 500,
                        body: format!("Failed to scrape film catalog: {}", e),
                        stage: Stage::Failed,
                        report,
                    };
                }
            }
        };
        report.catalog_tables = scraped.tables;
        report.films_scraped = scraped.films.len();

        // ─── 2) clean ────────────────────────────────────────────────────
        let cleaned = {
            let _s = info_span!("stage", stage = Stage::Clean.as_str()).entered();
            clean_film_table(&scraped.films)
        };
        report.films_cleaned = cleaned.len();
        if cleaned.is_empty() {
            warn!("no films left after cleaning");
        }

        // ─── 3) enrich, one lookup per cleaned film ──────────────────────
        let enriched = {
            let _s = info_span!("stage", stage = Stage::Enrich.as_str()).entered();
            enrich_titles(
                self.provider,
                cleaned.records().map(|r| r.title().unwrap_or_default()),
            )
        };
        report.enrichment_failures = enriched.iter().filter(|r| r.is_failure()).count();

        // ─── 4) cast table, independent of the catalog ───────────────────
        let cast = {
            let _s = info_span!("stage", stage = Stage::ExtractCast.as_str()).entered();
            extract_cast_table(&scraped.doc, &CaptionMatch::cast())
        };
        report.cast_rows = match &cast {
            TableLookup::Found(t) => Some(t.rows.len()),
            TableLookup::NotFound => None,
        };

        // ─── 5) persist each dataset on its own ──────────────────────────
        {
            let _s = info_span!("stage", stage = Stage::Persist.as_str()).entered();
            let datasets = [
                Dataset::from_films("movies", self.settings.dataset_key(MOVIES_FILE), &cleaned),
                Dataset::from_enrichment(
                    "enrichment",
                    self.settings.dataset_key(ENRICHMENT_FILE),
                    &enriched,
                ),
                Dataset::from_raw("cast", self.settings.dataset_key(CAST_FILE), &cast.into_table()),
            ];
            for ds in &datasets {
                match persist_dataset(self.store, &self.settings.bucket, ds) {
                    Ok(PersistOutcome::Written { .. }) => report.written.push(ds.key.clone()),
                    Ok(PersistOutcome::SkippedEmpty) => report.skipped.push(ds.key.clone()),
                    Err(e) => {
                        warn!(key = %ds.key, error = %e, "upload failed");
                        report.failed.push(ds.key.clone());
                    }
                }
            }
        }

        let elapsed_ms = (Utc::now() - started).num_milliseconds();
        let body = summarize(&report);
        info!(elapsed_ms, "{}", body);
        RunOutcome {
            status_code: 200,
            body,
            stage: Stage::Done,
            report,
        }
    }

    fn scrape_catalog(&self) -> Result<Scraped, ScrapeError> {
        let html = self
            .source
            .fetch(&self.settings.source_url)
            .map_err(|e| ScrapeError::Fetch(format!("{:#}", e)))?;
        let doc = Html::parse_document(&html);
        let tables = extract_catalog_tables(&doc, &CaptionMatch::catalog())?;
        let films = unify_tables(&tables, self.classifier)?;
        info!(films = films.len(), phases = tables.len(), "scraped films");
        Ok(Scraped {
            doc,
            tables: tables.len(),
            films,
        })
    }
}

fn summarize(report: &RunReport) -> String {
    let cast = match report.cast_rows {
        Some(n) => format!("{} cast rows", n),
        None => "no cast table".to_string(),
    };
    let mut body = format!(
        "ETL completed successfully: {} films ({} scraped from {} tables), {} enrichment failures, {}; {} datasets written, {} skipped",
        report.films_cleaned,
        report.films_scraped,
        report.catalog_tables,
        report.enrichment_failures,
        cast,
        report.written.len(),
        report.skipped.len(),
    );
    if !report.failed.is_empty() {
        body.push_str(&format!(", {} failed to upload", report.failed.len()));
    }
    body
}
