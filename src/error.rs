// src/error.rs

use thiserror::Error;

/// Conditions that make the film catalog unusable and abort the whole run.
///
/// Everything else (missing cast table, failed lookups, store errors) is
/// absorbed where it happens and only shows up in logs and dataset contents.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The source page could not be fetched at all.
    #[error("failed to fetch source document: {0}")]
    Fetch(String),

    /// No caption matched the phase marker, or every matching table was empty.
    #[error("no film catalog tables found in source document")]
    NoCatalogTables,

    /// The unified schema has no column that looks like a film title.
    #[error("could not find any 'film' or 'title' column; found columns: {columns:?}")]
    NoTitleColumn { columns: Vec<String> },
}
