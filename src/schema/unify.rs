// src/schema/unify.rs

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use super::classify::ColumnClassifier;
use super::types::{canonical_alias, FilmTable, FILM};
use crate::error::ScrapeError;
use crate::process::raw_table::RawTable;
use crate::process::utils::{normalize_header, strip_cell};

/// Concatenate catalog tables into one table over the superset of their columns.
///
/// Headers are normalized first so cosmetic differences ("Film" vs "Film\u{a0}")
/// land in the same column. Columns keep first-seen order; a row from a table
/// lacking a column gets `None` there. This is a concatenation, not a join:
/// every input row yields exactly one output row.
pub fn align_tables(tables: &[RawTable]) -> FilmTable {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    // 1) discover the superset, remembering where each table's columns land
    let placements: Vec<Vec<Option<usize>>> = tables
        .iter()
        .map(|t| {
            let mut seen_here = Vec::with_capacity(t.headers.len());
            t.headers
                .iter()
                .map(|h| {
                    let name = normalize_header(h);
                    if seen_here.contains(&name) {
                        debug!(column = %name, "duplicate header within one table, keeping first");
                        return None;
                    }
                    seen_here.push(name.clone());
                    let next = columns.len();
                    let slot = *index.entry(name.clone()).or_insert(next);
                    if slot == next {
                        columns.push(name);
                    }
                    Some(slot)
                })
                .collect()
        })
        .collect();

    // 2) lay every row out on the superset, missing → None
    let width = columns.len();
    let mut rows = Vec::with_capacity(tables.iter().map(|t| t.rows.len()).sum());
    for (table, slots) in tables.iter().zip(&placements) {
        for raw in &table.rows {
            let mut row = vec![None; width];
            for (cell, slot) in raw.iter().zip(slots) {
                if let Some(slot) = slot {
                    row[*slot] = cell.clone();
                }
            }
            rows.push(row);
        }
    }

    FilmTable { columns, rows }
}

/// Merge scraped catalog tables into the canonical film schema.
///
/// Fails only when no column can be classified as the film title.
#[instrument(level = "info", skip(tables, classifier), fields(tables = tables.len()))]
pub fn unify_tables(
    tables: &[RawTable],
    classifier: &dyn ColumnClassifier,
) -> Result<FilmTable, ScrapeError> {
    let mut unified = align_tables(tables);

    // 3) title column → `film`
    let film_idx = classifier
        .classify(&unified.columns)
        .ok_or_else(|| ScrapeError::NoTitleColumn {
            columns: unified.columns.clone(),
        })?;
    debug!(column = %unified.columns[film_idx], "classified title column");
    unified.rename_column(film_idx, FILM);

    // 4) known header variants → canonical names
    let mut i = 0;
    while i < unified.columns.len() {
        let before = unified.columns.len();
        if let Some(canonical) = canonical_alias(&unified.columns[i]) {
            unified.rename_column(i, canonical);
        }
        // a merge may have removed a column at or before `i`
        if unified.columns.len() == before {
            i += 1;
        }
    }

    // 5) titles lose their reference markers ahead of general cleaning
    unified.map_column(FILM, |cell| strip_cell(cell.as_deref()));

    info!(
        films = unified.len(),
        columns = ?unified.columns,
        "unified catalog tables"
    );
    Ok(unified)
}
