// src/enrich/mod.rs

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::fetch::MetadataProvider;

/// Result of enriching one title: the provider's full answer, or a placeholder
/// that carries the title and why the lookup failed.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentRecord {
    Found(Map<String, Value>),
    Failed { title: String, reason: String },
}

impl EnrichmentRecord {
    pub fn is_failure(&self) -> bool {
        matches!(self, EnrichmentRecord::Failed { .. })
    }

    /// Flat field map as written to the enrichment dataset. Placeholders use the
    /// provider's own `Title` key so both shapes share that column.
    pub fn to_fields(&self) -> Map<String, Value> {
        match self {
            EnrichmentRecord::Found(fields) => fields.clone(),
            EnrichmentRecord::Failed { title, reason } => {
                let mut fields = Map::new();
                fields.insert("Title".into(), Value::String(title.clone()));
                fields.insert("Error".into(), Value::String(reason.clone()));
                fields
            }
        }
    }
}

/// One lookup per title, strictly in sequence. The output has exactly one
/// record per input title, in input order; a failed lookup never aborts the batch.
#[instrument(level = "info", skip(provider, titles))]
pub fn enrich_titles<'a, I>(provider: &dyn MetadataProvider, titles: I) -> Vec<EnrichmentRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let records: Vec<EnrichmentRecord> = titles
        .into_iter()
        .map(|title| match provider.lookup(title) {
            Ok(fields) => EnrichmentRecord::Found(fields),
            Err(err) => {
                warn!(title, error = %err, "lookup failed");
                EnrichmentRecord::Failed {
                    title: title.to_string(),
                    reason: err.to_string(),
                }
            }
        })
        .collect();

    let failed = records.iter().filter(|r| r.is_failure()).count();
    info!(total = records.len(), failed, "enrichment complete");
    records
}
