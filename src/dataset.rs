// src/dataset.rs

use anyhow::{Context, Result};
use serde_json::Value;

use crate::enrich::EnrichmentRecord;
use crate::process::RawTable;
use crate::schema::FilmTable;

pub const MOVIES_FILE: &str = "movies_cleaned.csv";
pub const ENRICHMENT_FILE: &str = "omdb_data.csv";
pub const CAST_FILE: &str = "characters_cast.csv";

/// A finished, named table ready to hand to an object store once.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    /// Object key the dataset is written under.
    pub key: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn from_films(name: &str, key: String, films: &FilmTable) -> Self {
        Self {
            name: name.to_string(),
            key,
            columns: films.columns.clone(),
            rows: films.rows.clone(),
        }
    }

    pub fn from_raw(name: &str, key: String, raw: &RawTable) -> Self {
        Self {
            name: name.to_string(),
            key,
            columns: raw.headers.clone(),
            rows: raw.rows.clone(),
        }
    }

    /// Columns are the union of every record's keys in first-seen order.
    /// Strings are kept verbatim, other JSON values as compact JSON text.
    pub fn from_enrichment(name: &str, key: String, records: &[EnrichmentRecord]) -> Self {
        let flat: Vec<_> = records.iter().map(EnrichmentRecord::to_fields).collect();

        let mut columns: Vec<String> = Vec::new();
        for fields in &flat {
            for k in fields.keys() {
                if !columns.contains(k) {
                    columns.push(k.clone());
                }
            }
        }

        let rows = flat
            .iter()
            .map(|fields| {
                columns
                    .iter()
                    .map(|c| fields.get(c).and_then(value_to_cell))
                    .collect()
            })
            .collect();

        Self {
            name: name.to_string(),
            key,
            columns,
            rows,
        }
    }

    /// No rows, or no columns to hold them.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Serialize as CSV: a header row, then one line per row, missing cells empty.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        wtr.write_record(&self.columns)
            .with_context(|| format!("writing CSV header for {}", self.name))?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
                .with_context(|| format!("writing CSV row for {}", self.name))?;
        }
        wtr.into_inner()
            .map_err(|e| anyhow::anyhow!("flushing CSV for {}: {}", self.name, e))
    }
}

fn value_to_cell(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Object key for `file` under `prefix` (`etl_output` → `etl_output/file`).
pub fn object_key(prefix: &str, file: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", prefix, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> serde_json::Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn films_to_csv() {
        let films = FilmTable {
            columns: vec!["film".into(), "release_date".into(), "Budget".into()],
            rows: vec![
                vec![Some("Iron Man".into()), Some("2008-05-02".into()), None],
                vec![Some("Thor, the film".into()), None, Some("$150M".into())],
            ],
        };
        let ds = Dataset::from_films("movies", object_key("etl_output", MOVIES_FILE), &films);
        assert_eq!(ds.key, "etl_output/movies_cleaned.csv");
        let csv = String::from_utf8(ds.to_csv().unwrap()).unwrap();
        assert_eq!(
            csv,
            "film,release_date,Budget\nIron Man,2008-05-02,\n\"Thor, the film\",,$150M\n"
        );
    }

    #[test]
    fn enrichment_columns_are_a_first_seen_union() {
        let records = vec![
            EnrichmentRecord::Found(obj(json!({
                "Title": "Iron Man",
                "Year": "2008",
                "Ratings": [{"Source": "IMDb", "Value": "7.9/10"}],
                "Response": "True"
            }))),
            EnrichmentRecord::Failed {
                title: "Blade".into(),
                reason: "Movie not found!".into(),
            },
        ];
        let ds = Dataset::from_enrichment("omdb", "k".into(), &records);
        assert_eq!(ds.columns, vec!["Title", "Year", "Ratings", "Response", "Error"]);
        assert_eq!(ds.rows[0][2].as_deref(), Some(r#"[{"Source":"IMDb","Value":"7.9/10"}]"#));
        assert_eq!(ds.rows[0][4], None);
        assert_eq!(
            ds.rows[1],
            vec![
                Some("Blade".to_string()),
                None,
                None,
                None,
                Some("Movie not found!".to_string())
            ]
        );
    }

    #[test]
    fn emptiness() {
        let empty_cast = Dataset::from_raw("cast", "k".into(), &RawTable::default());
        assert!(empty_cast.is_empty());
        let no_records = Dataset::from_enrichment("omdb", "k".into(), &[]);
        assert!(no_records.is_empty());
    }

    #[test]
    fn key_prefix_handling() {
        assert_eq!(object_key("", CAST_FILE), "characters_cast.csv");
        assert_eq!(object_key("out/", CAST_FILE), "out/characters_cast.csv");
    }
}
