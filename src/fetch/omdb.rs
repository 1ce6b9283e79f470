// src/fetch/omdb.rs

use reqwest::blocking::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";

/// Why a single title could not be enriched. The `Display` text is what ends
/// up in the `Error` column of the enrichment dataset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Request failed (HTTP {0})")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    /// The provider answered but had nothing for this title.
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Looks up metadata for a film by its title.
pub trait MetadataProvider {
    fn lookup(&self, title: &str) -> Result<Map<String, Value>, LookupError>;
}

/// OMDb-style API: `GET <base>?t=<title>&apikey=<key>`, JSON object back,
/// `"Response": "False"` plus `"Error"` when nothing matched.
pub struct OmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(client: Client, base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }
}

impl MetadataProvider for OmdbClient {
    #[instrument(level = "debug", skip(self))]
    fn lookup(&self, title: &str) -> Result<Map<String, Value>, LookupError> {
        // errors are stripped of their URL: it carries the API key
        let resp = self
            .client
            .get(self.base_url.clone())
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .map_err(|e| LookupError::Decode(e.without_url().to_string()))?;
        let fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Err(LookupError::Decode(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };
        check_found(fields)
    }
}

/// Turn a provider-level "not found" into an error, pass anything else through.
pub fn check_found(fields: Map<String, Value>) -> Result<Map<String, Value>, LookupError> {
    if fields.get("Response").and_then(Value::as_str) == Some("False") {
        let reason = fields
            .get("Error")
            .and_then(Value::as_str)
            .unwrap_or("Not found");
        debug!(reason, "provider reported no match");
        return Err(LookupError::NotFound(reason.to_string()));
    }
    Ok(fields)
}
