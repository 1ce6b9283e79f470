// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, instrument};
use url::Url;

pub mod omdb;

pub use omdb::{LookupError, MetadataProvider, OmdbClient};

/// Identifies the scraper to the sites it reads.
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; filmscraper/0.1)";

/// Anything that can hand back the HTML behind a URL.
pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Shared blocking client with our User-Agent.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .gzip(true)
        .build()
        .context("building HTTP client")
}

/// Fetches pages over HTTP, one blocking GET per call.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DocumentSource for HttpSource {
    #[instrument(level = "info", skip(self))]
    fn fetch(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).with_context(|| format!("parsing source URL {}", url))?;
        debug!("Fetching text from {}", url);
        let html = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .text()
            .with_context(|| format!("Reading text from {}", url))?;
        debug!(bytes = html.len(), "fetched document");
        Ok(html)
    }
}
