pub mod config;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod event;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod store;

pub use error::ScrapeError;
pub use pipeline::{Pipeline, RunOutcome};
