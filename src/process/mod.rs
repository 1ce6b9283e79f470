// src/process/mod.rs
pub mod clean;
pub mod extract;
pub mod raw_table;
pub mod utils;

pub use clean::clean_film_table;
pub use extract::{extract_cast_table, extract_catalog_tables, CaptionMatch, RaggedRows};
pub use raw_table::{RawTable, TableLookup};
pub use utils::strip_references;
