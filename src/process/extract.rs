// src/process/extract.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, trace, warn};

use super::raw_table::{RawTable, TableLookup};
use crate::error::ScrapeError;

/// Caption substring that marks a film catalog table ("Phase One", "Phase Four: ...").
pub const PHASE_MARKER: &str = "phase";
/// Caption of the recurring cast table.
pub const CAST_CAPTION: &str = "Recurring cast and characters";

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table.wikitable").unwrap());
static CAPTION_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("caption").unwrap());
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").unwrap());

/// Which tables a caller is interested in, judged by `<caption>` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionMatch {
    /// Caption contains the marker, ignoring case.
    Contains(String),
    /// Caption contains the marker verbatim.
    ContainsExact(String),
}

impl CaptionMatch {
    pub fn catalog() -> Self {
        CaptionMatch::Contains(PHASE_MARKER.to_string())
    }

    pub fn cast() -> Self {
        CaptionMatch::ContainsExact(CAST_CAPTION.to_string())
    }

    pub fn matches(&self, caption: &str) -> bool {
        match self {
            CaptionMatch::Contains(marker) => caption
                .to_lowercase()
                .contains(&marker.to_lowercase()),
            CaptionMatch::ContainsExact(marker) => caption.contains(marker.as_str()),
        }
    }
}

/// What to do with a row whose cell count differs from the header width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaggedRows {
    /// Keep only rows exactly as wide as the header.
    Drop,
    /// Pad short rows with `None` up to the header width.
    Pad,
}

/// All captioned `wikitable`s whose caption satisfies `caption`, in document order.
pub fn find_tables<'a>(
    doc: &'a Html,
    caption: &'a CaptionMatch,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.select(&TABLE_SEL).filter(move |table| {
        table
            .select(&CAPTION_SEL)
            .next()
            .map(|c| caption.matches(&c.text().collect::<String>()))
            .unwrap_or(false)
    })
}

/// Read one `<table>` into a [`RawTable`]: the first row's `th` cells are the
/// header, every later row is data, filtered or padded per `ragged`.
pub fn read_table(table: ElementRef<'_>, ragged: RaggedRows) -> RawTable {
    let mut rows = table.select(&ROW_SEL);

    let headers: Vec<String> = match rows.next() {
        Some(first) => first.select(&HEADER_CELL_SEL).map(header_text).collect(),
        None => return RawTable::default(),
    };
    let width = headers.len();

    let mut out = Vec::new();
    let mut dropped = 0usize;
    for tr in rows {
        let cells: Vec<String> = tr.select(&CELL_SEL).map(cell_text).collect();
        match ragged {
            RaggedRows::Drop => {
                if cells.len() == width {
                    out.push(cells.into_iter().map(Some).collect());
                } else {
                    trace!(expected = width, got = cells.len(), "dropping malformed row");
                    dropped += 1;
                }
            }
            RaggedRows::Pad => {
                if cells.len() > width {
                    trace!(expected = width, got = cells.len(), "truncating wide row");
                }
                out.push(
                    cells
                        .into_iter()
                        .map(Some)
                        .chain(std::iter::repeat(None))
                        .take(width)
                        .collect(),
                );
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = out.len(), "malformed rows dropped");
    }

    RawTable { headers, rows: out }
}

/// Scrape every film catalog table. Tables that yield no well-formed rows are
/// skipped; if nothing is left the catalog is unusable.
#[instrument(level = "info", skip(doc))]
pub fn extract_catalog_tables(
    doc: &Html,
    caption: &CaptionMatch,
) -> Result<Vec<RawTable>, ScrapeError> {
    let tables: Vec<RawTable> = find_tables(doc, caption)
        .map(|t| read_table(t, RaggedRows::Drop))
        .filter(|t| {
            if t.is_empty() {
                debug!(headers = ?t.headers, "catalog table has no usable rows");
            }
            !t.is_empty()
        })
        .collect();

    if tables.is_empty() {
        return Err(ScrapeError::NoCatalogTables);
    }

    info!(
        tables = tables.len(),
        rows = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        "scraped catalog tables"
    );
    Ok(tables)
}

/// Scrape the first table matching `caption`, tolerating short rows.
#[instrument(level = "info", skip(doc))]
pub fn extract_cast_table(doc: &Html, caption: &CaptionMatch) -> TableLookup {
    match find_tables(doc, caption).next() {
        Some(table) => {
            let raw = read_table(table, RaggedRows::Pad);
            info!(rows = raw.rows.len(), "scraped cast table");
            TableLookup::Found(raw)
        }
        None => {
            warn!("no cast table found");
            TableLookup::NotFound
        }
    }
}

/// Header text: every text node trimmed, glued together with nothing in between.
fn header_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

/// Data cell text: non-empty trimmed text nodes joined by single spaces,
/// so `<a>Jon</a> <a>Favreau</a>` reads as "Jon Favreau".
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(caption: &str, header: &[&str], rows: &[&[&str]]) -> String {
        let mut html = format!(
            r#"<table class="wikitable"><caption>{caption}</caption><tr>"#
        );
        for h in header {
            html.push_str(&format!("<th>{h}</th>"));
        }
        html.push_str("</tr>");
        for row in rows {
            html.push_str("<tr>");
            for (i, cell) in row.iter().enumerate() {
                // first cell as row header, the way the catalog tables are laid out
                if i == 0 {
                    html.push_str(&format!("<th>{cell}</th>"));
                } else {
                    html.push_str(&format!("<td>{cell}</td>"));
                }
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");
        html
    }

    fn doc(tables: &[String]) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", tables.concat()))
    }

    #[test]
    fn caption_matching() {
        assert!(CaptionMatch::catalog().matches("Phase One films"));
        assert!(CaptionMatch::catalog().matches("MCU PHASE FOUR"));
        assert!(!CaptionMatch::catalog().matches("Box office"));
        assert!(CaptionMatch::cast().matches("Recurring cast and characters of the saga"));
        assert!(!CaptionMatch::cast().matches("recurring cast and characters"));
    }

    #[test]
    fn catalog_drops_rows_of_wrong_width() {
        let d = doc(&[table(
            "Phase One",
            &["A", "B"],
            &[&["1", "2"], &["1", "2", "3"], &["only"]],
        )]);
        let tables = extract_catalog_tables(&d, &CaptionMatch::catalog()).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["A", "B"]);
        assert_eq!(
            tables[0].rows,
            vec![vec![Some("1".to_string()), Some("2".to_string())]]
        );
    }

    #[test]
    fn catalog_collects_every_phase_table_in_order() {
        let d = doc(&[
            table("Phase One", &["Film"], &[&["Iron Man"]]),
            table("Box office", &["Film"], &[&["ignored"]]),
            table("Phase Two", &["Film"], &[&["Thor"], &["Ant-Man"]]),
        ]);
        let tables = extract_catalog_tables(&d, &CaptionMatch::catalog()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 1);
        assert_eq!(tables[1].rows.len(), 2);
    }

    #[test]
    fn catalog_without_phase_tables_is_fatal() {
        let d = doc(&[table("Box office", &["Film"], &[&["Iron Man"]])]);
        let err = extract_catalog_tables(&d, &CaptionMatch::catalog()).unwrap_err();
        assert!(matches!(err, ScrapeError::NoCatalogTables));
    }

    #[test]
    fn catalog_tables_without_usable_rows_do_not_count() {
        let d = doc(&[table("Phase One", &["A", "B"], &[&["1"]])]);
        assert!(extract_catalog_tables(&d, &CaptionMatch::catalog()).is_err());
    }

    #[test]
    fn uncaptioned_or_plain_tables_are_ignored() {
        let d = Html::parse_document(
            r#"<table class="wikitable"><tr><th>Film</th></tr><tr><td>X</td></tr></table>
               <table><caption>Phase One</caption><tr><th>Film</th></tr><tr><td>Y</td></tr></table>"#,
        );
        assert!(extract_catalog_tables(&d, &CaptionMatch::catalog()).is_err());
    }

    #[test]
    fn cast_pads_short_rows() {
        let d = doc(&[table(
            "Recurring cast and characters",
            &["A", "B", "C"],
            &[&["1", "2"], &["x", "y", "z"]],
        )]);
        let raw = extract_cast_table(&d, &CaptionMatch::cast()).into_table();
        assert_eq!(
            raw.rows[0],
            vec![Some("1".to_string()), Some("2".to_string()), None]
        );
        assert_eq!(raw.rows.len(), 2);
    }

    #[test]
    fn cast_takes_only_first_match() {
        let d = doc(&[
            table("Recurring cast and characters", &["A"], &[&["first"]]),
            table("Recurring cast and characters", &["A"], &[&["second"]]),
        ]);
        let raw = extract_cast_table(&d, &CaptionMatch::cast()).into_table();
        assert_eq!(raw.rows, vec![vec![Some("first".to_string())]]);
    }

    #[test]
    fn missing_cast_table_is_soft() {
        let d = doc(&[table("Phase One", &["Film"], &[&["Iron Man"]])]);
        let lookup = extract_cast_table(&d, &CaptionMatch::cast());
        assert_eq!(lookup, TableLookup::NotFound);
        assert!(lookup.into_table().is_empty());
    }

    #[test]
    fn cell_text_joins_fragments_with_spaces() {
        let d = Html::parse_document(
            r#"<table class="wikitable"><caption>Phase One</caption>
               <tr><th>Film</th><th>Director(s)</th></tr>
               <tr><th><i>Iron Man</i><sup>[1]</sup></th><td><a>Jon</a>
               <a>Favreau</a></td></tr></table>"#,
        );
        let tables = extract_catalog_tables(&d, &CaptionMatch::catalog()).unwrap();
        assert_eq!(
            tables[0].rows[0],
            vec![
                Some("Iron Man [1]".to_string()),
                Some("Jon Favreau".to_string())
            ]
        );
    }
}
