use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());
static PARENTHESIZED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// 1) Remove every `[...]` annotation (footnote markers, "[citation needed]")
///    and trim surrounding whitespace.
pub fn strip_references(raw: &str) -> String {
    REFERENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Same as [`strip_references`], lifted over nullable cells. `None` passes through.
pub fn strip_cell(cell: Option<&str>) -> Option<String> {
    cell.map(strip_references)
}

/// 2) Canonical form of a header as typed on the page:
///    trimmed, with non-breaking spaces folded to plain spaces.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().replace('\u{a0}', " ")
}

/// 3) Text between the first `(` and the next `)`, if any.
///    `"May 6, 2022 (2022-05-06)"` → `Some("2022-05-06")`.
pub fn extract_parenthesized(s: &str) -> Option<&str> {
    PARENTHESIZED_RE
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
