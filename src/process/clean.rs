use tracing::{info, instrument};

use super::utils::{extract_parenthesized, strip_cell};
use crate::schema::types::{FilmTable, FILM, RELEASE_DATE};

/// Produce the cleaned film dataset from the unified catalog:
/// - `release_date` keeps only its parenthesized part, when there is one
///   (`"May 6, 2022 (2022-05-06)"` → `"2022-05-06"`, `"TBA"` stays),
/// - every cell loses its `[...]` annotations,
/// - rows without a film title are dropped.
///
/// Row order is preserved.
#[instrument(level = "info", skip(films), fields(input = films.len()))]
pub fn clean_film_table(films: &FilmTable) -> FilmTable {
    let mut cleaned = films.clone();

    // 1) release dates
    cleaned.map_column(RELEASE_DATE, |cell| {
        cell.map(|v| {
            let inner = extract_parenthesized(&v).map(str::to_string);
            inner.unwrap_or(v)
        })
    });

    // 2) annotations, every column
    for row in &mut cleaned.rows {
        for cell in row.iter_mut() {
            *cell = strip_cell(cell.as_deref());
        }
    }

    // 3) no title → no record
    if let Some(film_idx) = cleaned.column_index(FILM) {
        cleaned
            .rows
            .retain(|row| row[film_idx].as_deref().map_or(false, |t| !t.is_empty()));
    } else {
        cleaned.rows.clear();
    }

    info!(kept = cleaned.len(), dropped = films.len() - cleaned.len(), "cleaned films");
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn table(rows: Vec<Vec<Option<String>>>) -> FilmTable {
        FilmTable {
            columns: vec![FILM.into(), RELEASE_DATE.into(), "director".into()],
            rows,
        }
    }

    #[test]
    fn release_date_takes_parenthesized_value() {
        let t = clean_film_table(&table(vec![
            vec![s("Doctor Strange"), s("May 6, 2022 (2022-05-06)"), None],
            vec![s("Blade"), s("TBA"), None],
            vec![s("Untitled"), None, None],
        ]));
        let dates: Vec<_> = t.records().map(|r| r.get(RELEASE_DATE)).collect();
        assert_eq!(dates, vec![Some("2022-05-06"), Some("TBA"), None]);
    }

    #[test]
    fn annotations_stripped_everywhere() {
        let t = clean_film_table(&table(vec![vec![
            s("Thor [a]"),
            s("May 6, 2011[12]"),
            s("Kenneth Branagh[13]"),
        ]]));
        assert_eq!(t.rows[0], vec![s("Thor"), s("May 6, 2011"), s("Kenneth Branagh")]);
    }

    #[test]
    fn drops_untitled_rows_keeping_order() {
        let t = clean_film_table(&table(vec![
            vec![s("A"), None, None],
            vec![s(""), s("2020"), None],
            vec![None, s("2021"), None],
            vec![s("[1]"), None, None],
            vec![s("B"), None, None],
        ]));
        let films: Vec<_> = t.records().map(|r| r.title().unwrap()).collect();
        assert_eq!(films, vec!["A", "B"]);
    }

    #[test]
    fn nothing_titled_leaves_an_empty_table() {
        let t = clean_film_table(&table(vec![
            vec![s("[a]"), s("TBA"), None],
            vec![None, None, s("TBA")],
        ]));
        assert!(t.is_empty());
        assert_eq!(t.columns, vec![FILM, RELEASE_DATE, "director"]);
    }

    #[test]
    fn input_is_untouched() {
        let input = table(vec![vec![s("Thor[1]"), None, None]]);
        let _ = clean_film_table(&input);
        assert_eq!(input.rows[0][0], s("Thor[1]"));
    }
}
