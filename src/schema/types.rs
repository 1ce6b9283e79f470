// src/schema/types.rs

/// Canonical name of the film title column.
pub const FILM: &str = "film";
pub const RELEASE_DATE: &str = "release_date";
pub const DIRECTOR: &str = "director";
pub const WRITER: &str = "writer";
pub const PRODUCER: &str = "producer";

/// Known header variants and the canonical field they collapse into.
pub static ALIASES: &[(&str, &str)] = &[
    ("U.S. release date", RELEASE_DATE),
    ("Release date", RELEASE_DATE),
    ("Director(s)", DIRECTOR),
    ("Directed by", DIRECTOR),
    ("Screenwriter(s)", WRITER),
    ("Writer(s)", WRITER),
    ("Producer(s)", PRODUCER),
    ("Produced by", PRODUCER),
];

/// Canonical field for a (normalized) header, if it is a known variant.
pub fn canonical_alias(header: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(variant, _)| *variant == header)
        .map(|(_, canonical)| *canonical)
}

/// The unified film catalog: one ordered column list shared by every row.
///
/// A `None` cell means the value is missing, either because the source table
/// had no such column or because the row was padded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl FilmTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rename column `idx` to `name`. If `name` already exists, the two columns
    /// are merged into the leftmost one; per row the leftmost non-empty value wins.
    pub fn rename_column(&mut self, idx: usize, name: &str) {
        match self.column_index(name) {
            Some(existing) if existing != idx => {
                let (keep, gone) = (existing.min(idx), existing.max(idx));
                for row in &mut self.rows {
                    let moved = row.remove(gone);
                    if row[keep].as_deref().map_or(true, str::is_empty) {
                        row[keep] = moved;
                    }
                }
                self.columns.remove(gone);
                self.columns[keep] = name.to_string();
            }
            _ => self.columns[idx] = name.to_string(),
        }
    }

    /// Apply `f` to every cell of the named column. No-op if the column is absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(Option<String>) -> Option<String>,
    {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                let cell = row[idx].take();
                row[idx] = f(cell);
            }
        }
    }

    /// Borrowed, name-addressable views of every row, in order.
    pub fn records(&self) -> impl Iterator<Item = FilmRecord<'_>> {
        self.rows.iter().map(move |cells| FilmRecord {
            columns: &self.columns,
            cells,
        })
    }
}

/// One row of a [`FilmTable`], addressable by field name.
#[derive(Debug, Clone, Copy)]
pub struct FilmRecord<'a> {
    columns: &'a [String],
    cells: &'a [Option<String>],
}

impl<'a> FilmRecord<'a> {
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == field)
            .and_then(|i| self.cells.get(i))
            .and_then(|c| c.as_deref())
    }

    pub fn title(&self) -> Option<&'a str> {
        self.get(FILM)
    }
}
