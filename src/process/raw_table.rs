/// One HTML table as scraped, before any schema reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names, from the `th` cells of the table's first row.
    /// These are what the page claims; canonical names are assigned later.
    pub headers: Vec<String>,
    /// Each data row, aligned positionally to `headers`.
    /// `None` is the pad value for cells missing from a short row.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of looking for a single, optional table.
///
/// A missing table is an expected condition, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TableLookup {
    Found(RawTable),
    NotFound,
}

impl TableLookup {
    /// Collapse to a table, using an empty one for `NotFound`.
    pub fn into_table(self) -> RawTable {
        match self {
            TableLookup::Found(t) => t,
            TableLookup::NotFound => RawTable::default(),
        }
    }
}
