use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)film|title").unwrap());

/// Picks the column that holds an entity's title out of a header list.
pub trait ColumnClassifier {
    /// Index of the title column in `columns`, if any.
    fn classify(&self, columns: &[String]) -> Option<usize>;
}

/// First column whose name contains "film" or "title", ignoring case.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleColumn;

impl ColumnClassifier for TitleColumn {
    fn classify(&self, columns: &[String]) -> Option<usize> {
        columns.iter().position(|c| TITLE_RE.is_match(c))
    }
}

/// Name of the column likely to represent the film title.
pub fn find_film_column(columns: &[String]) -> Option<&str> {
    TitleColumn
        .classify(columns)
        .map(|i| columns[i].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            find_film_column(&cols(&["Year", "Title", "Film"])),
            Some("Title")
        );
    }

    #[test]
    fn matches_fragments_case_insensitively() {
        assert_eq!(
            find_film_column(&cols(&["U.S. release date", "FILM NAME"])),
            Some("FILM NAME")
        );
        assert_eq!(find_film_column(&cols(&["Subtitles"])), Some("Subtitles"));
        assert_eq!(find_film_column(&cols(&["Filmography"])), Some("Filmography"));
    }

    #[test]
    fn no_candidate() {
        assert_eq!(find_film_column(&cols(&["Year", "Director(s)"])), None);
        assert_eq!(find_film_column(&[]), None);
    }
}
