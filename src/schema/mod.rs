pub mod classify;
pub mod types;
pub mod unify;

pub use classify::{find_film_column, ColumnClassifier, TitleColumn};
pub use types::{FilmRecord, FilmTable};
pub use unify::{align_tables, unify_tables};
