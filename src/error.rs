use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while normalizing records or reading and writing stores
///
/// Missing optional fields never show up here: they are replaced by the
/// placeholder of the record kind. Only the author fields of a post are
/// treated as required.
#[derive(Debug, Error)]
pub enum Error {
    /// A post lacks its author sub-object or one of the author's key fields
    #[error("post {post}: missing required author field `{field}`")]
    MissingAuthor { post: String, field: &'static str },

    /// A record in a batch does not carry a column the batch schema requires
    #[error("row {row}: missing column `{column}` required by the batch schema")]
    SchemaMismatch { row: usize, column: String },

    /// A table cannot be built from zero records
    #[error("cannot build a table from an empty batch")]
    EmptyBatch,

    /// A raw record was not a JSON object
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// An identifier cell could not be read as a 64-bit integer
    #[error("{}: row {row}: identifier `{value}` is not a 64-bit integer", .path.display())]
    InvalidIdentifier {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// A stored table has rows but no identifier column to dedupe on
    #[error("{}: no `id` column", .path.display())]
    MissingIdentifierColumn { path: PathBuf },

    /// A sentiment lexicon line is not `token<TAB>valence`
    #[error("lexicon line {line}: expected `token<TAB>valence`")]
    InvalidLexicon { line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to replace store file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;
