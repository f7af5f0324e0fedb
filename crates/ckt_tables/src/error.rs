//! Errors raised while loading input tables.
//!
//! These are the only fatal input conditions: a whole table or a required
//! column is missing. Row-level problems are recovered downstream.

/// Errors that can occur when loading the input table bundle.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// An I/O error occurred while reading the bundle.
    #[error("failed to read tables: {0}")]
    Io(#[from] std::io::Error),

    /// The bundle is not valid JSON or not a JSON object.
    #[error("failed to parse table bundle: {0}")]
    Parse(String),

    /// A required table is absent from the bundle.
    #[error("missing required table '{0}'")]
    MissingTable(&'static str),

    /// A table is present but its rows do not match the expected columns.
    #[error("malformed table '{table}': {message}")]
    MalformedTable {
        /// The table name.
        table: &'static str,
        /// What was wrong, typically a missing column.
        message: String,
    },
}
