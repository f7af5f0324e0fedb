//! Errors from reading `ckt.toml`.

use std::path::PathBuf;

/// Why an [`AnalysisConfig`](crate::AnalysisConfig) could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was looked up.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The content is not valid TOML or does not match the section layout.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is outside its allowed range.
    #[error("{key}: {reason}")]
    Invalid {
        /// Dotted key of the offending value, e.g. `classify.size_buckets`.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
