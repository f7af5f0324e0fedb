//! Parsing and validation of `ckt.toml` analysis configuration files.
//!
//! Every section and field is optional; an empty file yields the defaults
//! used by the analysis passes (component threshold 200, 50 size buckets).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
