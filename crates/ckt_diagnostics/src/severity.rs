//! How much a diagnostic should worry the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity. Variants compare in declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Informational context, e.g. per-pass counts.
    Note,
    /// Rows were dropped or a guard fired; the run continues.
    Warning,
    /// The analysis result is not trustworthy.
    Error,
}

impl Severity {
    /// Number of severity levels.
    pub const COUNT: usize = 3;

    /// Dense index in `0..COUNT`, for per-severity tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase label used in rendered diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
