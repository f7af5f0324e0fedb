//! Diagnostic codes: a pass category letter and a three-digit number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The analysis pass a diagnostic comes from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Input tables and the pre-filter (`I`).
    Input,
    /// Graph construction and edge resolution (`G`).
    Graph,
    /// Library-cell classification (`L`).
    Classify,
    /// Buffer-tree segmentation (`B`).
    BufferTree,
    /// Driver/sink feature synthesis (`F`).
    Feature,
}

impl Category {
    const ALL: [Category; 5] = [
        Category::Input,
        Category::Graph,
        Category::Classify,
        Category::BufferTree,
        Category::Feature,
    ];

    /// The letter that starts every code of this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Input => 'I',
            Category::Graph => 'G',
            Category::Classify => 'L',
            Category::BufferTree => 'B',
            Category::Feature => 'F',
        }
    }

    /// The category whose codes start with `prefix`.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.prefix() == prefix)
    }
}

/// Identifies one kind of diagnostic, rendered as e.g. `G101` or `B301`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The pass category.
    pub category: Category,
    /// Number within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// A string that is not a category letter followed by three digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid diagnostic code '{0}'")]
pub struct ParseCodeError(pub String);

impl FromStr for DiagnosticCode {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCodeError(s.to_string());
        let mut chars = s.chars();
        let category = chars
            .next()
            .and_then(Category::from_prefix)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self::new(category, number))
    }
}
