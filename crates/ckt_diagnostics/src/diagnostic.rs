//! Structured diagnostic messages with severity, code, subject and notes.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured diagnostic message.
///
/// The optional `subject` names the entity the diagnostic is about (a pin,
/// a net, an edge table, a library-cell function group).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The entity this diagnostic refers to, if any.
    pub subject: Option<String>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message)
    }

    /// Creates a new note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, code, message)
    }

    fn with_severity(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
        }
    }

    /// Sets the subject entity of this diagnostic.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({subject})")?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
