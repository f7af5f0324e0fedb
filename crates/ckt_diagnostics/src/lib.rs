//! Structured diagnostics for recoverable anomalies found during analysis.
//!
//! Input rows that cannot be used (unresolved edge endpoints, degenerate
//! classification groups, buffer-chain cycles, unjoinable sinks) are dropped
//! rather than failing the run. Each such event is reported as a
//! [`Diagnostic`] into a thread-safe [`DiagnosticSink`] so callers can inspect
//! what was filtered.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode, ParseCodeError};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
