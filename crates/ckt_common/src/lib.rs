//! Shared foundational types used across the cktgraph crates.
//!
//! This crate provides the opaque node/edge id newtypes of the unified graph
//! address space, interned entity names, and common result types.

#![warn(missing_docs)]

pub mod ident;
pub mod ids;
pub mod result;

pub use ident::{Ident, Interner};
pub use ids::{EdgeId, LibCellId, NodeId};
pub use result::{CktResult, InternalError};
