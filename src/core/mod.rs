//! Core types for the permission engine
//!
//! This module provides the fundamental types used throughout the engine:
//! - `Tristate` / `TristateResult` - verdicts and their provenance
//! - `CheckOrigin` - observability tag on permission checks
//! - `EngineError` - error types

pub mod error;
pub mod verdict;

pub use error::{EngineError, EngineResult};
pub use verdict::{CheckOrigin, Tristate, TristateResult};
