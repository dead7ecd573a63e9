//! Context-sensitive permission resolution and caching engine
//!
//! Resolves, for a permission holder under a situational context, whether a
//! named permission is granted, denied, or undefined - cheaply enough to run
//! on every authorization check in a live multi-user environment.
//!
//! The moving parts, bottom-up:
//! - [`core::Tristate`] / [`core::TristateResult`] - verdicts with provenance
//! - [`processor::ProcessorChain`] - priority-ordered pluggable rule sources,
//!   stopping at the first definite verdict
//! - [`cache::PermissionCache`] - per-context memoization over the chain,
//!   with concurrent-miss collapse and wholesale-only invalidation
//! - [`session::Session`] - the per-connected-entity attachment owning
//!   context resolution, the result caches, and its own lifecycle (including
//!   state transfer across entity re-creation)
//!
//! External collaborators (holder data store, context manager, locale
//! resolver, session-management host) are consumed through the traits in
//! [`model`], [`context`], and [`session::locale`]; the engine never
//! initiates lifecycle transitions itself.

pub mod cache;
pub mod context;
pub mod core;
pub mod model;
pub mod processor;
pub mod session;

// Optional convenience for binaries and tests
pub mod logging;
