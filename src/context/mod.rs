//! Effective contexts and their resolution
//!
//! This module provides:
//! - `EffectiveContext` - the frozen key-value facts a permission question is
//!   asked under, used as a cache key
//! - `ContextFlags` - resolution flags carried with the pairs
//! - `ContextManager` - host-implemented supplier of context contributors
//! - `ContextCache` - per-entity memoization of the resolved context

pub mod cache;
pub mod effective;

pub use cache::{ContextCache, ContextManager};
pub use effective::{ContextFlags, EffectiveContext, EffectiveContextBuilder};
