//! Permission processors
//!
//! A processor is a pluggable rule source: given a permission string and an
//! effective context it produces a tri-state verdict. Processors are
//! registered into a `ProcessorChain` in priority order; the chain stops at
//! the first definite verdict.
//!
//! Bundled processors (lowest priority number evaluates first):
//!
//! | Processor | Suggested priority | Rule source |
//! |-----------|--------------------|-------------|
//! | `MapProcessor` | 0 | exact node assignments on the holder |
//! | `WildcardProcessor` | 10 | parent wildcards (`a.b.*`, `a.*`, `*`) |
//! | `RegexProcessor` | 20 | `regex:<pattern>` shaped assignments |
//! | `DefaultsProcessor` | 100 | type defaults, then root defaults |

pub mod chain;
pub mod defaults;
pub mod map;
pub mod regex;
pub mod wildcard;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, TristateResult};

pub use chain::{ProcessorChain, ProcessorEntry};
pub use defaults::{DefaultsProcessor, DefaultsSource};
pub use map::MapProcessor;
pub use regex::RegexProcessor;
pub use wildcard::WildcardProcessor;

/// A pluggable rule source producing tri-state verdicts
///
/// Evaluation must be read-only with respect to the permission data: a
/// processor may read external state (holder data, context) but must not
/// mutate it. Expected unanswerable input (no matching rule, malformed
/// node) yields `Ok` with an undefined verdict; only real faults (store
/// unreachable, corrupted data) return `Err`, which propagates across the
/// chain boundary unretried.
pub trait PermissionProcessor: Send + Sync {
    /// Provenance tag attached to results this processor produces
    fn origin(&self) -> &'static str;

    /// Evaluate a (normalized, lowercase) permission under a context
    fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult>;
}
