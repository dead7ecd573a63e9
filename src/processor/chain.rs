//! Processor chain
//!
//! An ordered list of independently pluggable processors. Evaluation walks
//! the chain in ascending priority (insertion order breaks ties, stably) and
//! stops at the first definite verdict.

use std::sync::Arc;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, TristateResult};

use super::PermissionProcessor;

/// A registered processor and its priority
///
/// Lower priority numbers evaluate first.
#[derive(Clone)]
pub struct ProcessorEntry {
    /// The processor
    pub processor: Arc<dyn PermissionProcessor>,
    /// Evaluation priority (ascending)
    pub priority: i32,
}

/// Priority-ordered chain of permission processors
///
/// The registered set is fixed once the chain is shared with a session;
/// evaluation order is deterministic and stable across runs for the same
/// registrations.
#[derive(Default)]
pub struct ProcessorChain {
    entries: Vec<ProcessorEntry>,
}

impl ProcessorChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor at the given priority
    ///
    /// Entries are kept sorted by priority; registration order is preserved
    /// for equal priorities (stable sort).
    pub fn register<P: PermissionProcessor + 'static>(&mut self, processor: P, priority: i32) {
        self.entries.push(ProcessorEntry {
            processor: Arc::new(processor),
            priority,
        });
        self.entries.sort_by_key(|entry| entry.priority);
    }

    /// Register an already-shared processor at the given priority
    pub fn register_arc(&mut self, processor: Arc<dyn PermissionProcessor>, priority: i32) {
        self.entries.push(ProcessorEntry {
            processor,
            priority,
        });
        self.entries.sort_by_key(|entry| entry.priority);
    }

    /// Number of registered processors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no processors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate a permission under a context
    ///
    /// Invokes each processor in order and returns the first definite
    /// verdict; if every processor defers the chain result is undefined.
    /// Processor faults propagate immediately (a silent undefined there
    /// would hide real bugs).
    pub fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        for entry in &self.entries {
            let result = entry.processor.evaluate(permission, context)?;
            if result.is_definite() {
                tracing::trace!(
                    permission,
                    origin = result.origin,
                    verdict = %result.verdict,
                    "processor produced verdict"
                );
                return Ok(result);
            }
        }
        Ok(TristateResult::undefined())
    }
}

impl std::fmt::Debug for ProcessorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for entry in &self.entries {
            list.entry(&(entry.priority, entry.processor.origin()));
        }
        list.finish()
    }
}
