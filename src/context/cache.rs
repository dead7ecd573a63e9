//! Context resolution cache
//!
//! The host's context manager computes which context contributors apply to a
//! live entity (world, server, and so on). Recomputing that on every
//! permission check would defeat the point of the result cache, so
//! `ContextCache` memoizes the last resolved context and only recomputes when
//! the manager reports that the entity's context inputs changed.

use std::sync::{Arc, RwLock};

use crate::core::EngineResult;
use crate::model::LiveEntity;

use super::effective::EffectiveContext;

/// Supplies the current context contributors for a live entity
///
/// Implemented by the host. `context_epoch` must change (monotonically bump)
/// whenever the entity's context inputs change; the cache compares epochs to
/// decide whether its resolved context is still current.
pub trait ContextManager: Send + Sync {
    /// Compute the entity's current effective context
    fn current_context(&self, entity: &dyn LiveEntity) -> EngineResult<EffectiveContext>;

    /// Epoch counter for the entity's context inputs
    fn context_epoch(&self, entity: &dyn LiveEntity) -> u64;
}

/// Memoized (epoch, context) pair
#[derive(Debug, Clone)]
struct Resolved {
    epoch: u64,
    context: EffectiveContext,
}

/// Lazily refreshed cache of one entity's effective context
///
/// Owned by a `Session` and carried over verbatim on session transfer.
pub struct ContextCache {
    entity: Arc<dyn LiveEntity>,
    manager: Arc<dyn ContextManager>,
    resolved: RwLock<Option<Resolved>>,
}

impl ContextCache {
    /// Create a cache bound to an entity and its context manager
    pub fn new(entity: Arc<dyn LiveEntity>, manager: Arc<dyn ContextManager>) -> Self {
        Self {
            entity,
            manager,
            resolved: RwLock::new(None),
        }
    }

    /// The entity this cache resolves contexts for
    pub fn entity(&self) -> &Arc<dyn LiveEntity> {
        &self.entity
    }

    /// The entity's current effective context
    ///
    /// Returns the memoized context when the manager's epoch is unchanged,
    /// otherwise recomputes through the manager and stores the fresh value.
    pub fn effective_context(&self) -> EngineResult<EffectiveContext> {
        let epoch = self.manager.context_epoch(self.entity.as_ref());

        {
            let resolved = self.resolved.read().unwrap();
            if let Some(resolved) = resolved.as_ref() {
                if resolved.epoch == epoch {
                    return Ok(resolved.context.clone());
                }
            }
        }

        let context = self.manager.current_context(self.entity.as_ref())?;
        tracing::debug!(
            entity = %self.entity.entity_id(),
            epoch,
            context = %context,
            "resolved effective context"
        );

        let mut resolved = self.resolved.write().unwrap();
        *resolved = Some(Resolved {
            epoch,
            context: context.clone(),
        });
        Ok(context)
    }
}

impl std::fmt::Debug for ContextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextCache")
            .field("entity", &self.entity.entity_id())
            .field("resolved", &self.resolved.read().unwrap())
            .finish()
    }
}
