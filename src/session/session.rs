//! Per-entity permission session
//!
//! A `Session` is the live attachment between one connected entity and its
//! permission holder. It owns the entity's context-resolution cache and one
//! `PermissionCache` per distinct effective context, and exposes the public
//! check surface. Its lifecycle is a real state machine:
//!
//! ```text
//! Uninitialised --initialise / initialise_from--> Active --invalidate--> Invalidated
//! ```
//!
//! `Invalidated` is terminal. The session-management host drives every
//! transition; the engine only reacts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cache::PermissionCache;
use crate::context::{ContextCache, ContextManager, EffectiveContext};
use crate::core::{CheckOrigin, EngineError, EngineResult, TristateResult};
use crate::model::{LiveEntity, PermissionHolder};
use crate::processor::ProcessorChain;

use super::locale::{Locale, LocaleEntry, LocaleResolver};

/// Lifecycle stage of a session, for host introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created but not yet bound to a holder
    Uninitialised,
    /// Bound and serving permission checks
    Active,
    /// Torn down; every further use faults
    Invalidated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Uninitialised => write!(f, "uninitialised"),
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Invalidated => write!(f, "invalidated"),
        }
    }
}

/// Everything an active session owns
///
/// The `Arc`-shared members are exactly what `initialise_from` carries over
/// to a successor session: holder reference, resolved-context cache, chain,
/// the per-context result caches, and the locale memo.
struct ActiveState {
    holder: Arc<dyn PermissionHolder>,
    context_cache: Arc<ContextCache>,
    chain: Arc<ProcessorChain>,
    caches: Arc<RwLock<HashMap<EffectiveContext, Arc<PermissionCache>>>>,
    locale: Arc<RwLock<Option<LocaleEntry>>>,
}

impl ActiveState {
    /// The result cache for one exact context value, created on first use
    fn cache_for(&self, context: &EffectiveContext) -> Arc<PermissionCache> {
        if let Some(cache) = self.caches.read().unwrap().get(context) {
            return cache.clone();
        }
        let mut caches = self.caches.write().unwrap();
        caches
            .entry(context.clone())
            .or_insert_with(|| {
                Arc::new(PermissionCache::new(context.clone(), self.chain.clone()))
            })
            .clone()
    }
}

enum SessionState {
    Uninitialised,
    Active(ActiveState),
    Invalidated,
}

/// The per-connected-entity attachment owning context resolution and caching
///
/// Owned by exactly one live entity at a time; safe for concurrent permission
/// checks from parallel handler threads.
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    /// Create an uninitialised session
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::Uninitialised),
        }
    }

    /// Current lifecycle stage
    pub fn status(&self) -> SessionStatus {
        match *self.state.read().unwrap() {
            SessionState::Uninitialised => SessionStatus::Uninitialised,
            SessionState::Active(_) => SessionStatus::Active,
            SessionState::Invalidated => SessionStatus::Invalidated,
        }
    }

    /// Bind a holder and construct fresh caches (Uninitialised -> Active)
    ///
    /// The chain is registered by the host in priority order before the
    /// session is initialised. Initialising an already-active or invalidated
    /// session is a precondition fault.
    pub fn initialise(
        &self,
        holder: Arc<dyn PermissionHolder>,
        entity: Arc<dyn LiveEntity>,
        context_manager: Arc<dyn ContextManager>,
        chain: Arc<ProcessorChain>,
    ) -> EngineResult<()> {
        let mut state = self.state.write().unwrap();
        match *state {
            SessionState::Uninitialised => {
                tracing::debug!(
                    holder = holder.name(),
                    entity = %entity.entity_id(),
                    "session initialised"
                );
                *state = SessionState::Active(ActiveState {
                    holder,
                    context_cache: Arc::new(ContextCache::new(entity, context_manager)),
                    chain,
                    caches: Arc::new(RwLock::new(HashMap::new())),
                    locale: Arc::new(RwLock::new(None)),
                });
                Ok(())
            }
            SessionState::Active(_) => Err(EngineError::AlreadyInitialised),
            SessionState::Invalidated => Err(EngineError::Invalidated),
        }
    }

    /// Continue a previous session (Uninitialised -> Active)
    ///
    /// Used when the live entity object is recreated but represents the same
    /// continuous connection (e.g. a cross-boundary transfer): holder
    /// reference, context cache, result caches, chain, and locale memo are
    /// carried over verbatim, so permissions already cached in `previous`
    /// stay warm. `previous` must be active and is expected to be abandoned
    /// by its owner immediately after.
    pub fn initialise_from(&self, previous: &Session) -> EngineResult<()> {
        if std::ptr::eq(self, previous) {
            return Err(EngineError::invalid_argument(
                "cannot initialise a session from itself",
            ));
        }

        let mut state = self.state.write().unwrap();
        match *state {
            SessionState::Uninitialised => {}
            SessionState::Active(_) => return Err(EngineError::AlreadyInitialised),
            SessionState::Invalidated => return Err(EngineError::Invalidated),
        }

        let previous_state = previous.state.read().unwrap();
        let transferred = match &*previous_state {
            SessionState::Active(active) => ActiveState {
                holder: active.holder.clone(),
                context_cache: active.context_cache.clone(),
                chain: active.chain.clone(),
                caches: active.caches.clone(),
                locale: active.locale.clone(),
            },
            SessionState::Uninitialised => return Err(EngineError::NotInitialised),
            SessionState::Invalidated => return Err(EngineError::Invalidated),
        };

        tracing::debug!(holder = transferred.holder.name(), "session transferred");
        *state = SessionState::Active(transferred);
        Ok(())
    }

    /// Tear down (Active -> Invalidated), releasing all owned references
    ///
    /// A second call on an already-invalidated session is a tolerated no-op;
    /// invalidating a never-initialised session is a precondition fault.
    /// After this returns, every other operation deterministically faults.
    pub fn invalidate(&self) -> EngineResult<()> {
        let mut state = self.state.write().unwrap();
        match *state {
            SessionState::Active(_) => {
                *state = SessionState::Invalidated;
                tracing::debug!("session invalidated");
                Ok(())
            }
            SessionState::Invalidated => Ok(()),
            SessionState::Uninitialised => Err(EngineError::NotInitialised),
        }
    }

    /// Run a closure against the active state, faulting otherwise
    fn active<R>(&self, f: impl FnOnce(&ActiveState) -> EngineResult<R>) -> EngineResult<R> {
        let state = self.state.read().unwrap();
        match &*state {
            SessionState::Active(active) => f(active),
            SessionState::Uninitialised => Err(EngineError::NotInitialised),
            SessionState::Invalidated => Err(EngineError::Invalidated),
        }
    }

    /// Resolve a permission under the entity's current effective context
    ///
    /// The context is recomputed lazily if the entity's context inputs
    /// changed since the last resolution. Verdict-to-boolean mapping is the
    /// caller's choice (`Tristate::holds`).
    pub fn check_permission(&self, permission: &str) -> EngineResult<TristateResult> {
        self.active(|active| {
            let context = active.context_cache.effective_context()?;
            active
                .cache_for(&context)
                .check_permission(permission, CheckOrigin::Api)
        })
    }

    /// Resolve a permission under a caller-supplied context
    pub fn check_permission_under(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        self.active(|active| {
            active
                .cache_for(context)
                .check_permission(permission, CheckOrigin::Api)
        })
    }

    /// The entity's current effective context
    pub fn effective_context(&self) -> EngineResult<EffectiveContext> {
        self.active(|active| active.context_cache.effective_context())
    }

    /// The permission holder this session is bound to
    pub fn holder(&self) -> EngineResult<Arc<dyn PermissionHolder>> {
        self.active(|active| Ok(active.holder.clone()))
    }

    /// Discard every cached result, wholesale
    ///
    /// Called by the host whenever the holder's underlying permission data
    /// changes. Entire `PermissionCache` instances are dropped, never single
    /// entries; the next check under each context recomputes from the chain.
    /// A result computed concurrently with this call may be stored and then
    /// immediately discarded - the next read recomputes, which is acceptable.
    pub fn invalidate_caches(&self) -> EngineResult<()> {
        self.active(|active| {
            let mut caches = active.caches.write().unwrap();
            let dropped = caches.len();
            caches.clear();
            tracing::debug!(
                holder = active.holder.name(),
                dropped,
                "permission caches invalidated"
            );
            Ok(())
        })
    }

    /// The entity's locale, memoized against its reported language tag
    ///
    /// Re-resolves only when the tag differs from the last one seen
    /// (string compare); an entity reporting no tag yields `None`.
    pub fn locale(&self, resolver: &dyn LocaleResolver) -> EngineResult<Option<Locale>> {
        self.active(|active| {
            let tag = match active.context_cache.entity().language_tag() {
                Some(tag) => tag,
                None => return Ok(None),
            };

            {
                let memo = active.locale.read().unwrap();
                if let Some(entry) = memo.as_ref() {
                    if entry.tag == tag {
                        return Ok(entry.locale.clone());
                    }
                }
            }

            let locale = resolver.resolve(&tag);
            let mut memo = active.locale.write().unwrap();
            *memo = Some(LocaleEntry {
                tag,
                locale: locale.clone(),
            });
            Ok(locale)
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .finish()
    }
}
