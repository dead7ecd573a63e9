//! Shared test stubs for the collaborator traits

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use uuid::Uuid;

use crate::context::EffectiveContext;
use crate::core::{EngineError, EngineResult};

use super::{LiveEntity, PermissionHolder};

/// In-memory permission holder with optional per-context assignments
pub struct StubHolder {
    name: String,
    kind: String,
    base: RwLock<HashMap<String, bool>>,
    by_context: RwLock<HashMap<EffectiveContext, HashMap<String, bool>>>,
    failing: AtomicBool,
    map_calls: AtomicUsize,
}

impl StubHolder {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            base: RwLock::new(HashMap::new()),
            by_context: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
            map_calls: AtomicUsize::new(0),
        }
    }

    /// Builder: assign a node regardless of context
    pub fn with_permission(self, node: &str, value: bool) -> Self {
        self.set_permission(node, value);
        self
    }

    /// Builder: assign a node under one specific context only
    pub fn with_context_permission(
        self,
        context: &EffectiveContext,
        node: &str,
        value: bool,
    ) -> Self {
        self.set_context_permission(context, node, value);
        self
    }

    /// Mutate an assignment (callers then invalidate session caches)
    pub fn set_permission(&self, node: &str, value: bool) {
        self.base
            .write()
            .unwrap()
            .insert(node.to_string(), value);
    }

    pub fn set_context_permission(&self, context: &EffectiveContext, node: &str, value: bool) {
        self.by_context
            .write()
            .unwrap()
            .entry(context.clone())
            .or_default()
            .insert(node.to_string(), value);
    }

    pub fn remove_permission(&self, node: &str) {
        self.base.write().unwrap().remove(node);
    }

    /// Make `permission_map` fail with a data fault
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// How many times `permission_map` was consulted
    pub fn map_calls(&self) -> usize {
        self.map_calls.load(Ordering::SeqCst)
    }
}

impl PermissionHolder for StubHolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn permission_map(
        &self,
        context: &EffectiveContext,
    ) -> EngineResult<HashMap<String, bool>> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::data_store("stub store unavailable"));
        }

        let mut map = self.base.read().unwrap().clone();
        if let Some(overrides) = self.by_context.read().unwrap().get(context) {
            map.extend(overrides.clone());
        }
        Ok(map)
    }
}

/// Context manager serving one settable context for every entity
pub struct FixedContextManager {
    epoch: std::sync::atomic::AtomicU64,
    context: RwLock<EffectiveContext>,
}

impl FixedContextManager {
    pub fn new(context: EffectiveContext) -> Self {
        Self {
            epoch: std::sync::atomic::AtomicU64::new(0),
            context: RwLock::new(context),
        }
    }

    /// Replace the served context and bump the epoch
    pub fn set_context(&self, context: EffectiveContext) {
        *self.context.write().unwrap() = context;
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

impl crate::context::ContextManager for FixedContextManager {
    fn current_context(&self, _entity: &dyn LiveEntity) -> EngineResult<EffectiveContext> {
        Ok(self.context.read().unwrap().clone())
    }

    fn context_epoch(&self, _entity: &dyn LiveEntity) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

/// Live entity with a mutable language tag
pub struct StubEntity {
    id: Uuid,
    language: RwLock<Option<String>>,
}

impl StubEntity {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            language: RwLock::new(None),
        }
    }

    pub fn with_language(tag: &str) -> Self {
        let entity = Self::new();
        entity.set_language(Some(tag));
        entity
    }

    pub fn set_language(&self, tag: Option<&str>) {
        *self.language.write().unwrap() = tag.map(str::to_string);
    }
}

impl Default for StubEntity {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveEntity for StubEntity {
    fn entity_id(&self) -> Uuid {
        self.id
    }

    fn language_tag(&self) -> Option<String> {
        self.language.read().unwrap().clone()
    }
}
