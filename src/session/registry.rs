//! Session registry
//!
//! An explicit mapping from entity identity to `Session`, owned by the
//! session-management host. Sessions are created on first access, replaced
//! (with state transfer) when the host recreates the underlying entity
//! object, and removed with teardown on disconnect. The registry never
//! initiates lifecycle transitions on its own beyond what those three host
//! events ask for.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::core::{EngineError, EngineResult};

use super::session::Session;

/// Entity-identity -> session map for the session-management host
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for an entity, if one exists
    pub fn get(&self, entity_id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().unwrap().get(&entity_id).cloned()
    }

    /// The session for an entity, creating an uninitialised one on first
    /// access
    ///
    /// The host is expected to `initialise` a freshly created session before
    /// handing it to callers.
    pub fn get_or_create(&self, entity_id: Uuid) -> Arc<Session> {
        if let Some(session) = self.get(entity_id) {
            return session;
        }
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .entry(entity_id)
            .or_insert_with(|| {
                tracing::debug!(entity = %entity_id, "session created");
                Arc::new(Session::new())
            })
            .clone()
    }

    /// Handle entity re-creation: transfer the current session's state into
    /// a new session and swap it into the map
    ///
    /// Returns the successor. The predecessor stays untouched for the host
    /// to invalidate and abandon.
    pub fn replace(&self, entity_id: Uuid) -> EngineResult<Arc<Session>> {
        let mut sessions = self.sessions.write().unwrap();
        let previous = sessions.get(&entity_id).ok_or_else(|| {
            EngineError::invalid_argument(format!("no session for entity {}", entity_id))
        })?;

        let successor = Arc::new(Session::new());
        successor.initialise_from(previous)?;
        sessions.insert(entity_id, successor.clone());
        tracing::debug!(entity = %entity_id, "session replaced via transfer");
        Ok(successor)
    }

    /// Handle entity teardown: remove the session and invalidate it
    ///
    /// Returns the removed session, already invalidated (an uninitialised
    /// session is removed as-is).
    pub fn remove(&self, entity_id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.write().unwrap().remove(&entity_id)?;
        // A never-initialised session has nothing to release
        match session.invalidate() {
            Ok(()) | Err(EngineError::NotInitialised) => {}
            Err(err) => {
                tracing::warn!(entity = %entity_id, %err, "failed to invalidate removed session");
            }
        }
        tracing::debug!(entity = %entity_id, "session removed");
        Some(session)
    }

    /// Number of tracked sessions
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Whether no sessions are tracked
    pub fn is_empty(&self) -> bool {
        self.sessions.read().unwrap().is_empty()
    }
}
