//! External collaborator traits
//!
//! The engine references, but never owns, the entities it works on:
//! - `LiveEntity` - the live connected entity a session is attached to
//! - `PermissionHolder` - the identity (user or group) whose permission data
//!   is queried; the inheritance graph and node persistence behind
//!   `permission_map` are the data store's concern, not this engine's

#[cfg(test)]
pub mod test_support;

use std::collections::HashMap;

use uuid::Uuid;

use crate::context::EffectiveContext;
use crate::core::EngineResult;

/// A live connected entity (player, client, connection)
///
/// Lifetime is managed by the host; the engine only reads identity and the
/// reported language tag (for locale memoization).
pub trait LiveEntity: Send + Sync {
    /// Stable identity for this entity across its connected lifetime
    fn entity_id(&self) -> Uuid;

    /// The entity's reported language tag (e.g. `en_US`), if any
    fn language_tag(&self) -> Option<String>;
}

/// The identity whose permission data is queried
///
/// Held by reference (`Arc`) and never owned; the underlying data store is
/// shared and externally synchronized.
pub trait PermissionHolder: Send + Sync {
    /// Display name of the holder
    fn name(&self) -> &str;

    /// Holder type (e.g. `user`, `group`), consulted by the defaults
    /// processor for type-level defaults
    fn kind(&self) -> &str;

    /// The holder's flattened permission assignments effective under the
    /// given context
    ///
    /// Node assignment, inheritance, and weight resolution all happen behind
    /// this call. Keys are permission nodes (lowercase), values the assigned
    /// grant/deny. Fails with a data fault if the store is unreachable; the
    /// engine propagates that unretried.
    fn permission_map(
        &self,
        context: &EffectiveContext,
    ) -> EngineResult<HashMap<String, bool>>;
}
