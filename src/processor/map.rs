//! Direct assignment lookup

use std::sync::Arc;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, Tristate, TristateResult};
use crate::model::PermissionHolder;

use super::PermissionProcessor;

const ORIGIN: &str = "map";

/// Answers from the holder's exact node assignments
///
/// The first processor in a conventional chain: looks the permission up
/// verbatim in the holder's flattened assignment map for the context and
/// defers when no exact entry exists.
pub struct MapProcessor {
    holder: Arc<dyn PermissionHolder>,
}

impl MapProcessor {
    /// Create a processor reading the given holder's assignments
    pub fn new(holder: Arc<dyn PermissionHolder>) -> Self {
        Self { holder }
    }
}

impl PermissionProcessor for MapProcessor {
    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        let map = self.holder.permission_map(context)?;
        match map.get(permission) {
            Some(&value) => Ok(TristateResult::new(Tristate::from_bool(value), ORIGIN)
                .with_reason(format!("direct assignment of {}", permission))),
            None => Ok(TristateResult::undefined()),
        }
    }
}
