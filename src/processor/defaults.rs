//! Type and root default values
//!
//! The two-tier fallback pattern: check the narrower scope (defaults for the
//! holder's type), then the broader scope (the server-wide root defaults),
//! then defer.

use std::sync::Arc;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, Tristate, TristateResult};

use super::PermissionProcessor;

const ORIGIN: &str = "defaults";

/// Supplies default permission values, per holder type and server-wide
///
/// Implemented by the host's defaults subjects. Both lookups return
/// `Tristate::Undefined` when no default is defined for the permission under
/// the context.
pub trait DefaultsSource: Send + Sync {
    /// Default for all holders of the given type
    fn type_default(
        &self,
        holder_kind: &str,
        permission: &str,
        context: &EffectiveContext,
    ) -> Tristate;

    /// Server-wide root default
    fn root_default(&self, permission: &str, context: &EffectiveContext) -> Tristate;
}

/// Answers from type defaults, falling back to root defaults
///
/// Conventionally the last processor in the chain: every holder-specific rule
/// source gets to answer first.
pub struct DefaultsProcessor {
    source: Arc<dyn DefaultsSource>,
    holder_kind: String,
}

impl DefaultsProcessor {
    /// Create a processor for holders of the given type
    pub fn new(source: Arc<dyn DefaultsSource>, holder_kind: impl Into<String>) -> Self {
        Self {
            source,
            holder_kind: holder_kind.into(),
        }
    }
}

impl PermissionProcessor for DefaultsProcessor {
    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        if !context.flags().apply_defaults {
            return Ok(TristateResult::undefined());
        }

        let verdict = self
            .source
            .type_default(&self.holder_kind, permission, context);
        if verdict.is_definite() {
            return Ok(TristateResult::new(verdict, ORIGIN).with_reason("type defaults"));
        }

        let verdict = self.source.root_default(permission, context);
        if verdict.is_definite() {
            return Ok(TristateResult::new(verdict, ORIGIN).with_reason("root defaults"));
        }

        Ok(TristateResult::undefined())
    }
}
