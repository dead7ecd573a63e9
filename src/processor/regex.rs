//! Regex-shaped assignment nodes

use std::sync::Arc;

use regex::Regex;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, Tristate, TristateResult};
use crate::model::PermissionHolder;

use super::PermissionProcessor;

const ORIGIN: &str = "regex";

/// Prefix marking an assignment node as a regex pattern
const REGEX_PREFIX: &str = "regex:";

/// Answers from `regex:<pattern>` shaped assignments
///
/// Assignment nodes beginning with `regex:` are treated as anchored patterns
/// matched against the full checked permission. Matching entries are tried in
/// sorted node order so the outcome is deterministic when several patterns
/// match. A stored pattern that fails to compile is expected invalid input:
/// it is skipped with a warning, never a fault.
pub struct RegexProcessor {
    holder: Arc<dyn PermissionHolder>,
}

impl RegexProcessor {
    /// Create a processor reading the given holder's assignments
    pub fn new(holder: Arc<dyn PermissionHolder>) -> Self {
        Self { holder }
    }
}

impl PermissionProcessor for RegexProcessor {
    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        let map = self.holder.permission_map(context)?;

        let mut patterns: Vec<(&String, bool)> = map
            .iter()
            .filter(|(node, _)| node.starts_with(REGEX_PREFIX))
            .map(|(node, &value)| (node, value))
            .collect();
        patterns.sort_by(|a, b| a.0.cmp(b.0));

        for (node, value) in patterns {
            let pattern = &node[REGEX_PREFIX.len()..];
            let anchored = format!("^(?:{})$", pattern);
            let regex = match Regex::new(&anchored) {
                Ok(regex) => regex,
                Err(err) => {
                    tracing::warn!(node = %node, %err, "skipping unparseable regex node");
                    continue;
                }
            };
            if regex.is_match(permission) {
                return Ok(TristateResult::new(Tristate::from_bool(value), ORIGIN)
                    .with_reason(format!("matched {}", node)));
            }
        }
        Ok(TristateResult::undefined())
    }
}
