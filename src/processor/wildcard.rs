//! Parent wildcard resolution

use std::sync::Arc;

use crate::context::EffectiveContext;
use crate::core::{EngineResult, Tristate, TristateResult};
use crate::model::PermissionHolder;

use super::PermissionProcessor;

const ORIGIN: &str = "wildcard";

/// Answers from parent wildcard assignments
///
/// For a check of `a.b.c` the holder's map is consulted for `a.b.*`, then
/// `a.*`, then the root wildcard `*`; the nearest parent wins. Runs after
/// the map processor so an exact assignment always beats a wildcard.
pub struct WildcardProcessor {
    holder: Arc<dyn PermissionHolder>,
}

impl WildcardProcessor {
    /// Create a processor reading the given holder's assignments
    pub fn new(holder: Arc<dyn PermissionHolder>) -> Self {
        Self { holder }
    }
}

/// Parent wildcards of a permission node, nearest first
///
/// `a.b.c` yields `a.b.*`, `a.*`, `*`.
fn parent_wildcards(permission: &str) -> impl Iterator<Item = String> + '_ {
    let mut next = Some(permission);
    std::iter::from_fn(move || {
        let current = next?;
        match current.rfind('.') {
            Some(idx) => {
                next = Some(&current[..idx]);
                Some(format!("{}.*", &current[..idx]))
            }
            None => {
                next = None;
                Some("*".to_string())
            }
        }
    })
}

impl PermissionProcessor for WildcardProcessor {
    fn origin(&self) -> &'static str {
        ORIGIN
    }

    fn evaluate(
        &self,
        permission: &str,
        context: &EffectiveContext,
    ) -> EngineResult<TristateResult> {
        // A wildcard node itself is answered by the map processor, not here
        if permission == "*" || permission.ends_with(".*") {
            return Ok(TristateResult::undefined());
        }

        let map = self.holder.permission_map(context)?;
        for wildcard in parent_wildcards(permission) {
            if let Some(&value) = map.get(&wildcard) {
                return Ok(TristateResult::new(Tristate::from_bool(value), ORIGIN)
                    .with_reason(format!("matched {}", wildcard)));
            }
        }
        Ok(TristateResult::undefined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::StubHolder;

    #[test]
    fn test_parent_wildcards_order() {
        let parents: Vec<String> = parent_wildcards("a.b.c").collect();
        assert_eq!(parents, vec!["a.b.*", "a.*", "*"]);

        let parents: Vec<String> = parent_wildcards("solo").collect();
        assert_eq!(parents, vec!["*"]);
    }

    #[test]
    fn test_nearest_parent_wins() {
        let holder = Arc::new(
            StubHolder::new("alice", "user")
                .with_permission("a.*", true)
                .with_permission("a.b.*", false),
        );
        let processor = WildcardProcessor::new(holder);

        let result = processor
            .evaluate("a.b.c", &EffectiveContext::empty())
            .unwrap();
        assert_eq!(result.verdict, Tristate::Deny);
        assert_eq!(result.reason.as_deref(), Some("matched a.b.*"));
    }

    #[test]
    fn test_root_wildcard_fallback() {
        let holder = Arc::new(StubHolder::new("alice", "user").with_permission("*", true));
        let processor = WildcardProcessor::new(holder);

        let result = processor
            .evaluate("anything.at.all", &EffectiveContext::empty())
            .unwrap();
        assert_eq!(result.verdict, Tristate::Grant);
        assert_eq!(result.origin, "wildcard");
    }

    #[test]
    fn test_no_wildcard_defers() {
        let holder =
            Arc::new(StubHolder::new("alice", "user").with_permission("a.b.c", true));
        let processor = WildcardProcessor::new(holder);

        // Exact assignments are the map processor's concern
        let result = processor
            .evaluate("a.b.c", &EffectiveContext::empty())
            .unwrap();
        assert_eq!(result.verdict, Tristate::Undefined);
    }

    #[test]
    fn test_wildcard_check_itself_defers() {
        let holder = Arc::new(StubHolder::new("alice", "user").with_permission("*", true));
        let processor = WildcardProcessor::new(holder);

        let result = processor
            .evaluate("a.*", &EffectiveContext::empty())
            .unwrap();
        assert_eq!(result.verdict, Tristate::Undefined);
    }
}
