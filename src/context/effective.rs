//! Effective context values
//!
//! An `EffectiveContext` is the frozen set of situational key-value facts
//! (e.g. `world=nether`, `server=survival`) plus resolution flags under which
//! a permission question is asked. It is used as a cache key, so equality and
//! hashing are structural and deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resolution flags carried alongside the context pairs
///
/// Flags participate in equality and hashing: two contexts with the same
/// pairs but different flags are different cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextFlags {
    /// Include assignments that carry no context of their own
    pub include_global: bool,
    /// Allow the defaults processor to answer under this context
    pub apply_defaults: bool,
}

impl Default for ContextFlags {
    fn default() -> Self {
        Self {
            include_global: true,
            apply_defaults: true,
        }
    }
}

/// An immutable, unordered set of key-value context pairs plus flags
///
/// Keys and values are normalized to lowercase at insertion; permission
/// context comparison is case-insensitive throughout the engine. Pairs are
/// stored in a `BTreeMap` so iteration order, equality, and hashing are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EffectiveContext {
    pairs: BTreeMap<String, String>,
    flags: ContextFlags,
}

impl EffectiveContext {
    /// The empty context with default flags
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a context
    pub fn builder() -> EffectiveContextBuilder {
        EffectiveContextBuilder::default()
    }

    /// Get the value for a context key (key lookup is lowercased)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Whether the context contains the given key-value pair
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value.to_lowercase().as_str())
    }

    /// Number of context pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the context has no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over the pairs in deterministic (sorted) order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The resolution flags
    pub fn flags(&self) -> ContextFlags {
        self.flags
    }
}

impl std::fmt::Display for EffectiveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, value) in &self.pairs {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        if first {
            write!(f, "(global)")?;
        }
        Ok(())
    }
}

/// Builder for `EffectiveContext`
#[derive(Debug, Default)]
pub struct EffectiveContextBuilder {
    pairs: BTreeMap<String, String>,
    flags: ContextFlags,
}

impl EffectiveContextBuilder {
    /// Add a key-value pair (both lowercased)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs
            .insert(key.into().to_lowercase(), value.into().to_lowercase());
        self
    }

    /// Set the resolution flags
    pub fn flags(mut self, flags: ContextFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Freeze into an `EffectiveContext`
    pub fn build(self) -> EffectiveContext {
        EffectiveContext {
            pairs: self.pairs,
            flags: self.flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(ctx: &EffectiveContext) -> u64 {
        let mut hasher = DefaultHasher::new();
        ctx.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_builder_and_lookup() {
        let ctx = EffectiveContext::builder()
            .with("world", "nether")
            .with("server", "survival")
            .build();

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("world"), Some("nether"));
        assert!(ctx.contains("server", "survival"));
        assert!(!ctx.contains("server", "creative"));
    }

    #[test]
    fn test_keys_and_values_lowercased() {
        let ctx = EffectiveContext::builder().with("World", "Nether").build();

        assert_eq!(ctx.get("world"), Some("nether"));
        assert_eq!(ctx.get("WORLD"), Some("nether"));
        assert!(ctx.contains("world", "NETHER"));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = EffectiveContext::builder()
            .with("world", "nether")
            .with("server", "survival")
            .build();
        // Insertion order must not matter
        let b = EffectiveContext::builder()
            .with("server", "survival")
            .with("world", "nether")
            .build();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_flags_participate_in_equality() {
        let a = EffectiveContext::builder().with("world", "nether").build();
        let b = EffectiveContext::builder()
            .with("world", "nether")
            .flags(ContextFlags {
                include_global: false,
                apply_defaults: true,
            })
            .build();

        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_context() {
        let ctx = EffectiveContext::empty();
        assert!(ctx.is_empty());
        assert_eq!(ctx.len(), 0);
        assert_eq!(ctx.to_string(), "(global)");
        assert!(ctx.flags().include_global);
        assert!(ctx.flags().apply_defaults);
    }

    #[test]
    fn test_display() {
        let ctx = EffectiveContext::builder()
            .with("world", "nether")
            .with("server", "survival")
            .build();
        // BTreeMap iteration is sorted by key
        assert_eq!(ctx.to_string(), "server=survival, world=nether");
    }

    #[test]
    fn test_serde_round_trip() {
        let ctx = EffectiveContext::builder()
            .with("world", "nether")
            .flags(ContextFlags {
                include_global: false,
                apply_defaults: true,
            })
            .build();

        let json = serde_json::to_string(&ctx).unwrap();
        let back: EffectiveContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
