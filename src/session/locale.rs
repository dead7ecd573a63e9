//! Locale memoization
//!
//! A narrow convenience cache with the same "recompute on change, else reuse"
//! discipline as the permission cache, at much smaller scope: the session
//! remembers the entity's last reported language tag and the locale parsed
//! from it, and only re-parses when the tag string changes.

use serde::{Deserialize, Serialize};

/// A parsed locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Lowercase language code (e.g. `en`)
    pub language: String,
    /// Uppercase region code (e.g. `US`), if present
    pub region: Option<String>,
}

impl Locale {
    /// Parse a language tag of the shape `ll`, `ll_RR` or `ll-RR`
    ///
    /// Returns `None` for tags that do not carry a usable language code.
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parts = tag.trim().split(['_', '-']);
        let language = parts.next()?.to_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts
            .next()
            .filter(|r| !r.is_empty() && r.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_uppercase);
        Some(Self { language, region })
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

/// Resolves language tags to locales
///
/// The host's translation layer implements this; the session only memoizes
/// the result.
pub trait LocaleResolver: Send + Sync {
    /// Parse a language tag, returning `None` for unusable tags
    fn resolve(&self, tag: &str) -> Option<Locale>;
}

/// Default resolver: plain tag parsing, no translation-table lookup
#[derive(Debug, Default, Clone, Copy)]
pub struct TagParser;

impl LocaleResolver for TagParser {
    fn resolve(&self, tag: &str) -> Option<Locale> {
        Locale::parse(tag)
    }
}

/// The memo cell: the tag a locale was resolved from, and the outcome
#[derive(Debug, Clone)]
pub(crate) struct LocaleEntry {
    pub tag: String,
    pub locale: Option<Locale>,
}
