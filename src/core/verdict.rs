//! Tri-state verdicts and their provenance
//!
//! Core value types for permission resolution:
//! - `Tristate` - grant / deny / undefined
//! - `TristateResult` - a verdict plus which processor produced it and why
//! - `CheckOrigin` - where a permission check came from (observability only)

use serde::{Deserialize, Serialize};

/// A tri-state permission verdict
///
/// `Grant` and `Deny` are definitive. `Undefined` means "no rule source
/// expressed an opinion" and must never be coerced to a boolean without an
/// explicit default policy - see [`Tristate::holds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tristate {
    /// The permission is granted
    Grant,
    /// The permission is denied
    Deny,
    /// No rule source expressed an opinion
    Undefined,
}

impl Tristate {
    /// Convert a definite boolean into a verdict
    pub fn from_bool(value: bool) -> Self {
        if value {
            Tristate::Grant
        } else {
            Tristate::Deny
        }
    }

    /// Convert to a boolean, if the verdict is definite
    pub fn as_option(self) -> Option<bool> {
        match self {
            Tristate::Grant => Some(true),
            Tristate::Deny => Some(false),
            Tristate::Undefined => None,
        }
    }

    /// Convert to a boolean with a caller-chosen policy for `Undefined`
    ///
    /// The engine imposes no default policy; callers that need a plain
    /// boolean state theirs here.
    pub fn holds(self, undefined_default: bool) -> bool {
        self.as_option().unwrap_or(undefined_default)
    }

    /// Whether this verdict is definite (not `Undefined`)
    pub fn is_definite(self) -> bool {
        self != Tristate::Undefined
    }
}

impl std::fmt::Display for Tristate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tristate::Grant => write!(f, "grant"),
            Tristate::Deny => write!(f, "deny"),
            Tristate::Undefined => write!(f, "undefined"),
        }
    }
}

/// A verdict together with its provenance
///
/// `origin` names the processor that produced the verdict and `reason` is an
/// optional human-readable explanation. Provenance is carried through to the
/// final answer for observability and auditing; it never participates in
/// caching decisions (caches key on context and permission string only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TristateResult {
    /// The verdict
    pub verdict: Tristate,
    /// Tag of the processor that produced the verdict
    pub origin: &'static str,
    /// Optional human-readable reason
    pub reason: Option<String>,
}

/// Origin tag used for results no processor produced
const ORIGIN_NONE: &str = "none";

impl TristateResult {
    /// Create a result with a verdict and processor origin
    pub fn new(verdict: Tristate, origin: &'static str) -> Self {
        Self {
            verdict,
            origin,
            reason: None,
        }
    }

    /// The chain's "no opinion" sentinel
    pub fn undefined() -> Self {
        Self::new(Tristate::Undefined, ORIGIN_NONE)
    }

    /// Attach a reason to this result
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether the verdict is definite (not `Undefined`)
    pub fn is_definite(&self) -> bool {
        self.verdict.is_definite()
    }
}

/// Where a permission check originated
///
/// Attached to cache lookups for trace logging only; it has no effect on the
/// computed verdict or on caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOrigin {
    /// Check issued through the public API surface
    Api,
    /// Check issued while dispatching a command
    Command,
    /// Check issued internally by the engine or host
    Internal,
    /// Check issued by a host-platform lookup
    PlatformLookup,
}

impl std::fmt::Display for CheckOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOrigin::Api => write!(f, "api"),
            CheckOrigin::Command => write!(f, "command"),
            CheckOrigin::Internal => write!(f, "internal"),
            CheckOrigin::PlatformLookup => write!(f, "platform-lookup"),
        }
    }
}
