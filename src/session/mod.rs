//! Session management
//!
//! This module provides the per-connected-entity attachment:
//! - `Session` - the lifecycle state machine and permission-check surface
//! - `SessionRegistry` - the host-owned entity-identity -> session map
//! - `Locale` / `LocaleResolver` - locale memoization support

pub mod locale;
pub mod registry;
pub mod session;

pub use locale::{Locale, LocaleResolver, TagParser};
pub use registry::SessionRegistry;
pub use session::{Session, SessionStatus};
