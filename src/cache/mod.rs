//! Permission result caching
//!
//! `PermissionCache` memoizes chain verdicts for one effective context. It is
//! created, owned, and wholesale-discarded by the session layer; nothing here
//! evicts entry-by-entry.

pub mod permission;

pub use permission::PermissionCache;
