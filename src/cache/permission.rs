//! Per-context permission result cache
//!
//! `PermissionCache` memoizes `permission string -> TristateResult` under
//! exactly one frozen `EffectiveContext`. All entries in one instance were
//! computed under that context; the cache never mixes contexts. There is no
//! TTL or LRU policy - correctness depends entirely on wholesale invalidation
//! by the owning session when the underlying data changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::context::EffectiveContext;
use crate::core::{CheckOrigin, EngineError, EngineResult, TristateResult};
use crate::processor::ProcessorChain;

/// Memoization layer over the processor chain for one effective context
///
/// Safe under concurrent reads and concurrent miss-triggered writes.
/// Concurrent misses on the same permission string collapse into a single
/// chain evaluation; misses on different strings proceed independently.
pub struct PermissionCache {
    context: EffectiveContext,
    chain: Arc<ProcessorChain>,
    entries: RwLock<HashMap<String, TristateResult>>,
    /// Per-key guards collapsing concurrent computations of the same miss
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PermissionCache {
    /// Create an empty cache for one context over the given chain
    pub fn new(context: EffectiveContext, chain: Arc<ProcessorChain>) -> Self {
        Self {
            context,
            chain,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The context every entry in this cache was computed under
    pub fn context(&self) -> &EffectiveContext {
        &self.context
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache holds no results
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Resolve a permission, computing and caching on miss
    ///
    /// The permission string is normalized to lowercase here, at the
    /// cache-key boundary; nodes compare case-insensitively everywhere. A
    /// blank permission is a precondition fault. A failed chain run
    /// populates nothing - the miss stays a miss for the next call.
    pub fn check_permission(
        &self,
        permission: &str,
        origin: CheckOrigin,
    ) -> EngineResult<TristateResult> {
        if permission.trim().is_empty() {
            return Err(EngineError::invalid_argument(
                "permission must not be blank",
            ));
        }
        let key = permission.to_lowercase();

        // Fast path: already computed
        if let Some(result) = self.entries.read().unwrap().get(&key) {
            tracing::trace!(
                permission = %key,
                origin = %origin,
                verdict = %result.verdict,
                "permission cache hit"
            );
            return Ok(result.clone());
        }

        // Miss: take the per-key guard so at most one chain evaluation runs
        // for this (context, permission) pair at a time
        let guard = {
            let mut in_flight = self.in_flight.lock().unwrap();
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _held = guard.lock().unwrap();

        // Another caller may have published while we waited on the guard
        if let Some(result) = self.entries.read().unwrap().get(&key) {
            return Ok(result.clone());
        }

        let outcome = self.chain.evaluate(&key, &self.context);
        match outcome {
            Ok(result) => {
                self.entries
                    .write()
                    .unwrap()
                    .insert(key.clone(), result.clone());
                self.in_flight.lock().unwrap().remove(&key);
                tracing::debug!(
                    permission = %key,
                    context = %self.context,
                    origin = %origin,
                    verdict = %result.verdict,
                    provenance = result.origin,
                    "permission computed"
                );
                Ok(result)
            }
            Err(err) => {
                self.in_flight.lock().unwrap().remove(&key);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCache")
            .field("context", &self.context)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tristate;
    use crate::processor::PermissionProcessor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    /// Grants everything, counting evaluations
    struct CountingProcessor {
        calls: Arc<AtomicUsize>,
        delay: Option<Duration>,
    }

    impl PermissionProcessor for CountingProcessor {
        fn origin(&self) -> &'static str {
            "counting"
        }

        fn evaluate(
            &self,
            _permission: &str,
            _context: &EffectiveContext,
        ) -> EngineResult<TristateResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                thread::sleep(delay);
            }
            Ok(TristateResult::new(Tristate::Grant, "counting"))
        }
    }

    struct FaultingOnce {
        failures_left: Arc<AtomicUsize>,
    }

    impl PermissionProcessor for FaultingOnce {
        fn origin(&self) -> &'static str {
            "faulting-once"
        }

        fn evaluate(
            &self,
            _permission: &str,
            _context: &EffectiveContext,
        ) -> EngineResult<TristateResult> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(EngineError::data_store("transient outage"));
            }
            Ok(TristateResult::new(Tristate::Deny, "faulting-once"))
        }
    }

    fn counting_cache(delay: Option<Duration>) -> (PermissionCache, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut chain = ProcessorChain::new();
        chain.register(
            CountingProcessor {
                calls: calls.clone(),
                delay,
            },
            0,
        );
        (
            PermissionCache::new(EffectiveContext::empty(), Arc::new(chain)),
            calls,
        )
    }

    #[test]
    fn test_hit_after_miss() {
        let (cache, calls) = counting_cache(None);

        let first = cache
            .check_permission("fly.use", CheckOrigin::Api)
            .unwrap();
        let second = cache
            .check_permission("fly.use", CheckOrigin::Api)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_case_normalization_shares_entry() {
        let (cache, calls) = counting_cache(None);

        cache.check_permission("Fly.Use", CheckOrigin::Api).unwrap();
        cache.check_permission("FLY.USE", CheckOrigin::Api).unwrap();
        cache.check_permission("fly.use", CheckOrigin::Api).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_blank_permission_is_precondition_fault() {
        let (cache, calls) = counting_cache(None);

        let err = cache.check_permission("", CheckOrigin::Api).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        let err = cache.check_permission("   ", CheckOrigin::Api).unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_miss_collapse() {
        let (cache, calls) = counting_cache(Some(Duration::from_millis(30)));
        let cache = Arc::new(cache);

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    cache.check_permission("fly.use", CheckOrigin::Api).unwrap()
                })
            })
            .collect();

        let results: Vec<TristateResult> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // One evaluation total, every caller observed the same result
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.verdict == Tristate::Grant));
    }

    #[test]
    fn test_distinct_keys_compute_independently() {
        let (cache, calls) = counting_cache(None);

        cache.check_permission("a", CheckOrigin::Api).unwrap();
        cache.check_permission("b", CheckOrigin::Api).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failed_computation_leaves_miss() {
        let failures = Arc::new(AtomicUsize::new(1));
        let mut chain = ProcessorChain::new();
        chain.register(
            FaultingOnce {
                failures_left: failures,
            },
            0,
        );
        let cache = PermissionCache::new(EffectiveContext::empty(), Arc::new(chain));

        let err = cache
            .check_permission("fly.use", CheckOrigin::Api)
            .unwrap_err();
        assert!(matches!(err, EngineError::DataStore(_)));
        assert!(cache.is_empty());

        // The miss stayed a miss; the next call recomputes and succeeds
        let result = cache
            .check_permission("fly.use", CheckOrigin::Api)
            .unwrap();
        assert_eq!(result.verdict, Tristate::Deny);
        assert_eq!(cache.len(), 1);
    }
}
