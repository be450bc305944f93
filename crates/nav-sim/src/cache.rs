//! `EngineCache`: one routing engine per door configuration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use nav_building::Fingerprint;
use nav_router::{RouterResult, RoutingEngine};

use crate::{SimError, SimResult};

/// Engines keyed by [`Fingerprint`].  Entries are never replaced or evicted.
///
/// The lock is held while a missing engine is built, so concurrent callers
/// asking for the same fingerprint wait for the first build instead of
/// starting their own.
#[derive(Debug, Default)]
pub struct EngineCache {
    engines: Mutex<FxHashMap<Fingerprint, Arc<RoutingEngine>>>,
    builds:  AtomicUsize,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fp: &Fingerprint) -> Option<Arc<RoutingEngine>> {
        self.engines.lock().get(fp).cloned()
    }

    pub fn contains(&self, fp: &Fingerprint) -> bool {
        self.engines.lock().contains_key(fp)
    }

    /// Return the engine for `fp`, running `build` first if there is none.
    /// The flag is `true` when this call built it.  A failed build leaves
    /// the cache unchanged.
    pub fn get_or_build<F>(&self, fp: &Fingerprint, build: F) -> SimResult<(Arc<RoutingEngine>, bool)>
    where
        F: FnOnce() -> RouterResult<RoutingEngine>,
    {
        let mut engines = self.engines.lock();
        if let Some(e) = engines.get(fp) {
            tracing::debug!(fingerprint = %fp, "engine cache hit");
            return Ok((Arc::clone(e), false));
        }
        let engine = build().map_err(|source| SimError::EngineBuild { fingerprint: fp.clone(), source })?;
        let engine = Arc::new(engine);
        engines.insert(fp.clone(), Arc::clone(&engine));
        let n = self.builds.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(fingerprint = %fp, builds = n, "engine built");
        Ok((engine, true))
    }

    /// Engines constructed so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.engines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.lock().is_empty()
    }
}
