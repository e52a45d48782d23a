//! Session-scoped memoization caches for root resolution.
//!
//! Resolving a reverse-conjugation candidate hits the backing store twice
//! (root form → root id, root id → verbs). Both lookups repeat heavily
//! across keystrokes within a session, so each coordinator owns one
//! [`RootIdCache`] and one [`VerbsOfRootCache`]. Entries are never
//! invalidated within a session; the caches die with the coordinator.
//!
//! Backed by [`moka`], which also supplies the synchronization needed to
//! share a coordinator across tasks. Created per coordinator, never as
//! module-level singletons.

use std::sync::Arc;

use moka::future::Cache;

use crate::error::SearchError;
use crate::store::LexiconStore;
use crate::types::{RootId, VerbRecord};

/// Memoizing lookup from a canonical root form to its backing-store id.
///
/// Only *successful* resolutions are cached: a root the store does not
/// know is re-queried on the next use, so data added mid-session is
/// picked up.
pub struct RootIdCache {
    inner: Cache<String, RootId>,
}

impl RootIdCache {
    /// Create a cache holding at most `capacity` resolved roots.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Resolve `canonical` through the cache, querying `store` on a miss.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchError::AmbiguousRoot`] and store failures from
    /// the underlying lookup. Errors are never cached.
    pub async fn resolve<S: LexiconStore>(
        &self,
        store: &S,
        canonical: &str,
    ) -> Result<Option<RootId>, SearchError> {
        if let Some(id) = self.inner.get(canonical).await {
            return Ok(Some(id));
        }
        match store.try_find_root_id(canonical).await? {
            Some(id) => {
                self.inner.insert(canonical.to_string(), id).await;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }
}

/// Memoizing lookup from a root id to the verbs derived from that root.
///
/// Values are `Arc`-wrapped so cache hits are cheap and the verb lists
/// can be scanned without cloning records.
pub struct VerbsOfRootCache {
    inner: Cache<RootId, Arc<Vec<VerbRecord>>>,
}

impl VerbsOfRootCache {
    /// Create a cache holding verb lists for at most `capacity` roots.
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Fetch the verbs of `root_id` through the cache, querying `store`
    /// on a miss.
    ///
    /// An empty verb list is a valid, cacheable answer: the root exists
    /// but has no verbs yet.
    pub async fn verbs<S: LexiconStore>(
        &self,
        store: &S,
        root_id: RootId,
    ) -> Result<Arc<Vec<VerbRecord>>, SearchError> {
        if let Some(verbs) = self.inner.get(&root_id).await {
            return Ok(verbs);
        }
        let verbs = Arc::new(store.verbs_of_root(root_id).await?);
        self.inner.insert(root_id, Arc::clone(&verbs)).await;
        Ok(verbs)
    }
}
