//! Process-local artifact cache shared across providers.
//!
//! Sharable providers that resolve (after redirects) to the same final
//! location and artifact type must observe identity-equal artifacts; this
//! module is the table making that true. It is an explicitly passed handle,
//! not a hidden global, so every test can inject a fresh store and embedders
//! can scope sharing however they like.
//!
//! Entries are keyed by `(final location, artifact type)` and never evicted
//! within the process lifetime; the table is bounded by the distinct
//! locations actually visited. Racing first-producers of the same key are
//! serialized per key, so a producer runs at most once per key even under
//! concurrent configuration.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::core::Error;
use crate::metadata::Metadata;

/// Identity of a cached artifact: where it came from and what type it is.
///
/// The type component keeps two producers yielding different artifact types
/// from colliding on the same location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The final, post-redirect location the artifact was produced from.
    pub location: String,
    /// The produced artifact type.
    pub kind: TypeId,
}

impl CacheKey {
    /// Builds a key for artifact type `A` at `location`.
    #[must_use]
    pub fn new<A: Any>(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            kind: TypeId::of::<A>(),
        }
    }
}

/// A produced artifact together with the metadata of the producing run.
#[derive(Clone)]
pub struct CacheEntry {
    /// The type-erased artifact; downcast with the type named in the key.
    pub artifact: Arc<dyn Any + Send + Sync>,
    /// Metadata accumulated by the resolution that produced the artifact.
    pub metadata: Metadata,
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("artifact", &"<opaque>")
            .field("metadata", &self.metadata)
            .finish()
    }
}

type Slot = Arc<Mutex<Option<CacheEntry>>>;

/// Cheap-to-clone handle over the shared artifact table.
///
/// Clones share the same underlying table; hand one clone to every provider
/// that should participate in sharing.
///
/// # Examples
///
/// ```rust
/// use larc::cache::{ArtifactCache, CacheEntry, CacheKey};
/// use larc::metadata::Metadata;
/// use std::sync::Arc;
///
/// let cache = ArtifactCache::new();
/// let key = CacheKey::new::<String>("mem:en.map");
///
/// let (entry, produced) = cache
///     .get_or_produce(key.clone(), || {
///         Ok(CacheEntry {
///             artifact: Arc::new("artifact".to_string()),
///             metadata: Metadata::new(),
///         })
///     })
///     .unwrap();
/// assert!(produced);
///
/// // Second access reuses the stored artifact without producing.
/// let (again, produced) = cache.get_or_produce(key, || unreachable!()).unwrap();
/// assert!(!produced);
/// assert!(Arc::ptr_eq(&entry.artifact, &again.artifact));
/// ```
#[derive(Clone, Default)]
pub struct ArtifactCache {
    entries: Arc<DashMap<CacheKey, Slot>>,
}

impl ArtifactCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry under `key`, producing and storing it on a miss.
    ///
    /// The boolean is `true` when `produce` ran. Production happens while
    /// holding only that key's slot lock: concurrent callers of the same key
    /// wait for the first producer instead of producing divergent artifacts,
    /// and callers of other keys proceed untouched. A failed production
    /// leaves the slot empty, so the next caller retries.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `produce`.
    pub fn get_or_produce(
        &self,
        key: CacheKey,
        produce: impl FnOnce() -> Result<CacheEntry, Error>,
    ) -> Result<(CacheEntry, bool), Error> {
        let slot = self.entries.entry(key.clone()).or_default().clone();
        // The shard guard is gone; only this key's slot is held from here on.
        let mut guard = slot.lock();

        if let Some(entry) = guard.as_ref() {
            debug!(location = %key.location, "artifact cache hit");
            return Ok((entry.clone(), false));
        }

        debug!(location = %key.location, "artifact cache miss, producing");
        let entry = produce()?;
        *guard = Some(entry.clone());
        Ok((entry, true))
    }

    /// Returns the entry under `key` without producing on a miss.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).and_then(|slot| slot.lock().clone())
    }

    /// Returns `true` if an artifact is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored artifacts (slots whose production completed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.value().lock().is_some()).count()
    }

    /// Returns `true` if no artifact is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactCache").field("slots", &self.entries.len()).finish()
    }
}
