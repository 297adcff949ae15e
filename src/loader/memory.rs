//! In-process resource loading under the `mem:` scheme.

use std::io::{Cursor, Read};
use std::sync::Arc;

use dashmap::DashMap;

use super::{LoadError, ResourceLoader};

/// Location prefix served by [`MemoryLoader`].
pub const MEM_SCHEME: &str = "mem:";

/// Serves named byte blobs from an in-process registry.
///
/// The in-memory analog of a classpath: resources registered once at startup
/// (or in a test fixture) and looked up by name. Clones share the same
/// registry, so a loader handed to several providers sees every insertion.
///
/// Locations may carry the `mem:` scheme or be bare names; both resolve to
/// the same entry.
///
/// # Examples
///
/// ```rust
/// use larc::loader::{MemoryLoader, ResourceLoader};
///
/// let blobs = MemoryLoader::new();
/// blobs.insert_text("tagsets/en.map", "NN=NOUN\n");
///
/// assert!(blobs.open("mem:tagsets/en.map").is_ok());
/// assert!(blobs.open("tagsets/en.map").is_ok());
/// assert!(blobs.open("mem:absent").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryLoader {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a blob under `name`, replacing any previous content.
    ///
    /// The `mem:` scheme is stripped first, so a blob registered under
    /// `mem:x` and one registered under `x` are the same entry.
    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let name = name.into();
        self.entries.insert(Self::strip_scheme(&name).to_string(), bytes.into());
    }

    /// Registers UTF-8 text under `name`.
    pub fn insert_text(&self, name: impl Into<String>, text: impl Into<String>) {
        self.insert(name, text.into().into_bytes());
    }

    /// Returns `true` if a blob is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(Self::strip_scheme(name))
    }

    /// Number of registered blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no blobs are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn strip_scheme(location: &str) -> &str {
        location.strip_prefix(MEM_SCHEME).unwrap_or(location)
    }
}

impl ResourceLoader for MemoryLoader {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError> {
        let name = Self::strip_scheme(location);
        match self.entries.get(name) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.value().clone()))),
            None => Err(LoadError::not_found(location)),
        }
    }
}
