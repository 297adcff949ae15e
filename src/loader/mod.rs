//! Resource loaders turning location strings into byte streams.
//!
//! A location is an opaque string whose prefix selects the transport:
//! `file:` and bare paths hit the filesystem, `http://`/`https://` fetch over
//! the network, `mem:` reads from an in-process registry. Providers hold a
//! single [`ResourceLoader`] and never inspect locations themselves; the
//! [`SchemeRouter`] composes the shipped backends behind that one interface.
//!
//! # Architecture
//!
//! - [`ResourceLoader`] - the object-safe trait every backend implements
//! - [`SchemeRouter`] - prefix-dispatch composition of backends
//! - [`FileLoader`](file::FileLoader) - filesystem paths and `file:` URLs,
//!   with `~` and environment variable expansion
//! - [`HttpLoader`](http::HttpLoader) - `http(s)://` URLs over a blocking
//!   client
//! - [`MemoryLoader`](memory::MemoryLoader) - named in-process byte blobs
//!   under the `mem:` scheme
//!
//! # Examples
//!
//! ```rust
//! use larc::loader::{memory::MemoryLoader, ResourceLoader, SchemeRouter};
//! use std::io::Read;
//!
//! let blobs = MemoryLoader::new();
//! blobs.insert_text("greeting", "hello");
//!
//! let router = SchemeRouter::standard().route("mem:", blobs);
//! let mut stream = router.open("mem:greeting").unwrap();
//!
//! let mut content = String::new();
//! stream.read_to_string(&mut content).unwrap();
//! assert_eq!(content, "hello");
//! ```

pub mod file;
pub mod http;
pub mod memory;

pub use crate::core::error::LoadError;
pub use file::FileLoader;
pub use http::HttpLoader;
pub use memory::MemoryLoader;

use std::io::Read;
use std::sync::Arc;

use tracing::trace;

/// Turns a location string into a readable byte stream.
///
/// Implementations distinguish a location that does not exist
/// ([`LoadError::NotFound`]) from one that exists but cannot be opened; only
/// the former participates in the not-required downgrade during resolution.
pub trait ResourceLoader: Send + Sync {
    /// Opens the location for reading.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] if nothing lives at `location`, and
    /// [`LoadError::Io`]/[`LoadError::Other`] for failures while opening it.
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError>;
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Arc<T> {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError> {
        (**self).open(location)
    }
}

/// Dispatches locations to backends by string prefix.
///
/// The longest matching registered prefix wins; locations matching no prefix
/// go to the fallback loader when one is set, and report
/// [`LoadError::NotFound`] otherwise. Backends receive the full location
/// string and strip their own scheme, so a backend can also be used directly
/// without a router in front of it.
///
/// [`SchemeRouter::standard`] wires the filesystem and HTTP backends the way
/// most embedders want them; test code usually adds a `mem:` route on top.
#[derive(Clone, Default)]
pub struct SchemeRouter {
    routes: Vec<(String, Arc<dyn ResourceLoader>)>,
    fallback: Option<Arc<dyn ResourceLoader>>,
}

impl SchemeRouter {
    /// Creates a router with no routes and no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the standard router: `file:` and bare paths on the
    /// filesystem, `http://` and `https://` over HTTP.
    #[must_use]
    pub fn standard() -> Self {
        let http = Arc::new(HttpLoader::new());
        Self::new()
            .route("file:", FileLoader::new())
            .route_arc("http://", http.clone())
            .route_arc("https://", http)
            .with_fallback(FileLoader::new())
    }

    /// Registers a backend for every location starting with `prefix`.
    #[must_use]
    pub fn route(self, prefix: impl Into<String>, loader: impl ResourceLoader + 'static) -> Self {
        self.route_arc(prefix, Arc::new(loader))
    }

    /// Registers an already-shared backend for `prefix`.
    #[must_use]
    pub fn route_arc(mut self, prefix: impl Into<String>, loader: Arc<dyn ResourceLoader>) -> Self {
        self.routes.push((prefix.into(), loader));
        self
    }

    /// Sets the backend used for locations matching no registered prefix.
    #[must_use]
    pub fn with_fallback(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.fallback = Some(Arc::new(loader));
        self
    }

    /// Returns the backend responsible for `location`, if any.
    fn select(&self, location: &str) -> Option<&Arc<dyn ResourceLoader>> {
        self.routes
            .iter()
            .filter(|(prefix, _)| location.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, loader)| loader)
            .or(self.fallback.as_ref())
    }
}

impl ResourceLoader for SchemeRouter {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError> {
        match self.select(location) {
            Some(loader) => {
                trace!(location, "dispatching location to loader");
                loader.open(location)
            }
            None => Err(LoadError::not_found(location)),
        }
    }
}

impl std::fmt::Debug for SchemeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeRouter")
            .field("routes", &self.routes.iter().map(|(p, _)| p).collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}
