//! Context-sensitive resource location, redirect following, and shared
//! artifact caching.
//!
//! larc resolves a logical resource description ("the tagger model for the
//! document's language, mapped to my tagset") into a concrete artifact in
//! four steps:
//!
//! 1. **Aggregate**: merge configuration for the current
//!    [`ResolutionContext`] from overrides, imported values, context
//!    attributes, per-language variant fallbacks, and defaults.
//! 2. **Interpolate**: expand `${key}` placeholders in the location
//!    template against the aggregated configuration.
//! 3. **Resolve**: route the location to a [`ResourceLoader`] and follow
//!    redirect descriptors to the final document, merging descriptor
//!    metadata along the way.
//! 4. **Produce**: hand the payload to the provider's [`Producer`], or
//!    share the artifact another provider already produced for the same
//!    location and type through an [`ArtifactCache`].
//!
//! The entry point is [`ResourceProvider`]; the [`provider`] module
//! documentation walks through a complete example.

pub mod cache;
pub mod constants;
pub mod context;
pub mod core;
pub mod interpolate;
pub mod loader;
pub mod metadata;
pub mod producer;
pub mod provider;

mod redirect;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::{ArtifactCache, CacheEntry, CacheKey};
pub use context::{Context, ResolutionContext};
pub use crate::core::{Error, LoadError, Outcome, ProducerFailure, ProviderId};
pub use interpolate::interpolate;
pub use loader::{FileLoader, HttpLoader, MemoryLoader, ResourceLoader, SchemeRouter};
pub use metadata::Metadata;
pub use producer::{Producer, ProducerInput};
pub use provider::{ImportSource, ImportTrail, Override, ProviderSpec, ResourceProvider};
