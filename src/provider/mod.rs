//! Context-sensitive resource providers.
//!
//! A [`ResourceProvider`] owns the full pipeline for one logical resource:
//! it aggregates configuration from its precedence tiers, interpolates the
//! location template, follows redirect descriptors to the concrete resource,
//! and hands the payload to its [`Producer`] for materialization. Repeated
//! [`configure`](ResourceProvider::configure) calls are cheap: when the
//! resolved location is unchanged and an artifact is already in hand, the
//! provider reports [`Outcome::Unchanged`] without touching the loader or
//! the producer.
//!
//! Providers compose through imports: a provider can bind a configuration
//! key to another provider's resolved metadata, so a tagger model provider
//! can, for example, pick its mapping file based on the tagset the model
//! resource declares. Import resolution is depth-first with cycle
//! detection.
//!
//! # Examples
//!
//! ```
//! use larc::context::Context;
//! use larc::loader::MemoryLoader;
//! use larc::producer::{Producer, ProducerFailure, ProducerInput};
//! use larc::provider::ResourceProvider;
//!
//! struct TextProducer;
//!
//! impl Producer for TextProducer {
//!     type Output = String;
//!
//!     fn produce(&self, input: ProducerInput<'_>) -> Result<String, ProducerFailure> {
//!         Ok(input.text()?)
//!     }
//! }
//!
//! let blobs = MemoryLoader::new();
//! blobs.insert_text("en-v2.map", "NN = NOUN\n");
//!
//! let provider = ResourceProvider::new("pos-mapping", TextProducer)
//!     .with_loader(blobs)
//!     .with_location("mem:${language}-${variant}.map")
//!     .with_default_variant("en", "v2");
//!
//! let outcome = provider.configure(&Context::new().with_language("en"))?;
//! assert!(outcome.is_available());
//! assert_eq!(provider.artifact().unwrap().as_str(), "NN = NOUN\n");
//! # Ok::<(), larc::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{ArtifactCache, CacheEntry, CacheKey};
use crate::constants::{LOCATION_KEY, VARIANT_KEY};
use crate::context::ResolutionContext;
use crate::core::{Error, Outcome, ProviderId};
use crate::interpolate::{find_similar_keys, interpolate};
use crate::loader::{ResourceLoader, SchemeRouter};
use crate::metadata::Metadata;
use crate::producer::{Producer, ProducerInput};
use crate::redirect::{self, FollowResult};

mod aggregate;
pub mod spec;

pub use spec::ProviderSpec;

/// A per-key override, the highest precedence tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// Forces the key to this value, shadowing every other tier.
    Value(String),
    /// Marks the key optional without contributing a value.
    ///
    /// Lower tiers still apply if they can. When the key stays unresolved,
    /// or names a resource that does not exist, `configure` reports
    /// [`Outcome::NotAvailable`] instead of failing.
    NotRequired,
}

/// A source a provider can import configuration values from.
///
/// [`ResourceProvider`] implements this, so providers chain directly. The
/// trail carries the providers already being configured further up the
/// import chain and is how cycles are caught.
pub trait ImportSource: Send + Sync {
    /// Stable identity of the source, used for cycle detection.
    fn id(&self) -> ProviderId;

    /// Human-readable name for error chains.
    fn name(&self) -> &str;

    /// Configures the source for `context` and reads one metadata value.
    ///
    /// Returns `Ok(None)` when the source is not available or its metadata
    /// lacks `metadata_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to configure or the trail
    /// already contains this source.
    fn resolve_import(
        &self,
        context: &dyn ResolutionContext,
        trail: &ImportTrail,
        metadata_key: &str,
    ) -> Result<Option<String>, Error>;
}

/// Providers currently being configured along one import chain.
///
/// Passed down during depth-first import resolution. A provider asked to
/// resolve an import while already on the trail is a cycle.
#[derive(Debug, Clone, Default)]
pub struct ImportTrail {
    visited: Vec<(ProviderId, String)>,
}

impl ImportTrail {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is already on the trail.
    #[must_use]
    pub fn contains(&self, id: ProviderId) -> bool {
        self.visited.iter().any(|(visited, _)| *visited == id)
    }

    /// Returns a new trail with `id` appended.
    #[must_use]
    pub fn pushed(&self, id: ProviderId, name: &str) -> Self {
        let mut visited = self.visited.clone();
        visited.push((id, name.to_string()));
        Self { visited }
    }

    /// Renders the trail as a chain closing back on `name`.
    #[must_use]
    pub fn chain_through(&self, name: &str) -> String {
        self.visited
            .iter()
            .map(|(_, visited)| visited.as_str())
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// One import binding: a configuration key fed from a source's metadata.
#[derive(Clone)]
struct Import {
    config_key: String,
    metadata_key: String,
    source: Arc<dyn ImportSource>,
}

/// Mutable provider state, guarded by the provider's lock.
struct Inner<A> {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, Override>,
    variant_key: String,
    default_variants: BTreeMap<String, String>,
    imports: Vec<Import>,
    resolved_configuration: BTreeMap<String, String>,
    resolved_metadata: Metadata,
    last_template_location: Option<String>,
    last_resolved_location: Option<String>,
    artifact: Option<Arc<A>>,
}

impl<A> Inner<A> {
    fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
            variant_key: VARIANT_KEY.to_string(),
            default_variants: BTreeMap::new(),
            imports: Vec::new(),
            resolved_configuration: BTreeMap::new(),
            resolved_metadata: Metadata::new(),
            last_template_location: None,
            last_resolved_location: None,
            artifact: None,
        }
    }

    /// Commits the not-available state: no artifact, no metadata, and no
    /// remembered location, so a later successful configure re-resolves.
    fn commit_not_available(&mut self) {
        self.artifact = None;
        self.resolved_metadata = Metadata::new();
        self.last_template_location = None;
        self.last_resolved_location = None;
    }
}

/// A configurable, context-sensitive provider for one resource.
///
/// See the [module documentation](self) for the resolution pipeline and a
/// usage example.
pub struct ResourceProvider<P: Producer> {
    id: ProviderId,
    name: String,
    producer: P,
    loader: Arc<dyn ResourceLoader>,
    cache: Option<ArtifactCache>,
    inner: Mutex<Inner<P::Output>>,
}

impl<P: Producer> ResourceProvider<P> {
    /// Creates a provider with the standard loader routing and no cache.
    #[must_use]
    pub fn new(name: impl Into<String>, producer: P) -> Self {
        Self {
            id: ProviderId::new(),
            name: name.into(),
            producer,
            loader: Arc::new(SchemeRouter::standard()),
            cache: None,
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Builds a provider from a declarative spec.
    ///
    /// The cache is attached only when the spec marks the provider
    /// sharable.
    #[must_use]
    pub fn from_spec(
        name: impl Into<String>,
        spec: &ProviderSpec,
        producer: P,
        cache: &ArtifactCache,
    ) -> Self {
        let mut provider = Self::new(name, producer).with_spec(spec);
        if spec.sharable {
            provider.cache = Some(cache.clone());
        }
        provider
    }

    /// Replaces the loader.
    #[must_use]
    pub fn with_loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Replaces the loader with an already shared one.
    #[must_use]
    pub fn with_loader_arc(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Attaches a cache, making produced artifacts sharable across
    /// providers that resolve to the same location and artifact type.
    #[must_use]
    pub fn with_cache(mut self, cache: ArtifactCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the location template, shorthand for a `location` default.
    #[must_use]
    pub fn with_location(self, template: impl Into<String>) -> Self {
        self.with_default(LOCATION_KEY, template)
    }

    /// Adds a static default, the lowest precedence tier.
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.get_mut().defaults.insert(key.into(), value.into());
        self
    }

    /// Changes which key the per-language fallback table feeds.
    #[must_use]
    pub fn with_variant_key(mut self, key: impl Into<String>) -> Self {
        self.inner.get_mut().variant_key = key.into();
        self
    }

    /// Adds one per-language fallback for the variant key.
    #[must_use]
    pub fn with_default_variant(
        mut self,
        language: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        self.inner.get_mut().default_variants.insert(language.into(), variant.into());
        self
    }

    /// Applies a declarative spec on top of the current configuration.
    #[must_use]
    pub fn with_spec(mut self, spec: &ProviderSpec) -> Self {
        let inner = self.inner.get_mut();
        for (key, value) in &spec.defaults {
            inner.defaults.insert(key.clone(), value.clone());
        }
        if let Some(location) = &spec.location {
            inner.defaults.insert(LOCATION_KEY.to_string(), location.clone());
        }
        if let Some(variant_key) = &spec.variant_key {
            inner.variant_key = variant_key.clone();
        }
        for (language, variant) in &spec.default_variants {
            inner.default_variants.insert(language.clone(), variant.clone());
        }
        self
    }

    /// Sets an override value for `key`, shadowing every other tier.
    pub fn set_override(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().overrides.insert(key.into(), Override::Value(value.into()));
    }

    /// Marks `key` optional. Replaces any override value for the key.
    pub fn set_not_required(&self, key: impl Into<String>) {
        self.inner.lock().overrides.insert(key.into(), Override::NotRequired);
    }

    /// Removes any override, value or optionality marker, for `key`.
    pub fn clear_override(&self, key: &str) {
        self.inner.lock().overrides.remove(key);
    }

    /// Inserts or replaces a static default after construction.
    pub fn set_default(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().defaults.insert(key.into(), value.into());
    }

    /// Binds configuration key `key` to the same-named metadata value of
    /// `source`.
    pub fn add_import(&self, key: impl Into<String>, source: Arc<dyn ImportSource>) {
        let key = key.into();
        self.add_import_as(key.clone(), key, source);
    }

    /// Binds configuration key `config_key` to `metadata_key` in the
    /// source's resolved metadata.
    pub fn add_import_as(
        &self,
        config_key: impl Into<String>,
        metadata_key: impl Into<String>,
        source: Arc<dyn ImportSource>,
    ) {
        self.inner.lock().imports.push(Import {
            config_key: config_key.into(),
            metadata_key: metadata_key.into(),
            source,
        });
    }

    /// Stable identity of this provider.
    #[must_use]
    pub fn id(&self) -> ProviderId {
        self.id
    }

    /// The name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if a cache is attached.
    #[must_use]
    pub fn is_sharable(&self) -> bool {
        self.cache.is_some()
    }

    /// Snapshot of the configuration resolved by the last `configure`.
    #[must_use]
    pub fn resolved_configuration(&self) -> BTreeMap<String, String> {
        self.inner.lock().resolved_configuration.clone()
    }

    /// Snapshot of the metadata merged during the last resolution.
    #[must_use]
    pub fn resolved_metadata(&self) -> Metadata {
        self.inner.lock().resolved_metadata.clone()
    }

    /// One value from the resolved metadata.
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<String> {
        self.inner.lock().resolved_metadata.get(key).map(str::to_string)
    }

    /// The currently held artifact, if the provider is available.
    #[must_use]
    pub fn artifact(&self) -> Option<Arc<P::Output>> {
        self.inner.lock().artifact.clone()
    }

    /// The concrete location the artifact was loaded from, after redirects.
    #[must_use]
    pub fn last_resolved_location(&self) -> Option<String> {
        self.inner.lock().last_resolved_location.clone()
    }

    /// Resolves the provider for `context`.
    ///
    /// Aggregates configuration, interpolates the location template,
    /// follows redirects, and produces or shares the artifact. Reports
    /// [`Outcome::Unchanged`] without re-loading when the location
    /// resolves as before and an artifact is already held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfigurationValue`] when a required
    /// template key stays unresolved, [`Error::ResourceNotFound`] when a
    /// required resource does not exist, [`Error::ImportCycle`] when
    /// providers import each other in a loop, and
    /// [`Error::Producer`] or [`Error::Io`] when materialization fails.
    pub fn configure(&self, context: &dyn ResolutionContext) -> Result<Outcome, Error> {
        self.configure_with_trail(context, &ImportTrail::new())
    }

    fn configure_with_trail(
        &self,
        context: &dyn ResolutionContext,
        trail: &ImportTrail,
    ) -> Result<Outcome, Error> {
        debug!(provider = %self.name, "configuring provider");

        // Imports resolve before this provider's lock is taken. Depth-first
        // resolution re-enters configure on other providers, and holding our
        // own lock across that would deadlock on any diamond-shaped graph.
        let imports = self.inner.lock().imports.clone();
        let import_values = self.resolve_imports(&imports, context, trail)?;

        let mut inner = self.inner.lock();
        let aggregated = aggregate::resolve(
            &inner.defaults,
            &inner.overrides,
            &inner.variant_key,
            &inner.default_variants,
            context,
            &import_values,
        );
        trace!(provider = %self.name, configuration = ?aggregated.values, "aggregated configuration");
        inner.resolved_configuration = aggregated.values.clone();

        let Some(template) = aggregated.values.get(LOCATION_KEY) else {
            if aggregated.optional.contains(LOCATION_KEY) {
                debug!(provider = %self.name, "no location configured and none required");
                inner.commit_not_available();
                return Ok(Outcome::NotAvailable);
            }
            return Err(Error::MissingConfigurationValue {
                key: LOCATION_KEY.to_string(),
                suggestions: find_similar_keys(LOCATION_KEY, &aggregated.values),
            });
        };

        let location = match interpolate(template, &aggregated.values) {
            Ok(location) => location,
            Err(Error::MissingConfigurationValue { key, .. })
                if aggregated.optional.contains(&key) =>
            {
                debug!(provider = %self.name, key = %key, "optional key unresolved, provider not available");
                inner.commit_not_available();
                return Ok(Outcome::NotAvailable);
            }
            Err(e) => return Err(e),
        };

        if inner.artifact.is_some()
            && inner.last_template_location.as_deref() == Some(location.as_str())
        {
            debug!(provider = %self.name, location = %location, "location unchanged, keeping artifact");
            return Ok(Outcome::Unchanged);
        }

        let followed = match redirect::follow(self.loader.as_ref(), &location) {
            Ok(followed) => followed,
            Err(Error::ResourceNotFound { location: missing })
                if aggregated.optional.contains(LOCATION_KEY) =>
            {
                debug!(provider = %self.name, location = %missing, "optional resource missing, provider not available");
                inner.commit_not_available();
                return Ok(Outcome::NotAvailable);
            }
            Err(e) => return Err(e),
        };
        let FollowResult { location: final_location, metadata, payload, hops } = followed;
        debug!(provider = %self.name, location = %final_location, hops = hops, "resource resolved");

        // Redirects can land on the previous concrete resource even when the
        // template interpolated differently. The artifact stays valid; only
        // the metadata and remembered locations refresh.
        if inner.artifact.is_some()
            && inner.last_resolved_location.as_deref() == Some(final_location.as_str())
        {
            inner.resolved_metadata = metadata;
            inner.last_template_location = Some(location);
            return Ok(Outcome::Unchanged);
        }

        let (artifact, outcome) = if let Some(cache) = &self.cache {
            let key = CacheKey::new::<P::Output>(final_location.clone());
            let (entry, produced) = cache.get_or_produce(key, || {
                let input = ProducerInput::new(&final_location, &metadata, payload);
                let output = self.producer.produce(input)?;
                Ok(CacheEntry { artifact: Arc::new(output), metadata: metadata.clone() })
            })?;
            let Ok(artifact) = entry.artifact.downcast::<P::Output>() else {
                unreachable!("cache key pins the artifact type");
            };
            (artifact, if produced { Outcome::Produced } else { Outcome::Shared })
        } else {
            let input = ProducerInput::new(&final_location, &metadata, payload);
            let output = self.producer.produce(input)?;
            (Arc::new(output), Outcome::Produced)
        };

        inner.artifact = Some(artifact);
        inner.resolved_metadata = metadata;
        inner.last_template_location = Some(location);
        inner.last_resolved_location = Some(final_location);
        debug!(provider = %self.name, outcome = ?outcome, "provider configured");
        Ok(outcome)
    }

    fn resolve_imports(
        &self,
        imports: &[Import],
        context: &dyn ResolutionContext,
        trail: &ImportTrail,
    ) -> Result<BTreeMap<String, String>, Error> {
        if imports.is_empty() {
            return Ok(BTreeMap::new());
        }

        let trail = trail.pushed(self.id, &self.name);
        let mut values = BTreeMap::new();
        for import in imports {
            trace!(
                provider = %self.name,
                key = %import.config_key,
                source = %import.source.name(),
                "resolving import"
            );
            match import.source.resolve_import(context, &trail, &import.metadata_key)? {
                Some(value) => {
                    values.insert(import.config_key.clone(), value);
                }
                None => {
                    debug!(
                        provider = %self.name,
                        key = %import.config_key,
                        source = %import.source.name(),
                        "import contributed no value"
                    );
                }
            }
        }
        Ok(values)
    }
}

impl<P: Producer> ImportSource for ResourceProvider<P> {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_import(
        &self,
        context: &dyn ResolutionContext,
        trail: &ImportTrail,
        metadata_key: &str,
    ) -> Result<Option<String>, Error> {
        if trail.contains(self.id) {
            return Err(Error::ImportCycle { chain: trail.chain_through(&self.name) });
        }
        let outcome = self.configure_with_trail(context, trail)?;
        if !outcome.is_available() {
            return Ok(None);
        }
        Ok(self.metadata_value(metadata_key))
    }
}

impl<P: Producer> fmt::Debug for ResourceProvider<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProvider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("sharable", &self.is_sharable())
            .finish_non_exhaustive()
    }
}
