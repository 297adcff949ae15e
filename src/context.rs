//! Resolution contexts supplying runtime attributes.
//!
//! A [`ResolutionContext`] is the read-only view a provider gets of the unit
//! of work it is resolving for: a small set of named string attributes, of
//! which `language` is the one every NLP-flavored deployment carries. The
//! surrounding pipeline owns the context; the resolver never mutates it.
//!
//! The crate ships [`Context`], an immutable map-backed implementation built
//! with `with_*` methods, but any type can participate by implementing the
//! trait — typically a thin adapter over the caller's own document model.

use std::collections::BTreeMap;

use crate::constants::LANGUAGE_KEY;

/// Read-only access to the runtime attributes driving a resolution.
///
/// Implementations return `None` for attributes they do not carry; the
/// aggregator treats an absent attribute the same as an absent configuration
/// tier.
pub trait ResolutionContext {
    /// Returns the value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns the active language code, if present.
    ///
    /// Equivalent to `attribute("language")`; provided because virtually
    /// every caller asks for it.
    fn language(&self) -> Option<&str> {
        self.attribute(LANGUAGE_KEY)
    }
}

/// An immutable, owned set of context attributes.
///
/// # Examples
///
/// ```rust
/// use larc::context::{Context, ResolutionContext};
///
/// let ctx = Context::new()
///     .with_language("de")
///     .with_attribute("pos.tagset", "stts");
///
/// assert_eq!(ctx.language(), Some("de"));
/// assert_eq!(ctx.attribute("pos.tagset"), Some("stts"));
/// assert_eq!(ctx.attribute("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    attributes: BTreeMap<String, String>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute, replacing any previous value under the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the `language` attribute.
    #[must_use]
    pub fn with_language(self, language: impl Into<String>) -> Self {
        self.with_attribute(LANGUAGE_KEY, language)
    }
}

impl ResolutionContext for Context {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
