//! Core types and functionality for larc
//!
//! This module forms the foundation of the crate's type system, providing the
//! error taxonomy, provider identity, and the outcome vocabulary shared by
//! every resolution.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! The error module provides:
//! - [`Error`] - enumerated error types covering all resolution failure modes
//! - [`LoadError`] - failures raised by resource loaders
//! - [`ProducerFailure`] - failures raised by artifact producers, with the
//!   fixed translation contract into [`Error`]
//!
//! # Design Principles
//!
//! ## Error First Design
//! Every operation that can fail returns a `Result` with meaningful error
//! information; messages always name the offending key or location.
//!
//! ## Identity Over Naming
//! Providers are identified by a generated [`ProviderId`] rather than their
//! display name, so two providers that happen to share a name never alias
//! each other in import cycle detection.

pub mod error;

pub use error::{Error, LoadError, ProducerFailure};

use std::fmt;
use uuid::Uuid;

/// Unique identity of a provider instance.
///
/// Backed by a v4 UUID minted at construction time. Identity, not equality of
/// configuration, is what import cycle detection tracks: a provider importing
/// a *differently configured* provider of the same name is fine, a provider
/// transitively importing *itself* is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(Uuid);

impl ProviderId {
    /// Mints a fresh provider identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of a successful [`configure`](crate::provider::ResourceProvider::configure) call.
///
/// Callers that only care about "is an artifact present" can use
/// [`is_available`](Self::is_available); the individual variants distinguish
/// how the artifact came to be, which matters for cache observability and
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The provider's own producer was invoked and built a fresh artifact.
    Produced,
    /// An identity-equal artifact was taken from the shared cache without
    /// invoking the producer.
    Shared,
    /// Nothing changed since the previous resolution; the existing artifact
    /// and metadata were kept and the producer was not reinvoked.
    Unchanged,
    /// A key marked not-required had no value (or its resource does not
    /// exist); the provider holds no artifact and no error was raised.
    NotAvailable,
}

impl Outcome {
    /// Returns `true` unless the resolution ended without an artifact.
    #[must_use]
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::NotAvailable)
    }
}
