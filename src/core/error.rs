//! Error handling for larc
//!
//! This module provides the error types raised while resolving, loading, and
//! producing artifacts. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **Self-describing messages** that always name the offending key or
//!    location, so operators can fix configuration without reading source
//!
//! # Architecture
//!
//! Three error types cover the three layers of the crate:
//! - [`Error`] - the crate-level error surfaced from
//!   [`configure`](crate::provider::ResourceProvider::configure)
//! - [`LoadError`] - raised by [`ResourceLoader`](crate::loader::ResourceLoader)
//!   implementations when a location cannot be opened
//! - [`ProducerFailure`] - raised by [`Producer`](crate::producer::Producer)
//!   implementations when a payload cannot be turned into an artifact
//!
//! # Translation at the boundaries
//!
//! `LoadError` and `ProducerFailure` convert into [`Error`] under a fixed
//! contract:
//! - [`LoadError::NotFound`] → [`Error::ResourceNotFound`], whose message has
//!   the form `Unable to load resource [<location>]`
//! - [`LoadError::Other`] (a stream-acquisition failure that is not already
//!   I/O) → [`Error::Io`] carrying the original failure as its cause
//! - [`ProducerFailure::Io`] → [`Error::Io`] with the producer's error intact
//! - [`ProducerFailure::Other`] → [`Error::Producer`], left unwrapped so the
//!   caller can downcast to the producer's own error type and distinguish a
//!   content problem from a logic bug
//!
//! # Examples
//!
//! ## Pattern matching on resolution errors
//!
//! ```rust,no_run
//! use larc::Error;
//!
//! fn handle_error(error: Error) {
//!     match error {
//!         Error::MissingConfigurationValue { key, .. } => {
//!             eprintln!("configure a value for '{key}'");
//!         }
//!         Error::ResourceNotFound { location } => {
//!             eprintln!("nothing lives at '{location}'");
//!         }
//!         Error::ImportCycle { chain } => {
//!             eprintln!("break the import cycle: {chain}");
//!         }
//!         other => eprintln!("resolution failed: {other}"),
//!     }
//! }
//! ```

use thiserror::Error;

/// The main error type for resolution operations.
///
/// This enum represents all possible errors that can occur while a provider
/// resolves, loads, and produces an artifact. Each variant carries the
/// specific context of the failure and is raised synchronously from
/// [`configure`](crate::provider::ResourceProvider::configure); nothing is
/// retried internally.
///
/// A key marked not-required converts what would be a
/// [`MissingConfigurationValue`](Self::MissingConfigurationValue) or
/// [`ResourceNotFound`](Self::ResourceNotFound) into the non-error
/// [`Outcome::NotAvailable`](crate::core::Outcome::NotAvailable), so those
/// variants only surface for required keys.
#[derive(Error, Debug)]
pub enum Error {
    /// A `${key}` reference in a template has no resolved value
    ///
    /// Raised while interpolating the location template when a referenced key
    /// was not satisfied by any precedence tier (override, import, context
    /// language, variant table, default). The message lists close matches
    /// among the keys that did resolve, when any exist.
    ///
    /// # Fields
    /// - `key`: the unresolved configuration key
    /// - `suggestions`: resolved keys within editing distance of `key`
    #[error("No value resolved for configuration key [{key}]{}", format_suggestions(.suggestions))]
    MissingConfigurationValue {
        /// The configuration key that has no resolved value
        key: String,
        /// Close matches among the keys that did resolve
        suggestions: Vec<String>,
    },

    /// A resolved location could not be opened
    ///
    /// The message format is load-bearing: downstream tooling greps for the
    /// bracketed location to report which resource is missing.
    #[error("Unable to load resource [{location}]")]
    ResourceNotFound {
        /// The location that could not be opened
        location: String,
    },

    /// The redirect hop bound was exceeded
    ///
    /// Raised when following redirects visits more than
    /// [`MAX_REDIRECT_HOPS`](crate::constants::MAX_REDIRECT_HOPS) locations,
    /// which in practice means the redirect descriptors form a cycle.
    #[error("Redirect limit of {limit} hops exceeded while resolving [{location}]: {chain}")]
    RedirectLoop {
        /// The location resolution started from
        location: String,
        /// The hop bound that was exceeded
        limit: usize,
        /// The visited locations, oldest first, joined with arrows
        chain: String,
    },

    /// The import graph contains a cycle
    ///
    /// Providers resolve their imports depth-first; a provider asked to
    /// resolve itself transitively fails fast with the chain of provider
    /// names that led back to it.
    #[error("Circular import detected: {chain}")]
    ImportCycle {
        /// The import chain, oldest first, joined with arrows
        chain: String,
    },

    /// A producer failed with a non-I/O error
    ///
    /// The boxed error is the producer's own failure, passed through without
    /// re-wrapping so callers can downcast it to the original type.
    #[error("Producer failed: {0}")]
    Producer(Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Provider spec validation error
    #[error("Provider spec validation failed: {reason}")]
    SpecValidationError {
        /// Reason why spec validation failed
        reason: String,
    },
}

/// Renders the `did you mean` suffix for missing-key messages.
fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Errors raised by [`ResourceLoader`](crate::loader::ResourceLoader)
/// implementations.
///
/// Loaders distinguish "the location does not exist" from "opening it
/// failed"; the former participates in the not-required downgrade while the
/// latter always surfaces as a hard error.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The location does not exist in the loader's namespace
    #[error("Location [{location}] does not exist")]
    NotFound {
        /// The location that was requested
        location: String,
    },

    /// IO error while opening the location
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure raised while acquiring the stream
    ///
    /// Converted into an I/O error carrying the original failure as cause
    /// when it crosses into [`Error`].
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    /// Creates a [`LoadError::NotFound`] for the given location.
    #[must_use]
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    /// Wraps an arbitrary failure as [`LoadError::Other`].
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

impl From<LoadError> for Error {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::NotFound { location } => Self::ResourceNotFound { location },
            LoadError::Io(e) => Self::Io(e),
            // Non-I/O stream-acquisition failures become I/O failures with
            // the original as cause.
            LoadError::Other(e) => Self::Io(std::io::Error::other(e)),
        }
    }
}

/// Errors raised by [`Producer`](crate::producer::Producer) implementations.
///
/// The two variants encode the propagation contract: I/O-kind failures
/// (malformed content, read errors) surface as [`Error::Io`] with the
/// producer's error intact, while any other failure surfaces as
/// [`Error::Producer`] without re-wrapping.
#[derive(Error, Debug)]
pub enum ProducerFailure {
    /// IO-kind failure: unreadable stream or malformed content
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure from the producer's own logic
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProducerFailure {
    /// Wraps a producer's own error type as [`ProducerFailure::Other`].
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }

    /// Creates an I/O-kind failure flagging malformed payload content.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, message.into()))
    }
}

impl From<ProducerFailure> for Error {
    fn from(failure: ProducerFailure) -> Self {
        match failure {
            ProducerFailure::Io(e) => Self::Io(e),
            ProducerFailure::Other(e) => Self::Producer(e),
        }
    }
}
