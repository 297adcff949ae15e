//! Producer hook turning resolved payloads into typed artifacts.
//!
//! A [`Producer`] is the pluggable final step of a resolution: it receives
//! the payload of the last (non-redirect) document together with the final
//! location and the accumulated metadata, and builds the typed in-memory
//! artifact the provider hands to its callers. Producers that prefer to
//! reopen or memory-map the resource themselves can ignore the payload and
//! use [`ProducerInput::location`] instead.
//!
//! Failure propagation is part of the contract and fixed by
//! [`ProducerFailure`]: I/O-kind failures (unreadable stream, malformed
//! content) keep their kind all the way to the `configure` caller, while any
//! other failure passes through unwrapped for downcasting.

use std::fmt;
use std::io::{Cursor, Read};

pub use crate::core::error::ProducerFailure;
use crate::metadata::Metadata;

/// Payload of the final document of a redirect chain.
///
/// Content small enough to be probed as a descriptor arrives fully buffered;
/// anything larger arrives as the probed head chained with the still-open
/// remainder of the stream.
pub(crate) enum Payload {
    Bytes(Vec<u8>),
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_struct("Bytes").field("len", &bytes.len()).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").field(&"<open>").finish(),
        }
    }
}

/// Everything a producer gets to work with.
///
/// Borrowed pieces (location, metadata) live as long as the resolution that
/// created them; the payload is owned and consumed by whichever accessor the
/// producer picks.
pub struct ProducerInput<'a> {
    location: &'a str,
    metadata: &'a Metadata,
    payload: Payload,
}

impl<'a> ProducerInput<'a> {
    pub(crate) fn new(location: &'a str, metadata: &'a Metadata, payload: Payload) -> Self {
        Self {
            location,
            metadata,
            payload,
        }
    }

    /// The final, post-redirect location the payload was fetched from.
    #[must_use]
    pub fn location(&self) -> &'a str {
        self.location
    }

    /// Metadata accumulated across every descriptor hop.
    #[must_use]
    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    /// Consumes the input, returning the payload as a reader.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        match self.payload {
            Payload::Bytes(bytes) => Box::new(Cursor::new(bytes)),
            Payload::Stream(stream) => stream,
        }
    }

    /// Consumes the input, returning the payload fully read into memory.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while draining a streaming payload.
    pub fn bytes(self) -> std::io::Result<Vec<u8>> {
        match self.payload {
            Payload::Bytes(bytes) => Ok(bytes),
            Payload::Stream(mut stream) => {
                let mut bytes = Vec::new();
                stream.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Consumes the input, returning the payload as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidData`](std::io::ErrorKind::InvalidData) error if
    /// the payload is not valid UTF-8, besides any read error.
    pub fn text(self) -> std::io::Result<String> {
        String::from_utf8(self.bytes()?).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, format!("payload is not UTF-8: {e}"))
        })
    }
}

/// Builds a typed artifact from a resolved payload.
///
/// Implementations are supplied by the embedder; the crate only fixes the
/// error contract. The output type doubles as the artifact kind in the
/// shared cache key, so two producers yielding different types never collide
/// on the same location.
///
/// # Examples
///
/// ```rust
/// use larc::producer::{Producer, ProducerFailure, ProducerInput};
///
/// struct LineCount;
///
/// impl Producer for LineCount {
///     type Output = usize;
///
///     fn produce(&self, input: ProducerInput<'_>) -> Result<usize, ProducerFailure> {
///         Ok(input.text()?.lines().count())
///     }
/// }
/// ```
pub trait Producer: Send + Sync {
    /// The artifact type this producer builds.
    type Output: Send + Sync + 'static;

    /// Turns the payload into an artifact.
    ///
    /// # Errors
    ///
    /// [`ProducerFailure::Io`] for unreadable or malformed content,
    /// [`ProducerFailure::Other`] for failures in the producer's own logic.
    fn produce(&self, input: ProducerInput<'_>) -> Result<Self::Output, ProducerFailure>;
}
