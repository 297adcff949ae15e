//! Canned producers for exercising providers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::producer::{Producer, ProducerFailure, ProducerInput};

/// Produces the payload as a UTF-8 string.
pub struct TextProducer;

impl Producer for TextProducer {
    type Output = String;

    fn produce(&self, input: ProducerInput<'_>) -> Result<String, ProducerFailure> {
        Ok(input.text()?)
    }
}

/// Parses the payload as `key=value` lines into a map.
pub struct MapProducer;

impl Producer for MapProducer {
    type Output = BTreeMap<String, String>;

    fn produce(&self, input: ProducerInput<'_>) -> Result<Self::Output, ProducerFailure> {
        let text = input.text()?;
        let mut map = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ProducerFailure::invalid_content(format!(
                    "expected key=value, got [{line}]"
                )));
            };
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(map)
    }
}

/// A text producer that counts how many times it ran.
///
/// Keep a clone of the counter handle before moving the producer into a
/// provider.
pub struct CountingTextProducer {
    invocations: Arc<AtomicUsize>,
}

impl CountingTextProducer {
    #[must_use]
    pub fn new() -> Self {
        Self { invocations: Arc::new(AtomicUsize::new(0)) }
    }

    /// Handle to the invocation counter.
    #[must_use]
    pub fn invocations(&self) -> Arc<AtomicUsize> {
        self.invocations.clone()
    }
}

impl Default for CountingTextProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for CountingTextProducer {
    type Output = String;

    fn produce(&self, input: ProducerInput<'_>) -> Result<String, ProducerFailure> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(input.text()?)
    }
}

/// Domain error raised by [`FailingProducer::domain`], downcastable from
/// the provider error.
#[derive(Debug, thiserror::Error)]
#[error("fixture failure: {0}")]
pub struct FixtureError(pub String);

/// A producer that always fails in a selectable way.
pub struct FailingProducer {
    mode: FailureMode,
}

enum FailureMode {
    Io(std::io::ErrorKind, String),
    Domain(String),
}

impl FailingProducer {
    /// Fails with an I/O error of the given kind.
    #[must_use]
    pub fn io(kind: std::io::ErrorKind, message: impl Into<String>) -> Self {
        Self { mode: FailureMode::Io(kind, message.into()) }
    }

    /// Fails with a [`FixtureError`].
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self { mode: FailureMode::Domain(message.into()) }
    }
}

impl Producer for FailingProducer {
    type Output = String;

    fn produce(&self, _input: ProducerInput<'_>) -> Result<String, ProducerFailure> {
        match &self.mode {
            FailureMode::Io(kind, message) => {
                Err(ProducerFailure::Io(std::io::Error::new(*kind, message.clone())))
            }
            FailureMode::Domain(message) => {
                Err(ProducerFailure::other(FixtureError(message.clone())))
            }
        }
    }
}
