//! HTTP(S)-backed resource loading.

use std::io::Read;

use tracing::trace;

use super::{LoadError, ResourceLoader};

/// Loads resources from `http://` and `https://` URLs.
///
/// Requests are made with a blocking client; resolution as a whole is
/// synchronous and may block on network I/O. A `404 Not Found` response maps
/// to [`LoadError::NotFound`] so optional remote resources participate in the
/// not-required downgrade; any other non-success status is an opening
/// failure.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::blocking::Client,
}

impl HttpLoader {
    /// Creates a loader with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Creates a loader reusing an existing client, e.g. one configured with
    /// proxies or custom timeouts.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for HttpLoader {
    fn open(&self, location: &str) -> Result<Box<dyn Read + Send>, LoadError> {
        trace!(location, "fetching over HTTP");
        let response = self.client.get(location).send().map_err(LoadError::other)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoadError::not_found(location));
        }
        if !status.is_success() {
            return Err(LoadError::other(format!("HTTP status {status} for [{location}]")));
        }
        Ok(Box::new(response))
    }
}
