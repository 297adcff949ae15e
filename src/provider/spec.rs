//! Declarative provider configuration loaded from TOML.
//!
//! A spec captures the static portion of a provider setup so it can live in
//! a file next to the resources it describes:
//!
//! ```toml
//! location = "${language}-${variant}.map"
//! variant_key = "variant"
//! sharable = true
//!
//! [defaults]
//! variant = "default"
//!
//! [default_variants]
//! en = "v2"
//! de = "v1"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Error;

/// Static provider configuration.
///
/// All fields are optional in the TOML document; missing tables deserialize
/// to their empty form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSpec {
    /// Location template, stored under the `location` key of the defaults.
    pub location: Option<String>,
    /// Static default values, the lowest precedence tier.
    pub defaults: BTreeMap<String, String>,
    /// Key the per-language fallback table feeds, `variant` if unset.
    pub variant_key: Option<String>,
    /// Per-language fallback values for the variant key.
    pub default_variants: BTreeMap<String, String>,
    /// Whether providers built from this spec should attach a shared cache.
    pub sharable: bool,
}

impl ProviderSpec {
    /// Parses a spec from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or fails
    /// validation.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let spec: Self = toml::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Reads and parses a spec file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading provider spec");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), Error> {
        if let Some(location) = &self.location
            && location.trim().is_empty()
        {
            return Err(Error::SpecValidationError {
                reason: "location template is empty".to_string(),
            });
        }
        if let Some(variant_key) = &self.variant_key
            && variant_key.trim().is_empty()
        {
            return Err(Error::SpecValidationError {
                reason: "variant_key is empty".to_string(),
            });
        }
        Ok(())
    }
}
