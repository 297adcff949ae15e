//! Configuration aggregation under the precedence order.
//!
//! Each key resolves independently through the tiers, highest first:
//! 1. an explicit override value,
//! 2. a value contributed by an import bound to the key,
//! 3. for the `language` key, the resolution context's language attribute,
//! 4. for the provider's variant key, the per-language fallback table looked
//!    up with the already-resolved language,
//! 5. the static default.
//!
//! A key overridden as not-required contributes no value at tier 1 and does
//! not shadow the lower tiers; it is recorded in the optional set, which is
//! what downgrades later missing-value and missing-resource failures into
//! the not-available outcome.

use std::collections::{BTreeMap, BTreeSet};

use crate::constants::LANGUAGE_KEY;
use crate::context::ResolutionContext;
use crate::provider::Override;

/// The product of one aggregation pass.
pub(crate) struct Aggregated {
    /// Fully resolved key/value configuration.
    pub values: BTreeMap<String, String>,
    /// Keys marked not-required.
    pub optional: BTreeSet<String>,
}

/// Resolves the configuration for one `configure` call.
///
/// Deterministic: the output is fully determined by the inputs, and the maps
/// are ordered, so identical inputs always produce identical output.
pub(crate) fn resolve(
    defaults: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, Override>,
    variant_key: &str,
    default_variants: &BTreeMap<String, String>,
    context: &dyn ResolutionContext,
    import_values: &BTreeMap<String, String>,
) -> Aggregated {
    let mut optional = BTreeSet::new();
    let mut override_values: BTreeMap<&str, &str> = BTreeMap::new();
    for (key, value) in overrides {
        match value {
            Override::Value(v) => {
                override_values.insert(key.as_str(), v.as_str());
            }
            Override::NotRequired => {
                optional.insert(key.clone());
            }
        }
    }

    // The language resolves first, through every tier it can come from,
    // because the variant tier depends on it.
    let language = override_values
        .get(LANGUAGE_KEY)
        .map(|v| (*v).to_string())
        .or_else(|| import_values.get(LANGUAGE_KEY).cloned())
        .or_else(|| context.attribute(LANGUAGE_KEY).map(str::to_string))
        .or_else(|| defaults.get(LANGUAGE_KEY).cloned());

    let mut keys: BTreeSet<String> = BTreeSet::new();
    keys.extend(defaults.keys().cloned());
    keys.extend(override_values.keys().map(|k| (*k).to_string()));
    keys.extend(import_values.keys().cloned());
    keys.insert(LANGUAGE_KEY.to_string());
    keys.insert(variant_key.to_string());

    let mut values = BTreeMap::new();
    for key in keys {
        let value = override_values
            .get(key.as_str())
            .map(|v| (*v).to_string())
            .or_else(|| import_values.get(&key).cloned())
            .or_else(|| if key == LANGUAGE_KEY { language.clone() } else { None })
            .or_else(|| {
                if key == variant_key {
                    language.as_ref().and_then(|lang| default_variants.get(lang)).cloned()
                } else {
                    None
                }
            })
            .or_else(|| defaults.get(&key).cloned());

        if let Some(value) = value {
            values.insert(key, value);
        }
    }

    Aggregated { values, optional }
}
