//! Single-pass `${key}` template interpolation.
//!
//! Location templates reference resolved configuration values with `${key}`
//! placeholders. Interpolation is a single pass over the template: substituted
//! values are opaque, so a value that itself contains `${...}` is never
//! re-expanded. A placeholder naming a key with no resolved value is an error
//! that carries "did you mean" suggestions computed over the keys that did
//! resolve.
//!
//! Text outside placeholders passes through untouched, as do malformed
//! placeholder-like sequences: an unclosed `${` and the empty `${}` are left
//! as literal text rather than rejected.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use strsim::levenshtein;

use crate::core::Error;

/// Suggestions must be within this percentage of the key's length in edit
/// distance to be offered.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Compiled `${key}` placeholder pattern, shared across calls.
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"))
}

/// Replaces every `${key}` in `template` with `values[key]`.
///
/// # Errors
///
/// Returns [`Error::MissingConfigurationValue`] for the first placeholder
/// whose key has no entry in `values`.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use larc::interpolate::interpolate;
///
/// let values = BTreeMap::from([
///     ("language".to_string(), "en".to_string()),
///     ("variant".to_string(), "v2".to_string()),
/// ]);
/// let location = interpolate("${language}-${variant}.map", &values).unwrap();
/// assert_eq!(location, "en-v2.map");
/// ```
pub fn interpolate(template: &str, values: &BTreeMap<String, String>) -> Result<String, Error> {
    let mut output = String::with_capacity(template.len());
    let mut last_end = 0;

    for caps in placeholder_pattern().captures_iter(template) {
        let whole = caps.get(0).expect("group 0 spans the whole match");
        let key = caps.get(1).map_or("", |m| m.as_str());

        output.push_str(&template[last_end..whole.start()]);
        if key.is_empty() {
            // `${}` names no key; keep it as literal text.
            output.push_str(whole.as_str());
        } else if let Some(value) = values.get(key) {
            output.push_str(value);
        } else {
            return Err(Error::MissingConfigurationValue {
                key: key.to_string(),
                suggestions: find_similar_keys(key, values),
            });
        }
        last_end = whole.end();
    }

    output.push_str(&template[last_end..]);
    Ok(output)
}

/// Finds resolved keys close to `target` by Levenshtein distance.
///
/// Returns up to 3 keys whose distance from `target` is at most half its
/// length, closest first.
pub(crate) fn find_similar_keys(target: &str, available: &BTreeMap<String, String>) -> Vec<String> {
    let mut scored: Vec<_> =
        available.keys().map(|key| (key.clone(), levenshtein(target, key))).collect();

    // Sort by distance (closest first); ties stay in key order.
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(key, _)| key)
        .collect()
}
