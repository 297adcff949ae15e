//! Global constants used throughout the larc codebase.
//!
//! This module contains the reserved configuration keys, redirect descriptor
//! keys, and resolution limits that are used across multiple modules. Defining
//! them centrally improves maintainability and makes magic values more
//! discoverable.

/// Reserved configuration key holding a provider's location template.
///
/// The value stored under this key may contain `${key}` placeholders that are
/// interpolated from the resolved configuration before the location is opened.
pub const LOCATION_KEY: &str = "location";

/// Reserved configuration key for the active language code.
///
/// During aggregation this key is additionally fed from the resolution
/// context, so callers rarely need to set it explicitly.
pub const LANGUAGE_KEY: &str = "language";

/// Conventional configuration key for the model/mapping variant.
///
/// Providers may register a per-language fallback table for this key; see
/// [`ResourceProvider::with_default_variant`](crate::provider::ResourceProvider::with_default_variant).
pub const VARIANT_KEY: &str = "variant";

/// Reserved descriptor key marking a fetched document as a redirect.
///
/// The marker is only honored when its value is truthy (see
/// [`TRUTHY_MARKER_VALUES`]) and a [`REDIRECT_TARGET_KEY`] entry is present.
/// Unlike the target key, the marker itself is merged into the accumulated
/// metadata, so callers can observe which hops were redirects.
pub const REDIRECT_KEY: &str = "redirect";

/// Reserved descriptor key naming the next location of a redirect.
///
/// Targets are concrete locations, never templates. This key is consumed by
/// the redirect follower and never appears in accumulated metadata.
pub const REDIRECT_TARGET_KEY: &str = "redirect.target";

/// Values accepted (case-insensitively) as a truthy redirect marker.
pub const TRUTHY_MARKER_VALUES: [&str; 4] = ["true", "yes", "on", "1"];

/// Maximum number of redirect hops followed during a single resolution (20).
///
/// Legitimate redirect chains observed in model repositories stay in the low
/// single digits; the bound exists to convert redirect cycles into a
/// [`RedirectLoop`](crate::Error::RedirectLoop) error instead of looping
/// forever.
pub const MAX_REDIRECT_HOPS: usize = 20;

/// Maximum document size probed as a redirect/metadata descriptor (64 KiB).
///
/// Documents larger than this are treated as opaque artifact payloads and
/// streamed to the producer without buffering them whole; descriptor files in
/// practice are a few hundred bytes.
pub const DESCRIPTOR_PROBE_LIMIT: usize = 64 * 1024;

/// Returns `true` if `value` is accepted as a truthy redirect marker.
#[must_use]
pub fn is_truthy_marker(value: &str) -> bool {
    TRUTHY_MARKER_VALUES.iter().any(|v| value.eq_ignore_ascii_case(v))
}
