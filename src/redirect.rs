//! Redirect descriptor detection and chain following.
//!
//! After a location is opened, its content is probed as a flat key/value
//! descriptor (`.properties`-style `key=value` lines, `#`/`!` comments). A
//! descriptor carrying a truthy [`redirect`](crate::constants::REDIRECT_KEY)
//! marker and a [`redirect.target`](crate::constants::REDIRECT_TARGET_KEY)
//! pointer sends resolution to the pointed-at location; every other document
//! ends the chain and its bytes become the producer payload.
//!
//! Descriptor pairs accumulate into metadata along the way, later hops
//! overwriting earlier ones. The pointer key is consumed by the follower and
//! never lands in metadata; the marker key does land there, which is how
//! callers can observe which hops redirected. The final document contributes
//! its pairs too when it parses as a descriptor - a tag-mapping table in
//! `key=value` form is both payload and metadata.
//!
//! Redirect targets are concrete locations, never templates; nothing is
//! interpolated past the initial location.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use tracing::{debug, warn};

use crate::constants::{
    DESCRIPTOR_PROBE_LIMIT, MAX_REDIRECT_HOPS, REDIRECT_KEY, REDIRECT_TARGET_KEY, is_truthy_marker,
};
use crate::core::Error;
use crate::loader::ResourceLoader;
use crate::metadata::Metadata;
use crate::producer::Payload;

/// Where a redirect chain ended up.
#[derive(Debug)]
pub(crate) struct FollowResult {
    /// The final, post-redirect location.
    pub location: String,
    /// Metadata merged across every descriptor hop, final document included.
    pub metadata: Metadata,
    /// The final document's bytes.
    pub payload: Payload,
    /// Number of redirects followed (0 for a direct hit).
    pub hops: usize,
}

/// Parses `bytes` as a flat key/value descriptor.
///
/// Returns `None` unless the content is valid UTF-8 in which every
/// non-comment, non-blank line is `key=value`. Keys and values are trimmed;
/// a later line overwrites an earlier one using the same key.
pub(crate) fn parse_descriptor(bytes: &[u8]) -> Option<BTreeMap<String, String>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let mut pairs = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = line.split_once('=')?;
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }
    Some(pairs)
}

/// Follows redirects from `start` until a non-redirect document is reached.
///
/// Hops are bounded by [`MAX_REDIRECT_HOPS`]; exceeding the bound reports the
/// visited chain as a [`RedirectLoop`](Error::RedirectLoop). A descriptor
/// carrying the marker but no target is suspicious-but-tolerated: it logs a
/// warning and terminates the chain as the final document.
pub(crate) fn follow(loader: &dyn ResourceLoader, start: &str) -> Result<FollowResult, Error> {
    let mut location = start.to_string();
    let mut metadata = Metadata::new();
    let mut visited = vec![location.clone()];
    let mut hops = 0usize;

    loop {
        let mut stream = loader.open(&location)?;

        // Probe up to the descriptor limit; anything larger is an opaque
        // payload and streams through untouched.
        let mut head = Vec::new();
        stream.by_ref().take(DESCRIPTOR_PROBE_LIMIT as u64 + 1).read_to_end(&mut head)?;
        if head.len() > DESCRIPTOR_PROBE_LIMIT {
            return Ok(FollowResult {
                location,
                metadata,
                payload: Payload::Stream(Box::new(Cursor::new(head).chain(stream))),
                hops,
            });
        }

        let Some(pairs) = parse_descriptor(&head) else {
            return Ok(FollowResult {
                location,
                metadata,
                payload: Payload::Bytes(head),
                hops,
            });
        };

        let marked = pairs.get(REDIRECT_KEY).is_some_and(|v| is_truthy_marker(v));
        let target = pairs.get(REDIRECT_TARGET_KEY).cloned();

        // The pointer is consumed; every other pair, marker included, is
        // metadata. Later hops overwrite earlier ones.
        metadata.merge_pairs(pairs.into_iter().filter(|(key, _)| key != REDIRECT_TARGET_KEY));

        match (marked, target) {
            (true, Some(next)) => {
                hops += 1;
                if hops > MAX_REDIRECT_HOPS {
                    visited.push(next);
                    return Err(Error::RedirectLoop {
                        location: start.to_string(),
                        limit: MAX_REDIRECT_HOPS,
                        chain: visited.join(" → "),
                    });
                }
                debug!(from = %location, to = %next, hop = hops, "following redirect");
                visited.push(next.clone());
                location = next;
            }
            (true, None) => {
                warn!(%location, "redirect marker without a target; treating document as final");
                return Ok(FollowResult {
                    location,
                    metadata,
                    payload: Payload::Bytes(head),
                    hops,
                });
            }
            _ => {
                return Ok(FollowResult {
                    location,
                    metadata,
                    payload: Payload::Bytes(head),
                    hops,
                });
            }
        }
    }
}
