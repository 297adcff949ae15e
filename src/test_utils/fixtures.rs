//! Builders for descriptor documents used as fixtures.

/// Renders a flat key/value descriptor document.
#[must_use]
pub fn descriptor(pairs: &[(&str, &str)]) -> String {
    let mut text = String::new();
    for (key, value) in pairs {
        text.push_str(key);
        text.push_str(" = ");
        text.push_str(value);
        text.push('\n');
    }
    text
}

/// Renders a redirect descriptor pointing at `target`, with extra metadata
/// pairs.
#[must_use]
pub fn redirect_to(target: &str, extra: &[(&str, &str)]) -> String {
    let mut pairs = vec![("redirect", "true"), ("redirect.target", target)];
    pairs.extend_from_slice(extra);
    descriptor(&pairs)
}
