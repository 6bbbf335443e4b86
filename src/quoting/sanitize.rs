//! Markup stripping for free-text fields.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>").expect("script pattern compiles")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

/// Remove `<script>` blocks and any remaining tags, then trim.
///
/// Idempotent: after one pass no `<` is followed by a `>`, so nothing matches again.
pub fn sanitize(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_tags = HTML_TAG.replace_all(&without_scripts, "");
    without_tags.trim().to_string()
}

/// Sanitize an optional field, treating absence as empty.
pub fn sanitize_opt(input: Option<&str>) -> String {
    input.map(sanitize).unwrap_or_default()
}
