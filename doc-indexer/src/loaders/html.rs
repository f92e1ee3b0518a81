//! HTML to text: drop non-content elements, turn block tags into line
//! breaks, strip the remaining tags and decode entities.

use std::sync::LazyLock;

use regex::Regex;

use crate::util::markup::{decode_entities, paragraphs};

static HIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>|<head\b.*?</head\s*>|<noscript\b.*?</noscript\s*>",
    )
    .expect("hidden-element regex")
});

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:p|div|br|li|ul|ol|h[1-6]|tr|td|th|table|section|article|header|footer|blockquote|pre|title)\b[^>]*>",
    )
    .expect("block-tag regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag regex"));

pub(super) fn extract(bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(bytes);
    let visible = HIDDEN.replace_all(&raw, " ");
    let broken = BLOCK.replace_all(&visible, "\n");
    let stripped = TAG.replace_all(&broken, "");
    paragraphs(&decode_entities(&stripped))
}
