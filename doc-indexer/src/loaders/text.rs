/// Plain text; invalid UTF-8 sequences are replaced rather than rejected.
pub(super) fn extract(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}
