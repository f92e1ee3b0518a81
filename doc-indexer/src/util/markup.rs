//! Small helpers shared by the markup-based loaders (HTML, DOCX, PPTX).

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity regex"));

/// Decodes the XML predefined entities, `&nbsp;` and numeric character references.
/// Unknown named entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if body.starts_with("#x") || body.starts_with("#X") => {
                    u32::from_str_radix(&body[2..], 16).ok().and_then(char::from_u32)
                }
                _ if body.starts_with('#') => body[1..].parse::<u32>().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Collapses whitespace inside each line, drops blank lines and joins the
/// remaining ones as paragraphs separated by an empty line.
pub fn paragraphs(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;&quot;"), "AB\"");
        assert_eq!(decode_entities("&copy; stays"), "&copy; stays");
    }

    #[test]
    fn paragraphs_drop_blank_lines() {
        assert_eq!(paragraphs("  one   two \n\n\n three\n"), "one two\n\nthree");
    }
}
