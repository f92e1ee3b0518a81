//! Office Open XML documents (`.docx`, `.pptx`) read straight from the zip
//! container. Only run text is kept; paragraph ends become line breaks.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::errors::{Error, Result};
use crate::util::markup::{decode_entities, paragraphs};

const DOCX_BODY: &str = "word/document.xml";

static DOCX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|</w:p>|<w:tab\s*/>|<w:br\s*/>|<w:cr\s*/>")
        .expect("docx token regex")
});

static PPTX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<a:t(?:\s[^>]*)?>(.*?)</a:t>|</a:p>|<a:br\b[^>]*>").expect("pptx token regex")
});

static SLIDE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("slide name regex"));

pub(super) fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let xml = read_entry(&mut archive, DOCX_BODY)?.ok_or(Error::MissingEntry(DOCX_BODY))?;
    Ok(paragraphs(&runs(&DOCX_TOKEN, &xml)))
}

pub(super) fn extract_pptx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let n = SLIDE_NAME.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((n, name.to_string()))
        })
        .collect();
    if slides.is_empty() {
        return Err(Error::MissingEntry("ppt/slides/slide1.xml"));
    }
    slides.sort_by_key(|(n, _)| *n);
    debug!(slides = slides.len(), "pptx slides found");

    let mut out = String::new();
    for (_, name) in &slides {
        if let Some(xml) = read_entry(&mut archive, name)? {
            out.push_str(&runs(&PPTX_TOKEN, &xml));
            out.push('\n');
        }
    }
    Ok(paragraphs(&out))
}

/// Walks the text-run and break tokens of one XML part in document order.
fn runs(token: &Regex, xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    for caps in token.captures_iter(xml) {
        let whole = &caps[0];
        if let Some(text) = caps.get(1) {
            out.push_str(&decode_entities(text.as_str()));
        } else if whole.contains("tab") {
            out.push('\t');
        } else {
            out.push('\n');
        }
    }
    out
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    // Declared sizes come from the archive header and are untrusted.
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    /// Builds an in-memory zip archive from `(name, contents)` pairs.
    pub fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document><w:body>{body}</w:body></w:document>"#
        );
        zip_of(&[("[Content_Types].xml", "<Types/>"), ("word/document.xml", xml.as_str())])
    }

    pub fn slide(lines: &[&str]) -> String {
        let body: String = lines
            .iter()
            .map(|l| format!("<a:p><a:r><a:t>{l}</a:t></a:r></a:p>"))
            .collect();
        format!("<p:sld><p:cSld><p:spTree><p:sp><p:txBody>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn docx_keeps_paragraph_order_and_decodes_entities() {
        let bytes = docx(&["Emergency fund", "Three to six months &amp; no more"]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "Emergency fund\n\nThree to six months & no more");
    }

    #[test]
    fn docx_runs_within_a_paragraph_are_concatenated() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>Com</w:t></w:r><w:r><w:t>pound</w:t></w:r><w:r><w:tab/><w:t>interest</w:t></w:r></w:p></w:body></w:document>";
        let bytes = zip_of(&[("word/document.xml", xml)]);
        assert_eq!(extract_docx(&bytes).unwrap(), "Compound interest");
    }

    #[test]
    fn docx_without_body_is_an_error() {
        let bytes = zip_of(&[("[Content_Types].xml", "<Types/>")]);
        assert!(matches!(
            extract_docx(&bytes),
            Err(Error::MissingEntry(DOCX_BODY))
        ));
        assert!(matches!(extract_docx(b"not a zip"), Err(Error::Zip(_))));
    }

    #[test]
    fn oversized_declared_entry_size_is_not_trusted() {
        let mut bytes = docx(&["Pensions"]);
        // Rewrite every central-directory uncompressed size to ~4 GiB.
        let sig = [0x50, 0x4b, 0x01, 0x02];
        let starts: Vec<usize> = bytes
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == sig)
            .map(|(i, _)| i)
            .collect();
        for at in starts {
            bytes[at + 24..at + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        }
        assert_eq!(extract_docx(&bytes).unwrap(), "Pensions");
    }

    #[test]
    fn pptx_slides_are_read_in_numeric_order() {
        let s1 = slide(&["Intro"]);
        let s2 = slide(&["Asset classes", "Equities"]);
        let s10 = slide(&["Summary"]);
        let bytes = zip_of(&[
            ("ppt/slides/slide10.xml", s10.as_str()),
            ("ppt/slides/slide2.xml", s2.as_str()),
            ("ppt/slides/slide1.xml", s1.as_str()),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
        ]);
        let text = extract_pptx(&bytes).unwrap();
        assert_eq!(text, "Intro\n\nAsset classes\n\nEquities\n\nSummary");
    }
}
