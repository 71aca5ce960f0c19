use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::ExtractError;

const DOCUMENT_XML: &str = "word/document.xml";

fn text_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:(?:br|cr)(?:\s[^>]*)?/>")
            .expect("valid regex")
    })
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("valid regex")
    })
}

/// Paragraph text of a .docx, one paragraph per line.
pub(super) fn docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(format!("zip: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractError::Docx(format!("{}: {}", DOCUMENT_XML, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("{}: {}", DOCUMENT_XML, e)))?;

    let paragraphs: Vec<String> = xml
        .split("</w:p>")
        .filter(|chunk| chunk.contains("<w:p"))
        .map(paragraph_text)
        .collect();

    Ok(paragraphs.join("\n").trim().to_string())
}

fn paragraph_text(chunk: &str) -> String {
    text_run_re()
        .captures_iter(chunk)
        .map(|caps| match caps.get(1) {
            Some(run) => unescape_xml(run.as_str()),
            None if caps[0].starts_with("<w:tab") => "\t".to_string(),
            None => "\n".to_string(),
        })
        .collect()
}

/// Resolve the predefined entities and numeric character references in one
/// pass. A reference to an invalid code point is left as written.
fn unescape_xml(text: &str) -> String {
    entity_re()
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let resolved = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => name[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            match resolved {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_XML, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0"?>
<w:document><w:body>
<w:p><w:r><w:t>Login story</w:t></w:r></w:p>
<w:p><w:pPr/><w:r><w:t xml:space="preserve">As a user </w:t></w:r><w:r><w:t>I log in &amp; see &lt;Dashboard&gt;</w:t></w:r></w:p>
<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p>
<w:tbl/>
</w:body></w:document>"#;
        let text = docx_text(&docx(xml)).unwrap();
        assert_eq!(
            text,
            "Login story\nAs a user I log in & see <Dashboard>\nA\tB"
        );
    }

    #[test]
    fn test_character_references_and_breaks() {
        let xml = r#"<w:document><w:body>
<w:p><w:r><w:t>User&#x2019;s cart</w:t><w:br/><w:t>Total &#8364;5 &amp;amp; tax</w:t></w:r></w:p>
<w:p><w:r><w:t>Page</w:t><w:br w:type="page"/><w:t>Bad &#xD800; ref</w:t></w:r></w:p>
</w:body></w:document>"#;
        let text = docx_text(&docx(xml)).unwrap();
        assert_eq!(
            text,
            "User\u{2019}s cart\nTotal \u{20ac}5 &amp; tax\nPage\nBad &#xD800; ref"
        );
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = docx_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
