use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::ExtractedText;

/// The literal-string value of a `/URI` action entry, e.g. `/URI (https://a.example)`.
static URI_ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)/URI\s*\(((?:\\.|[^\\)])*)\)").expect("URI action pattern is valid")
});

/// Page text via `pdf-extract`, plus the targets of link annotations.
pub fn extract_pdf_text(data: &[u8]) -> anyhow::Result<ExtractedText> {
    let body = pdf_extract::extract_text_from_mem(data)?;
    Ok(ExtractedText {
        body,
        hyperlinks: extract_hyperlinks(data),
        header_footer: Vec::new(),
    })
}

/// URI link annotations, de-duplicated case-insensitively in first-seen order.
///
/// Only `/URI` action values count; URLs elsewhere in the file (XMP metadata,
/// namespace declarations, page text) are not links.
fn extract_hyperlinks(data: &[u8]) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for captures in URI_ACTION_RE.captures_iter(data) {
        let value = unescape_literal(&captures[1]);
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !links
            .iter()
            .any(|existing: &String| existing.eq_ignore_ascii_case(value))
        {
            links.push(value.to_string());
        }
    }

    links
}

/// Resolves backslash escapes of a PDF literal string.
fn unescape_literal(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied();
    while let Some(byte) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
