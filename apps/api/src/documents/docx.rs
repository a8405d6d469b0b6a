use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use anyhow::Context;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractedText;

const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Paragraph text from the main document part, hyperlink targets, then headers and footers.
pub fn extract_docx_text(data: &[u8]) -> anyhow::Result<ExtractedText> {
    let mut archive = ZipArchive::new(Cursor::new(data)).context("not a DOCX package")?;

    let document_xml = read_part(&mut archive, DOCUMENT_PART)?;
    let body = read_paragraphs(&document_xml)?;

    let hyperlinks = if body.link_ids.is_empty() {
        Vec::new()
    } else {
        let has_rels = archive.file_names().any(|name| name == DOCUMENT_RELS_PART);
        let targets = if has_rels {
            read_link_targets(&read_part(&mut archive, DOCUMENT_RELS_PART)?)?
        } else {
            HashMap::new()
        };
        let mut links: Vec<String> = Vec::new();
        for id in &body.link_ids {
            if let Some(target) = targets.get(id) {
                if !links.contains(target) {
                    links.push(target.clone());
                }
            }
        }
        links
    };

    let mut headers = Vec::new();
    let mut footers = Vec::new();
    for name in archive.file_names() {
        if is_part(name, "word/header") {
            headers.push(name.to_string());
        } else if is_part(name, "word/footer") {
            footers.push(name.to_string());
        }
    }
    headers.sort();
    footers.sort();

    let mut header_footer = Vec::new();
    for name in headers.iter().chain(&footers) {
        let xml = read_part(&mut archive, name)?;
        header_footer.extend(read_paragraphs(&xml)?.lines);
    }

    Ok(ExtractedText {
        body: body.lines.join("\n"),
        hyperlinks,
        header_footer,
    })
}

/// `word/header1.xml` style part names; excludes `_rels` entries.
fn is_part(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|index| index.chars().all(|c| c.is_ascii_digit()))
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> anyhow::Result<String> {
    let mut file = archive
        .by_name(name)
        .with_context(|| format!("missing part {name}"))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .with_context(|| format!("unreadable part {name}"))?;
    Ok(xml)
}

#[derive(Debug, Default)]
struct Paragraphs {
    lines: Vec<String>,
    /// Relationship ids of `w:hyperlink` elements, in document order.
    link_ids: Vec<String>,
}

/// Collects the text of every non-empty `w:p`, reading only `w:t` runs.
///
/// A paragraph nested inside another (text boxes) ends the outer line read so far, so
/// lines stay in reading order. `mc:Fallback` duplicates its `mc:Choice` and is skipped.
fn read_paragraphs(xml: &str) -> anyhow::Result<Paragraphs> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Paragraphs::default();
    let mut current = String::new();
    let mut in_text = false;
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.end_line(&mut current),
                b"w:t" => in_text = true,
                b"mc:Fallback" => fallback_depth += 1,
                b"w:hyperlink" if fallback_depth == 0 => {
                    if let Some(id) = attribute(&e, b"r:id") {
                        paragraphs.link_ids.push(id);
                    }
                }
                _ => {}
            },
            Event::Empty(e) if fallback_depth == 0 => match e.name().as_ref() {
                b"w:tab" => current.push(' '),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.end_line(&mut current),
                b"mc:Fallback" => fallback_depth = fallback_depth.saturating_sub(1),
                _ => {}
            },
            Event::Text(e) if in_text && fallback_depth == 0 => current.push_str(&e.decode()?),
            Event::GeneralRef(e) if in_text && fallback_depth == 0 => {
                let name = e.decode()?;
                if let Some(resolved) = resolve_entity(&name) {
                    current.push(resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.end_line(&mut current);
    Ok(paragraphs)
}

impl Paragraphs {
    /// Moves the trimmed text of `current` into `lines` unless it is blank.
    fn end_line(&mut self, current: &mut String) {
        let line = current.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        current.clear();
    }
}

/// Maps relationship ids to external hyperlink targets.
fn read_link_targets(xml: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                let is_hyperlink = attribute(&e, b"Type")
                    .is_some_and(|t| t.ends_with("/hyperlink"));
                if let (true, Some(id), Some(target)) =
                    (is_hyperlink, attribute(&e, b"Id"), attribute(&e, b"Target"))
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| unescape(&String::from_utf8_lossy(&attr.value)))
}

/// Resolves a predefined or numeric character entity name (without `&` and `;`).
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let number = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(number)
        }
    }
}

/// Attribute values keep their raw escapes; targets such as `?a=1&amp;b=2` need them resolved.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';').and_then(|end| Some((end, resolve_entity(&tail[..end])?))) {
            Some((end, ch)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
