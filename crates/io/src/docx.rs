//! DOCX decode/encode.
//!
//! A DOCX file is a ZIP package; the instruction text lives in
//! `word/document.xml`. Decode walks that part with quick-xml and
//! collects paragraph texts (tabs preserved, formatting ignored). Encode
//! regenerates `word/document.xml` from the model and copies every other
//! package part through verbatim, so styles, numbering and media survive
//! substitution untouched.

use std::io::{Cursor, Read, Write};

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use sheetcheck_model::Document;

use crate::error::DecodeError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Decode a DOCX byte buffer into a document model.
pub fn decode(bytes: &[u8]) -> Result<Document, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| DecodeError::Document(format!("failed to open package: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| DecodeError::MissingPart(DOCUMENT_PART.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| DecodeError::Document(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    let paragraphs = parse_paragraphs(&xml)?;
    Ok(Document::from_paragraphs(paragraphs))
}

/// Encode a document model back into the given DOCX package.
///
/// `package` supplies every part except `word/document.xml`, which is
/// regenerated from `document`.
pub fn encode(package: &[u8], document: &Document) -> Result<Vec<u8>, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(package.to_vec()))
        .map_err(|e| DecodeError::Document(format!("failed to open package: {e}")))?;
    if archive.by_name(DOCUMENT_PART).is_err() {
        return Err(DecodeError::MissingPart(DOCUMENT_PART.to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for index in 0..archive.len() {
        let mut part = archive
            .by_index(index)
            .map_err(|e| DecodeError::Document(format!("failed to read package entry: {e}")))?;
        if part.is_dir() {
            continue;
        }
        let name = part.name().to_string();

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| DecodeError::Encode(format!("entry '{name}': {e}")))?;
        if name == DOCUMENT_PART {
            writer
                .write_all(document_xml(document).as_bytes())
                .map_err(|e| DecodeError::Encode(format!("entry '{name}': {e}")))?;
        } else {
            let mut buf = Vec::new();
            part.read_to_end(&mut buf)
                .map_err(|e| DecodeError::Document(format!("entry '{name}': {e}")))?;
            writer
                .write_all(&buf)
                .map_err(|e| DecodeError::Encode(format!("entry '{name}': {e}")))?;
        }
    }

    let cursor = writer
        .finish()
        .map_err(|e| DecodeError::Encode(format!("failed to finish package: {e}")))?;
    Ok(cursor.into_inner())
}

/// Build a minimal, fresh DOCX package around the document model.
/// Used when there is no source package to re-encode into.
pub fn write_package(document: &Document) -> Result<Vec<u8>, DecodeError> {
    const CONTENT_TYPES: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        "<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
        "</Types>"
    );
    const RELS: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>",
        "</Relationships>"
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        (DOCUMENT_PART, document_xml(document)),
    ] {
        writer
            .start_file(name, options)
            .map_err(|e| DecodeError::Encode(format!("entry '{name}': {e}")))?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| DecodeError::Encode(format!("entry '{name}': {e}")))?;
    }
    let cursor = writer
        .finish()
        .map_err(|e| DecodeError::Encode(format!("failed to finish package: {e}")))?;
    Ok(cursor.into_inner())
}

/// Collect each `<w:p>` paragraph's text. Only `<w:t>` content counts;
/// `<w:tab/>` becomes a literal tab.
fn parse_paragraphs(xml: &str) -> Result<Vec<String>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:t" => in_text = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"w:tab" {
                    if let Some(text) = current.as_mut() {
                        text.push('\t');
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(ref t)) if in_text => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| DecodeError::Document(format!("bad text content: {e}")))?;
                if let Some(text) = current.as_mut() {
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DecodeError::Document(format!("malformed {DOCUMENT_PART}: {e}")))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

/// Serialize the model as WordprocessingML, one `<w:r>` per run.
fn document_xml(document: &Document) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>");
    xml.push_str(
        "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">",
    );
    xml.push_str("<w:body>");
    for block in &document.blocks {
        xml.push_str("<w:p>");
        for run in &block.runs {
            xml.push_str("<w:r><w:t xml:space=\"preserve\">");
            xml.push_str(&escape(run.text.as_str()));
            xml.push_str("</w:t></w:r>");
        }
        xml.push_str("</w:p>");
    }
    xml.push_str("</w:body></w:document>");
    xml
}
