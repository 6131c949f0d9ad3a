//! Name search inside downloaded PDF and DOCX documents.
//!
//! Matching is a lowercase substring test. Accents, hyphenation and
//! whitespace differences are not normalized, so a name broken across lines
//! in the source document can be missed.

use std::io::{Cursor, Read};
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{AppError, Result};
use crate::models::DocumentKind;

/// Whether `name` occurs in the document, ignoring case.
///
/// Unreadable documents are logged and count as "not found".
pub fn contains_name(bytes: &[u8], kind: DocumentKind, name: &str) -> bool {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let result = match kind {
        DocumentKind::Pdf => pdf_contains(bytes, &needle),
        DocumentKind::Docx => docx_contains(bytes, &needle),
    };

    result.unwrap_or_else(|e| {
        log::warn!("Could not read {kind} document: {e}");
        false
    })
}

/// Run the matcher on a file from disk, picking the format by extension.
pub fn scan_file(path: &Path, name: &str) -> Result<bool> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let kind = DocumentKind::from_extension(ext).ok_or_else(|| {
        AppError::validation(format!("unsupported file type: {}", path.display()))
    })?;
    let bytes = std::fs::read(path)?;
    Ok(contains_name(&bytes, kind, name))
}

// --- PDF ---

fn pdf_contains(bytes: &[u8], needle: &str) -> Result<bool> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(AppError::document("pdf", "no pages"));
    }

    for (page_num, page_id) in pages {
        if page_text(&doc, page_num, page_id)
            .to_lowercase()
            .contains(needle)
        {
            log::debug!("Name found on page {page_num}");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Text of one page: lopdf's font-aware extraction followed by a raw scan of
/// the text-showing operators, which catches pages whose fonts lopdf cannot
/// decode.
fn page_text(doc: &Document, page_num: u32, page_id: ObjectId) -> String {
    let mut text = doc.extract_text(&[page_num]).unwrap_or_else(|e| {
        log::debug!("Text extraction failed on page {page_num}: {e}");
        String::new()
    });

    match operator_text(doc, page_id) {
        Ok(raw) => {
            text.push('\n');
            text.push_str(&raw);
        }
        Err(e) => log::debug!("Content stream unreadable on page {page_num}: {e}"),
    }
    text
}

fn operator_text(doc: &Document, page_id: ObjectId) -> Result<String> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let mut text = String::new();

    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tj" | "TJ" | "'" | "\"" => {
                for operand in &operation.operands {
                    if let Some(s) = string_operand(operand) {
                        text.push_str(&s);
                    }
                }
            }
            "Td" | "TD" | "T*" | "ET" => {
                if !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }
    Ok(text)
}

fn string_operand(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => {
            if bytes.starts_with(&[0xFE, 0xFF]) {
                let units: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).ok()
            } else {
                // PDFDocEncoding agrees with Latin-1 for the letters that matter here
                Some(bytes.iter().map(|&b| b as char).collect())
            }
        }
        Object::Array(items) => {
            let joined: String = items.iter().filter_map(string_operand).collect();
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

// --- DOCX ---

/// Text content of a word-processor document, split by structural area.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DocxText {
    /// Body paragraphs outside any table
    pub paragraphs: Vec<String>,
    /// One entry per table cell, its paragraphs joined by newlines
    pub cells: Vec<String>,
}

fn docx_contains(bytes: &[u8], needle: &str) -> Result<bool> {
    let text = docx_text(bytes)?;

    // Tables are a separate area: paragraph-only search under-matches.
    let found = text
        .paragraphs
        .iter()
        .chain(text.cells.iter())
        .any(|t| t.to_lowercase().contains(needle));
    Ok(found)
}

/// Read `word/document.xml` and collect paragraph and table-cell text.
pub fn docx_text(bytes: &[u8]) -> Result<DocxText> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut out = DocxText::default();

    let mut table_depth = 0usize;
    let mut cells: Vec<String> = Vec::new();
    // Text boxes nest whole paragraphs inside a run of the outer one.
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" => cells.push(String::new()),
                b"w:p" => paragraphs.push(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                let special = match e.name().as_ref() {
                    b"w:tab" => Some('\t'),
                    b"w:br" | b"w:cr" => Some('\n'),
                    _ => None,
                };
                if let (Some(c), Some(p)) = (special, paragraphs.last_mut()) {
                    p.push(c);
                }
            }
            Event::Text(t) if in_text => {
                let chunk = t.unescape().map_err(|e| AppError::document("docx", e))?;
                match paragraphs.last_mut() {
                    Some(p) => p.push_str(&chunk),
                    None => {
                        if let Some(cell) = cells.last_mut() {
                            cell.push_str(&chunk);
                        }
                    }
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = paragraphs.pop().unwrap_or_default();
                    if table_depth == 0 {
                        out.paragraphs.push(text);
                    } else if let Some(cell) = cells.last_mut() {
                        if !cell.is_empty() {
                            cell.push('\n');
                        }
                        cell.push_str(&text);
                    }
                }
                b"w:tc" => {
                    if let Some(cell) = cells.pop() {
                        out.cells.push(cell);
                    }
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{docx_with, pdf_with_pages};

    const NAME: &str = "Renan Bezerra dos Santos";

    #[test]
    fn test_pdf_match_is_case_insensitive() {
        let pdf = pdf_with_pages(&[
            "CLASSIFICACAO FINAL",
            "1. MARIA SOUZA  2. RENAN BEZERRA DOS SANTOS",
        ]);
        assert!(contains_name(&pdf, DocumentKind::Pdf, NAME));
    }

    #[test]
    fn test_pdf_without_name() {
        let pdf = pdf_with_pages(&["1. MARIA SOUZA", "2. JOAO LIMA"]);
        assert!(!contains_name(&pdf, DocumentKind::Pdf, NAME));
    }

    #[test]
    fn test_malformed_pdf_fails_soft() {
        assert!(!contains_name(b"%PDF-1.5 garbage", DocumentKind::Pdf, NAME));
        assert!(!contains_name(b"", DocumentKind::Pdf, NAME));
    }

    #[test]
    fn test_docx_paragraph_match() {
        let docx = docx_with(&["Convocação", "Renan Bezerra dos Santos - RG 12.345"], &[]);
        assert!(contains_name(&docx, DocumentKind::Docx, NAME));
    }

    #[test]
    fn test_docx_name_only_in_table_cell() {
        let docx = docx_with(
            &["Lista de classificação"],
            &["1º", "renan bezerra dos santos", "85,0"],
        );

        let text = docx_text(&docx).unwrap();
        assert!(
            !text
                .paragraphs
                .iter()
                .any(|p| p.to_lowercase().contains("renan"))
        );
        assert!(contains_name(&docx, DocumentKind::Docx, NAME));
    }

    #[test]
    fn test_docx_runs_are_joined() {
        let docx = crate::test_support::docx_from_body(
            "<w:p><w:r><w:t>Renan Bezerra</w:t></w:r><w:r><w:t xml:space=\"preserve\"> dos Santos</w:t></w:r></w:p>",
        );
        assert_eq!(docx_text(&docx).unwrap().paragraphs, vec![NAME.to_string()]);
    }

    #[test]
    fn test_docx_text_box_keeps_outer_paragraph() {
        let docx = crate::test_support::docx_from_body(
            "<w:p><w:r><w:t>Renan Bezerra dos Santos</w:t></w:r>\
             <w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Anexo</w:t></w:r></w:p>\
             </w:txbxContent></w:pict></w:r></w:p>",
        );
        let text = docx_text(&docx).unwrap();
        assert_eq!(text.paragraphs, vec!["Anexo".to_string(), NAME.to_string()]);
        assert!(contains_name(&docx, DocumentKind::Docx, NAME));
    }

    #[test]
    fn test_legacy_doc_fails_soft() {
        // OLE compound file header, not a zip archive
        let doc = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0, 0, 0];
        assert!(!contains_name(&doc, DocumentKind::Docx, NAME));
    }

    #[test]
    fn test_blank_name_never_matches() {
        let docx = docx_with(&["qualquer texto"], &[]);
        assert!(!contains_name(&docx, DocumentKind::Docx, "  "));
    }

    #[test]
    fn test_scan_file_rejects_unknown_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lista.xlsx");
        std::fs::write(&path, b"x").unwrap();
        assert!(scan_file(&path, NAME).is_err());

        let path = dir.path().join("lista.docx");
        std::fs::write(&path, docx_with(&[NAME], &[])).unwrap();
        assert!(scan_file(&path, NAME).unwrap());
    }
}
