//! Process metadata extraction from detail-page text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::models::ProcessMetadata;

// Values run until the next known label on the same flattened line.
static EDITAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)EDITAL\s+DE\s+ABERTURA\s+N[ºo°]\s*([\d/]+)").expect("valid edital pattern")
});

static UNIDADE_CIDADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)UNIDADE\s+DE\s+ENSINO:\s*(.+?)\s*-\s*CIDADE:\s*(.+?)(?:\n|CURSO|DISCIPLINA|COMPONENTE|REQUISITO|Os pedidos|Per[ií]odo)",
    )
    .expect("valid unidade pattern")
});

static DISCIPLINA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:DISCIPLINA|COMPONENTE\s+CURRICULAR):\s*(?:\d+\s*-\s*)?(.+?)(?:\n|REQUISITO|Os pedidos|Per[ií]odo)",
    )
    .expect("valid disciplina pattern")
});

static CURSO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)CURSO:\s*(.+?)(?:\n|DISCIPLINA|COMPONENTE|REQUISITO|Os pedidos|Per[ií]odo)",
    )
    .expect("valid curso pattern")
});

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 2] = ["script", "style"];

/// Visible text of a page: trimmed text nodes joined by single spaces.
pub fn flatten_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter(|node| {
            !node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
            })
        })
        .filter_map(|node| node.value().as_text())
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract edital number, school, city and discipline from page text.
///
/// Missing fields stay empty; this never fails.
pub fn extract_metadata(text: &str) -> ProcessMetadata {
    let mut meta = ProcessMetadata::default();

    if let Some(edital) = capture(&EDITAL, text, 1) {
        meta.edital = edital;
    }

    // School and city share a line, so they are captured together.
    if let Some(caps) = UNIDADE_CIDADE.captures(text) {
        meta.unidade = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
        meta.cidade = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    }

    meta.disciplina = capture(&DISCIPLINA, text, 1)
        .or_else(|| capture(&CURSO, text, 1))
        .unwrap_or_default();

    meta
}

fn capture(re: &Regex, text: &str, group: usize) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
