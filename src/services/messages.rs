// src/services/messages.rs

//! Notification text.
//!
//! Messages use WhatsApp markup (`*bold*`, `_italic_`) and are written in
//! Portuguese for the candidate.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{DocumentDescriptor, GazettePublication, ProcessMetadata};

/// Longest gazette excerpt quoted in a message, in graphemes.
pub const EXCERPT_LIMIT: usize = 300;

/// A new portal document and where it was found.
#[derive(Debug, Clone, Copy)]
pub struct DocumentAlert<'a> {
    pub document: &'a DocumentDescriptor,
    pub metadata: &'a ProcessMetadata,
    pub listing_label: &'a str,
    pub detail_url: &'a str,
}

/// Alert for a document that mentions the candidate.
pub fn found_message(alert: &DocumentAlert<'_>) -> String {
    format!(
        "🚨🚨🚨 *SEU NOME FOI ENCONTRADO!* 🚨🚨🚨\n\n\
         {meta}\n\n\
         {doc}\n\
         🔗 *Arquivo:* {file}\n\
         📋 *Página:* {page}",
        meta = metadata_block(alert.metadata, alert.listing_label),
        doc = document_lines(alert.document),
        file = alert.document.url,
        page = alert.detail_url,
    )
}

/// Alert for a new document where the candidate's name was not found.
pub fn not_found_message(alert: &DocumentAlert<'_>) -> String {
    format!(
        "⚠️ *Nova publicação detectada*\n\n\
         {meta}\n\n\
         {doc}\n\
         Seu nome *não* foi encontrado na busca automática.\n\
         🔗 *Arquivo:* {file}\n\
         📋 *Página:* {page}",
        meta = metadata_block(alert.metadata, alert.listing_label),
        doc = document_lines(alert.document),
        file = alert.document.url,
        page = alert.detail_url,
    )
}

/// Alert for a gazette publication naming the candidate.
pub fn gazette_message(publication: &GazettePublication, site_base: &str) -> String {
    let mut msg = format!(
        "📰 *SEU NOME NO DIÁRIO OFICIAL!* 📰\n\n\
         📌 *Publicação:* {}\n\
         📅 *Data:* {}\n\
         🏛️ *Seção:* {}\n\
         🔎 *Menções encontradas:* {}\n",
        publication.display_title(),
        publication.day(),
        publication.hierarchy,
        publication.total_terms_found,
    );

    if !publication.excerpt.is_empty() {
        msg.push_str(&format!(
            "📝 *Trecho:* _{}_\n",
            truncate_graphemes(&publication.excerpt, EXCERPT_LIMIT)
        ));
    }
    if let Some(url) = publication.public_url(site_base) {
        msg.push_str(&format!("🔗 *Link:* {url}"));
    }
    msg
}

/// Process identification lines. Empty fields are left out; the listing
/// label is always present.
pub fn metadata_block(metadata: &ProcessMetadata, listing_label: &str) -> String {
    let fields = [
        ("📌", "Edital", &metadata.edital),
        ("🏫", "Unidade", &metadata.unidade),
        ("📍", "Cidade", &metadata.cidade),
        ("📚", "Disciplina", &metadata.disciplina),
    ];

    let mut lines: Vec<String> = fields
        .iter()
        .filter(|(_, _, value)| !value.is_empty())
        .map(|(icon, label, value)| format!("{icon} *{label}:* {value}"))
        .collect();
    lines.push(format!("🗂️ *Tipo:* {listing_label}"));
    lines.join("\n")
}

fn document_lines(doc: &DocumentDescriptor) -> String {
    format!(
        "📄 *Documento:* {}\n🔖 *Fase:* {} {}",
        doc.name,
        doc.phase.icon(),
        doc.phase.label()
    )
}

/// Cut `text` to `limit` graphemes, marking the cut with an ellipsis.
pub fn truncate_graphemes(text: &str, limit: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(limit).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, Phase};

    fn document() -> DocumentDescriptor {
        DocumentDescriptor {
            name: "Classificação Final".into(),
            url: "https://portal.example/Arquivos/final.pdf".into(),
            kind: DocumentKind::Pdf,
            phase: Phase::FinalRanking,
        }
    }

    fn metadata() -> ProcessMetadata {
        ProcessMetadata {
            edital: "229/11/2026".into(),
            unidade: "Etec Bento Quirino".into(),
            cidade: String::new(),
            disciplina: "Matemática".into(),
        }
    }

    #[test]
    fn test_found_message() {
        let (doc, meta) = (document(), metadata());
        let alert = DocumentAlert {
            document: &doc,
            metadata: &meta,
            listing_label: "ETEC – Inscrições Abertas",
            detail_url: "https://portal.example/Detalhe.aspx?k=1",
        };

        let msg = found_message(&alert);
        assert!(msg.starts_with("🚨🚨🚨 *SEU NOME FOI ENCONTRADO!*"));
        assert!(msg.contains("📌 *Edital:* 229/11/2026\n🏫 *Unidade:* Etec Bento Quirino\n📚"));
        assert!(!msg.contains("Cidade"));
        assert!(msg.contains("🗂️ *Tipo:* ETEC – Inscrições Abertas"));
        assert!(msg.contains("🔖 *Fase:* 🏆 Classificação Final"));
        assert!(msg.contains("🔗 *Arquivo:* https://portal.example/Arquivos/final.pdf"));
        assert!(msg.ends_with("📋 *Página:* https://portal.example/Detalhe.aspx?k=1"));
        assert!(!msg.contains("não"));
    }

    #[test]
    fn test_not_found_message() {
        let (doc, meta) = (document(), ProcessMetadata::default());
        let alert = DocumentAlert {
            document: &doc,
            metadata: &meta,
            listing_label: "FATEC",
            detail_url: "https://portal.example/d",
        };

        let msg = not_found_message(&alert);
        assert!(msg.starts_with("⚠️ *Nova publicação detectada*\n\n🗂️ *Tipo:* FATEC\n\n"));
        assert!(msg.contains("Seu nome *não* foi encontrado na busca automática."));
    }

    #[test]
    fn test_gazette_message_truncates_excerpt() {
        let publication = GazettePublication {
            id: "1".into(),
            title: String::new(),
            slug: "executivo/portaria-1".into(),
            hierarchy: "Executivo > CEETEPS".into(),
            excerpt: "é".repeat(320),
            date: "2026-10-02T00:00:00".into(),
            total_terms_found: 2,
        };

        let msg = gazette_message(&publication, "https://www.doe.sp.gov.br/");
        assert!(msg.contains("📌 *Publicação:* Sem título\n"));
        assert!(msg.contains("📅 *Data:* 2026-10-02\n"));
        assert!(msg.contains("🔎 *Menções encontradas:* 2\n"));
        assert!(msg.contains(&format!("_{}…_", "é".repeat(300))));
        assert!(msg.ends_with("🔗 *Link:* https://www.doe.sp.gov.br/executivo/portaria-1"));
    }

    #[test]
    fn test_gazette_message_without_excerpt_or_link() {
        let publication = GazettePublication {
            title: "Portaria".into(),
            ..Default::default()
        };
        let msg = gazette_message(&publication, "https://www.doe.sp.gov.br");
        assert!(!msg.contains("Trecho"));
        assert!(!msg.contains("Link"));
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("abc", 3), "abc");
        assert_eq!(truncate_graphemes("abcd", 3), "abc…");
        // Combining sequences count as one grapheme.
        assert_eq!(truncate_graphemes("e\u{301}e\u{301}", 1), "e\u{301}…");
    }
}
