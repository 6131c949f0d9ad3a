//! Documents published on a process detail page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identification of a recruitment process, scraped from its detail page.
///
/// Every field is an empty string when the page does not carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessMetadata {
    /// Opening notice number, e.g. `229/11/2026`
    pub edital: String,
    /// School (unidade de ensino)
    pub unidade: String,
    pub cidade: String,
    /// Discipline, curricular component or course
    pub disciplina: String,
}

impl ProcessMetadata {
    pub fn is_empty(&self) -> bool {
        self.edital.is_empty()
            && self.unidade.is_empty()
            && self.cidade.is_empty()
            && self.disciplina.is_empty()
    }
}

/// Binary formats the matcher can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Map a file extension to a kind. Legacy `.doc` is treated as `.docx`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lifecycle stage of a recruitment process, in the order stages happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    OpeningNotice,
    FeeWaiverResult,
    Reopening,
    ExamBoard,
    ScheduleChange,
    CommitteeChange,
    EnrollmentDecision,
    WrittenExamResult,
    ExamResult,
    FinalRanking,
    Ratification,
    Convocation,
    ValidityExtension,
    /// Nothing more specific matched
    Document,
}

impl Phase {
    /// Human-readable label, as shown to the candidate.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpeningNotice => "Edital de Abertura",
            Self::FeeWaiverResult => "Resultado Redução/Isenção de Taxa",
            Self::Reopening => "Reabertura de Inscrições",
            Self::ExamBoard => "Portaria da Banca Examinadora",
            Self::ScheduleChange => "Alteração de Cronograma",
            Self::CommitteeChange => "Alteração da Comissão",
            Self::EnrollmentDecision => "Deferimento/Indeferimento de Inscrições",
            Self::WrittenExamResult => "Resultado Prova Escrita e Convocação Didática",
            Self::ExamResult => "Resultado de Prova/Avaliação",
            Self::FinalRanking => "Classificação Final",
            Self::Ratification => "Homologação",
            Self::Convocation => "Convocação",
            Self::ValidityExtension => "Prorrogação de Validade",
            Self::Document => "Documento",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::OpeningNotice => "📋",
            Self::FeeWaiverResult => "💰",
            Self::Reopening => "🔄",
            Self::ExamBoard => "👥",
            Self::ScheduleChange => "📅",
            Self::CommitteeChange => "🔀",
            Self::EnrollmentDecision => "✅",
            Self::WrittenExamResult | Self::ExamResult => "📝",
            Self::FinalRanking => "🏆",
            Self::Ratification => "✔️",
            Self::Convocation => "📞",
            Self::ValidityExtension => "⏳",
            Self::Document => "📄",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A downloadable file linked from a detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// Anchor text, or the file name when the anchor is empty
    pub name: String,
    /// Absolute URL; also the history key
    pub url: String,
    pub kind: DocumentKind,
    pub phase: Phase,
}

/// Everything learned from one visit to a detail page.
#[derive(Debug, Clone, Default)]
pub struct DetailPage {
    pub metadata: ProcessMetadata,
    pub documents: Vec<DocumentDescriptor>,
}
