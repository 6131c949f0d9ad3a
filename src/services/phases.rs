//! Phase classification for published documents.
//!
//! Rules are evaluated top to bottom and the first match wins. The table
//! follows the order in which a process actually unfolds, and several
//! patterns overlap ("resultado" appears in many names), so reordering it
//! changes results.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::Phase;

/// Built-in rules, in lifecycle order.
const PHASE_RULES: &[(&str, Phase)] = &[
    (r"edital\s*de\s*abertura|EDITALDE?ABERTURA", Phase::OpeningNotice),
    (r"redu[cç][aã]o.*isen[cç][aã]o|REDUCAO.ISENCAO", Phase::FeeWaiverResult),
    (r"reabertura", Phase::Reopening),
    (r"banca\s*examinadora|BANCAEXAMINADORA", Phase::ExamBoard),
    (r"altera[cç][aã]o.*cronograma|ALTERACAOCRONOGRAMA", Phase::ScheduleChange),
    (r"altera[cç][aã]o.*comiss[aã]o|ALTERACAOCOMISSAO", Phase::CommitteeChange),
    (r"deferimento|indeferimento", Phase::EnrollmentDecision),
    (
        r"resultado.*escrita.*conv|RESULTADOESCRITACONV|resultado.*pve",
        Phase::WrittenExamResult,
    ),
    (r"resultado.*memorial|resultado.*prova|RESULTADO", Phase::ExamResult),
    (
        r"classifica[cç][aã]o\s*final|CLASSIFICAOFINAL|CLASSIFICACAOFINAL",
        Phase::FinalRanking,
    ),
    (r"homologa[cç][aã]o|HOMOLOGA", Phase::Ratification),
    (r"convoca[cç][aã]o|CONVOCAO|CONVOCACAO", Phase::Convocation),
    (r"prorroga[cç][aã]o|PRORROGA", Phase::ValidityExtension),
];

static STANDARD: LazyLock<PhaseClassifier> = LazyLock::new(|| {
    PhaseClassifier::with_rules(PHASE_RULES).expect("built-in phase patterns are valid")
});

/// Ordered (pattern, phase) rule list.
pub struct PhaseClassifier {
    rules: Vec<(Regex, Phase)>,
}

impl PhaseClassifier {
    /// Compile a rule table. Patterns match anywhere, ignoring case.
    pub fn with_rules(rules: &[(&str, Phase)]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(pattern, phase)| {
                Regex::new(&format!("(?i){pattern}"))
                    .map(|re| (re, *phase))
                    .map_err(|e| AppError::config(format!("bad phase pattern {pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The portal's lifecycle rules.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Classify a document by its display name and URL.
    pub fn classify(&self, name: &str, url: &str) -> Phase {
        let haystack = format!("{name} {url}");
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(&haystack))
            .map(|(_, phase)| *phase)
            .unwrap_or(Phase::Document)
    }
}

/// Classify with the standard rules.
pub fn classify_phase(name: &str, url: &str) -> Phase {
    PhaseClassifier::standard().classify(name, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_compile() {
        assert_eq!(PhaseClassifier::standard().rules.len(), PHASE_RULES.len());
    }

    #[test]
    fn test_opening_notice_wins_regardless_of_other_words() {
        for url in [
            "https://portal/doc.pdf",
            "https://portal/resultado_classificacao_final_homologacao.pdf",
            "https://portal/convocacao.pdf",
        ] {
            assert_eq!(
                classify_phase("edital de abertura 2026", url),
                Phase::OpeningNotice
            );
        }
    }

    #[test]
    fn test_earliest_rule_governs() {
        // The bare "resultado" alternative sits before the final-ranking rule.
        assert_eq!(
            classify_phase("Resultado - Classificação Final 2026", ""),
            Phase::ExamResult
        );
        assert_eq!(
            classify_phase("Classificação Final 2026", ""),
            Phase::FinalRanking
        );
    }

    #[test]
    fn test_matches_url_when_name_is_generic() {
        assert_eq!(
            classify_phase(
                "Clique aqui",
                "https://portal/arquivos/EDITALDEABERTURA_229.pdf"
            ),
            Phase::OpeningNotice
        );
        assert_eq!(
            classify_phase("arquivo.pdf", "https://portal/CLASSIFICACAOFINAL.pdf"),
            Phase::FinalRanking
        );
    }

    #[test]
    fn test_accents_and_case() {
        assert_eq!(
            classify_phase("REDUÇÃO E ISENÇÃO DA TAXA", ""),
            Phase::FeeWaiverResult
        );
        assert_eq!(
            classify_phase("Alteração do Cronograma", ""),
            Phase::ScheduleChange
        );
        assert_eq!(
            classify_phase("alteracao da comissao", ""),
            Phase::CommitteeChange
        );
        assert_eq!(
            classify_phase("Indeferimento de inscrições", ""),
            Phase::EnrollmentDecision
        );
        assert_eq!(
            classify_phase("Resultado da prova escrita e convocação", ""),
            Phase::WrittenExamResult
        );
        assert_eq!(classify_phase("Homologação", ""), Phase::Ratification);
        assert_eq!(classify_phase("Convocação 1ª chamada", ""), Phase::Convocation);
        assert_eq!(
            classify_phase("Prorrogação de validade", ""),
            Phase::ValidityExtension
        );
    }

    #[test]
    fn test_fallback_is_generic_document() {
        assert_eq!(
            classify_phase("Anexo I", "https://portal/anexo.pdf"),
            Phase::Document
        );
    }

    #[test]
    fn test_custom_rules_reject_bad_pattern() {
        assert!(PhaseClassifier::with_rules(&[("(unclosed", Phase::Document)]).is_err());
    }
}
