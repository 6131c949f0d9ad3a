//! The processed-item ledger.
//!
//! Every document URL or gazette publication that has ever been handled is a
//! key in [`History`]. A present key means "processed for good": the sweep
//! never downloads, re-records or re-notifies it. The map is insert-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{DocumentDescriptor, GazettePublication, ProcessMetadata, null_as_default};

/// Source tag stored on gazette records.
pub const GAZETTE_SOURCE: &str = "DOE-SP";

/// Key prefix separating gazette publications from document URLs.
pub const GAZETTE_KEY_PREFIX: &str = "doe:";

/// Outcome recorded for a portal document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Icon-prefixed phase label, e.g. `📋 Edital de Abertura`
    #[serde(deserialize_with = "null_as_default")]
    pub phase: String,
    #[serde(deserialize_with = "null_as_default")]
    pub detail_page: String,
    #[serde(deserialize_with = "null_as_default")]
    pub listing: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edital: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unidade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cidade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disciplina: String,
    pub found_name: bool,
    /// SHA-256 of the downloaded bytes, absent when the download failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_sha256: Option<String>,
}

impl DocumentRecord {
    pub fn new(
        doc: &DocumentDescriptor,
        metadata: &ProcessMetadata,
        detail_page: &str,
        listing: &str,
        found_name: bool,
        content_sha256: Option<String>,
    ) -> Self {
        Self {
            name: doc.name.clone(),
            phase: format!("{} {}", doc.phase.icon(), doc.phase.label()),
            detail_page: detail_page.to_string(),
            listing: listing.to_string(),
            edital: metadata.edital.clone(),
            unidade: metadata.unidade.clone(),
            cidade: metadata.cidade.clone(),
            disciplina: metadata.disciplina.clone(),
            found_name,
            content_sha256,
        }
    }
}

/// Outcome recorded for a gazette publication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicationRecord {
    pub source: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hierarchy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: u32,
    /// Always true: being returned by the name search is the match.
    #[serde(default = "found_by_search")]
    pub found_name: bool,
}

fn found_by_search() -> bool {
    true
}

impl PublicationRecord {
    /// History key for a publication id.
    pub fn key(id: &str) -> String {
        format!("{GAZETTE_KEY_PREFIX}{id}")
    }

    pub fn new(publication: &GazettePublication, site_base: &str) -> Self {
        Self {
            source: GAZETTE_SOURCE.to_string(),
            title: publication.display_title().to_string(),
            date: publication.day(),
            hierarchy: publication.hierarchy.clone(),
            url: publication.public_url(site_base).unwrap_or_default(),
            matches: publication.total_terms_found,
            found_name: true,
        }
    }
}

/// One ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HistoryRecord {
    Publication(PublicationRecord),
    Document(DocumentRecord),
}

impl HistoryRecord {
    pub fn found_name(&self) -> bool {
        match self {
            Self::Publication(p) => p.found_name,
            Self::Document(d) => d.found_name,
        }
    }
}

impl From<DocumentRecord> for HistoryRecord {
    fn from(record: DocumentRecord) -> Self {
        Self::Document(record)
    }
}

impl From<PublicationRecord> for HistoryRecord {
    fn from(record: PublicationRecord) -> Self {
        Self::Publication(record)
    }
}

/// Insert-only mapping from processed keys to their records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct History {
    records: BTreeMap<String, HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&HistoryRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Record a key. Returns `false`, leaving the existing record untouched,
    /// when the key was already processed.
    pub fn put(&mut self, key: impl Into<String>, record: impl Into<HistoryRecord>) -> bool {
        let key = key.into();
        if self.records.contains_key(&key) {
            log::debug!("History already holds {key}; keeping the original record");
            return false;
        }
        self.records.insert(key, record.into());
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HistoryRecord)> {
        self.records.iter()
    }

    /// Gather ledger statistics.
    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        for (_, record) in self.iter() {
            match record {
                HistoryRecord::Document(_) => stats.documents += 1,
                HistoryRecord::Publication(_) => stats.publications += 1,
            }
            if record.found_name() {
                stats.found += 1;
            }
        }
        stats
    }
}

/// Counts shown by the `info` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub documents: usize,
    pub publications: usize,
    pub found: usize,
}
