// src/models/mod.rs

//! Domain models for the tracker.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

use serde::{Deserialize, Deserializer};

mod config;
mod document;
mod gazette;
mod history;

// Re-export all public types
pub use config::{
    CandidateConfig, Config, CrawlerConfig, GazetteConfig, ListingSource, NotifierConfig,
    StorageConfig,
};
pub use document::{DetailPage, DocumentDescriptor, DocumentKind, Phase, ProcessMetadata};
pub use gazette::{GazettePublication, SearchPage};
pub use history::{
    DocumentRecord, GAZETTE_KEY_PREFIX, GAZETTE_SOURCE, History, HistoryRecord, HistoryStats,
    PublicationRecord,
};

/// Read an explicit JSON `null` as the field type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
