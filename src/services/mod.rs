//! Service layer for the tracker.
//!
//! This module contains the business logic for:
//! - Listing discovery (`ListingCrawler`)
//! - Detail page reading (`DetailPageProcessor`)
//! - Phase classification and metadata extraction
//! - Name matching in PDF/DOCX documents
//! - Gazette search (`GazetteSearcher`)
//! - Message formatting and delivery (`Notifier`)

mod details;
mod gazette;
mod listings;
pub mod matcher;
mod messages;
mod metadata;
mod notifier;
mod phases;

pub use details::{DetailPageProcessor, parse_detail_page};
pub use gazette::{GazetteOutcome, GazetteSearcher};
pub use listings::ListingCrawler;
pub use matcher::{contains_name, scan_file};
pub use messages::{
    DocumentAlert, EXCERPT_LIMIT, found_message, gazette_message, metadata_block,
    not_found_message, truncate_graphemes,
};
pub use metadata::{extract_metadata, flatten_text};
pub use notifier::{CallMeBotNotifier, LogNotifier, Notifier, notifier_from_config};
pub use phases::{PhaseClassifier, classify_phase};
