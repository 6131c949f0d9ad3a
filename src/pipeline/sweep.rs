// src/pipeline/sweep.rs

//! One full tracking sweep.
//!
//! Listing pages are crawled in configured order, each new document is
//! downloaded, matched, recorded and announced, then the gazette is
//! searched and the history persisted. Everything runs sequentially.

use std::fmt;

use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{Config, DetailPage, DocumentRecord, History, ListingSource};
use crate::services::{
    DetailPageProcessor, DocumentAlert, GazetteSearcher, ListingCrawler, Notifier, contains_name,
    found_message, not_found_message,
};
use crate::storage::HistoryStore;
use crate::utils::http::{create_client, download};
use crate::utils::log;

/// Where a sweep currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Idle,
    CrawlingListings,
    ProcessingDetails,
    SearchingGazette,
    Persisting,
    Done,
}

impl fmt::Display for SweepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CrawlingListings => "crawling listings",
            Self::ProcessingDetails => "processing details",
            Self::SearchingGazette => "searching gazette",
            Self::Persisting => "persisting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Counts gathered over one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub listings: usize,
    pub listing_failures: usize,
    pub detail_pages: usize,
    pub detail_failures: usize,
    pub new_documents: usize,
    pub names_found: usize,
    pub download_failures: usize,
    pub gazette_evaluated: usize,
    pub gazette_new: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    pub history_size: usize,
}

impl SweepReport {
    /// Log the report as a summary block.
    pub fn log_summary(&self) {
        log::summary(
            "Sweep finished",
            &[
                ("Listing pages", self.listings.to_string()),
                ("Listing failures", self.listing_failures.to_string()),
                ("Detail pages", self.detail_pages.to_string()),
                ("Detail failures", self.detail_failures.to_string()),
                ("New documents", self.new_documents.to_string()),
                ("Name found in", self.names_found.to_string()),
                ("Failed downloads", self.download_failures.to_string()),
                ("Gazette items evaluated", self.gazette_evaluated.to_string()),
                ("New gazette publications", self.gazette_new.to_string()),
                ("Notifications sent", self.notifications_sent.to_string()),
                ("Notifications failed", self.notifications_failed.to_string()),
                ("History entries", self.history_size.to_string()),
            ],
        );
    }
}

/// A configured sweep over the portal and the gazette.
pub struct Sweep<'a> {
    config: &'a Config,
    client: &'a Client,
    store: &'a dyn HistoryStore,
    notifier: &'a dyn Notifier,
    skip_gazette: bool,
    state: SweepState,
}

impl<'a> Sweep<'a> {
    pub fn new(
        config: &'a Config,
        client: &'a Client,
        store: &'a dyn HistoryStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            client,
            store,
            notifier,
            skip_gazette: false,
            state: SweepState::Idle,
        }
    }

    /// Leave out the gazette pass regardless of configuration.
    pub fn skip_gazette(mut self, skip: bool) -> Self {
        self.skip_gazette = skip;
        self
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    fn transition(&mut self, next: SweepState) {
        if self.state != next {
            ::log::debug!("Sweep state: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Run the sweep.
    ///
    /// Configuration problems fail before any request is made. After the
    /// history is loaded, per-item failures are logged and skipped and the
    /// history is always written back.
    pub async fn run(&mut self) -> Result<SweepReport> {
        self.config.validate()?;

        let mut history = self.store.load().await?;
        let mut report = SweepReport::default();

        let config = self.config;
        ::log::info!("Tracking name: {}", config.candidate.name);
        ::log::info!("Listing pages: {}", config.listings.len());

        for listing in &config.listings {
            self.crawl_listing(listing, &mut history, &mut report).await;
        }

        if self.config.gazette.enabled && !self.skip_gazette {
            self.transition(SweepState::SearchingGazette);
            log::header("DOE-SP: searching the official gazette");
            log::sub_item(&format!(
                "Window: last {} days",
                self.config.gazette.search_days
            ));

            let outcome = GazetteSearcher::new(self.client, &self.config.gazette)
                .search(&self.config.candidate.name, &mut history, self.notifier)
                .await;
            report.gazette_evaluated = outcome.evaluated;
            report.gazette_new = outcome.new_publications;
            report.notifications_sent += outcome.notifications_sent;
            report.notifications_failed += outcome.notifications_failed;
        } else {
            ::log::info!("Gazette search skipped");
        }

        self.transition(SweepState::Persisting);
        self.store.save(&history).await?;
        report.history_size = history.len();

        self.transition(SweepState::Done);
        report.log_summary();
        Ok(report)
    }

    async fn crawl_listing(
        &mut self,
        listing: &ListingSource,
        history: &mut History,
        report: &mut SweepReport,
    ) {
        self.transition(SweepState::CrawlingListings);
        log::header(&format!("[LISTING] {}", listing.label));
        log::sub_item(&listing.url);
        report.listings += 1;

        let crawler = ListingCrawler::new(self.client, &self.config.crawler);
        let links = match crawler.discover(&listing.url).await {
            Ok(links) => links,
            Err(e) => {
                ::log::warn!("Failed to fetch listing {}: {}", listing.url, e);
                report.listing_failures += 1;
                return;
            }
        };

        if links.is_empty() {
            log::sub_item("No processes on this page");
            return;
        }
        log::sub_item(&format!("{} process(es) found", links.len()));

        self.transition(SweepState::ProcessingDetails);
        let processor = DetailPageProcessor::new(self.client);
        for (i, detail_url) in links.iter().enumerate() {
            ::log::info!("  [{}/{}] {}", i + 1, links.len(), detail_url);
            report.detail_pages += 1;

            match processor.process(detail_url).await {
                Ok(page) => {
                    self.handle_documents(listing, detail_url, &page, history, report)
                        .await
                }
                Err(e) => {
                    ::log::warn!("Failed to process detail page {}: {}", detail_url, e);
                    report.detail_failures += 1;
                }
            }
        }
    }

    async fn handle_documents(
        &self,
        listing: &ListingSource,
        detail_url: &str,
        page: &DetailPage,
        history: &mut History,
        report: &mut SweepReport,
    ) {
        let name = &self.config.candidate.name;

        for doc in &page.documents {
            if history.contains(&doc.url) {
                continue;
            }
            ::log::info!("    [NEW] {} | {} (.{})", doc.phase, doc.name, doc.kind);

            let timeout = self.config.crawler.download_timeout_secs;
            let (found, digest) = match download(self.client, &doc.url, timeout).await {
                Ok(bytes) => {
                    let digest = hex::encode(Sha256::digest(&bytes));
                    (contains_name(&bytes, doc.kind, name), Some(digest))
                }
                Err(e) => {
                    ::log::warn!("Failed to download {}: {}", doc.url, e);
                    report.download_failures += 1;
                    (false, None)
                }
            };

            let record = DocumentRecord::new(
                doc,
                &page.metadata,
                detail_url,
                &listing.label,
                found,
                digest,
            );
            history.put(doc.url.clone(), record);
            report.new_documents += 1;

            let alert = DocumentAlert {
                document: doc,
                metadata: &page.metadata,
                listing_label: &listing.label,
                detail_url,
            };
            let message = if found {
                report.names_found += 1;
                ::log::info!(
                    "    >>> NAME FOUND! Edital {} - {} <<<",
                    or_unknown(&page.metadata.edital),
                    or_unknown(&page.metadata.unidade)
                );
                found_message(&alert)
            } else {
                ::log::info!(
                    "    Name not found. Edital {} - {}",
                    or_unknown(&page.metadata.edital),
                    or_unknown(&page.metadata.unidade)
                );
                not_found_message(&alert)
            };

            match self.notifier.send(&message).await {
                Ok(()) => report.notifications_sent += 1,
                Err(e) => {
                    ::log::warn!("Failed to send notification for {}: {}", doc.url, e);
                    report.notifications_failed += 1;
                }
            }
        }
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "?" } else { value }
}

/// Build a client from the configuration and run one sweep.
pub async fn run_sweep(
    config: &Config,
    store: &dyn HistoryStore,
    notifier: &dyn Notifier,
    skip_gazette: bool,
) -> Result<SweepReport> {
    config.validate()?;
    let client = create_client(&config.crawler)?;
    Sweep::new(config, &client, store, notifier)
        .skip_gazette(skip_gazette)
        .run()
        .await
}
