// src/services/gazette.rs

//! DOE-SP gazette search.
//!
//! Pages through the advanced-search API for the candidate's name within a
//! rolling window, recording and announcing publications not seen before.

use chrono::{Duration, Local, NaiveDate};
use reqwest::Client;

use crate::error::Result;
use crate::models::{GazetteConfig, History, PublicationRecord, SearchPage};
use crate::services::messages::gazette_message;
use crate::services::notifier::Notifier;
use crate::utils::http::ensure_success;

const SEARCH_PATH: &str = "/v2/advanced-search/publications";

/// Result of one gazette pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GazetteOutcome {
    /// API pages fetched successfully
    pub pages: u32,
    /// Items returned across all pages
    pub evaluated: usize,
    /// Publications added to the history
    pub new_publications: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    /// A request failed and the remaining pages were skipped
    pub aborted: bool,
}

/// Service for searching the official gazette.
pub struct GazetteSearcher<'a> {
    client: &'a Client,
    config: &'a GazetteConfig,
}

impl<'a> GazetteSearcher<'a> {
    pub fn new(client: &'a Client, config: &'a GazetteConfig) -> Self {
        Self { client, config }
    }

    /// Search the window ending today.
    pub async fn search(
        &self,
        name: &str,
        history: &mut History,
        notifier: &dyn Notifier,
    ) -> GazetteOutcome {
        let today = Local::now().date_naive();
        self.search_until(name, today, history, notifier).await
    }

    /// Search the `search_days` window ending on `today`.
    ///
    /// Failures end the pass early; everything recorded before them stays.
    pub async fn search_until(
        &self,
        name: &str,
        today: NaiveDate,
        history: &mut History,
        notifier: &dyn Notifier,
    ) -> GazetteOutcome {
        let mut outcome = GazetteOutcome::default();

        let Some(start) = Duration::try_days(self.config.search_days)
            .and_then(|window| today.checked_sub_signed(window))
        else {
            log::error!(
                "DOE-SP search window of {} days is out of range",
                self.config.search_days
            );
            outcome.aborted = true;
            return outcome;
        };
        let from = start.format("%Y-%m-%d").to_string();
        let to = today.format("%Y-%m-%d").to_string();
        log::info!("Searching DOE-SP for \"{name}\" from {from} to {to}");

        let mut page_number = 1u32;

        loop {
            let page = match self.fetch_page(name, &from, &to, page_number).await {
                Ok(page) => page,
                Err(e) => {
                    log::error!("DOE-SP search failed on page {page_number}: {e}");
                    outcome.aborted = true;
                    break;
                }
            };
            outcome.pages += 1;

            if page.items.is_empty() {
                break;
            }
            outcome.evaluated += page.items.len();

            for publication in &page.items {
                let key = PublicationRecord::key(&publication.id);
                if history.contains(&key) {
                    continue;
                }

                log::info!(
                    "  [DOE NEW] {} ({}, {} mention(s))",
                    publication.display_title(),
                    publication.hierarchy,
                    publication.total_terms_found
                );
                history.put(key, PublicationRecord::new(publication, &self.config.site_base));
                outcome.new_publications += 1;

                let message = gazette_message(publication, &self.config.site_base);
                match notifier.send(&message).await {
                    Ok(()) => outcome.notifications_sent += 1,
                    Err(e) => {
                        log::warn!("Failed to send gazette notification: {e}");
                        outcome.notifications_failed += 1;
                    }
                }
            }

            if !page.has_next_page {
                break;
            }
            page_number += 1;
        }

        if outcome.new_publications == 0 {
            log::info!("No new DOE-SP publications");
        } else {
            log::info!("{} new DOE-SP publication(s)", outcome.new_publications);
        }
        outcome
    }

    async fn fetch_page(&self, name: &str, from: &str, to: &str, page: u32) -> Result<SearchPage> {
        let url = format!("{}{SEARCH_PATH}", self.config.api_base.trim_end_matches('/'));
        let page = page.to_string();
        let page_size = self.config.page_size.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("Terms", name),
                ("FromDate", from),
                ("ToDate", to),
                ("JournalId", self.config.journal_id.as_str()),
                ("PageNumber", page.as_str()),
                ("PageSize", page_size.as_str()),
                ("SortField", "Date"),
            ])
            .send()
            .await?;

        Ok(ensure_success(response)?.json::<SearchPage>().await?)
    }
}
