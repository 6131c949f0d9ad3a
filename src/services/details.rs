// src/services/details.rs

//! Detail page processor.
//!
//! Reads a recruitment process page: its identifying metadata and every
//! PDF/DOCX it links to.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::Result;
use crate::models::{DetailPage, DocumentDescriptor, DocumentKind};
use crate::services::listings::parse_selector;
use crate::services::metadata::{extract_metadata, flatten_text};
use crate::services::phases::classify_phase;
use crate::utils::{file_name, http::fetch_text, resolve_url};

static DOCUMENT_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(pdf|docx?)(\?.*)?$").expect("valid document href pattern")
});

/// Service for reading process detail pages.
pub struct DetailPageProcessor<'a> {
    client: &'a Client,
}

impl<'a> DetailPageProcessor<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch a detail page and describe its documents.
    pub async fn process(&self, detail_url: &str) -> Result<DetailPage> {
        let base = Url::parse(detail_url)?;
        let html = fetch_text(self.client, detail_url).await?;
        parse_detail_page(&html, &base)
    }
}

/// Parse detail-page HTML fetched from `base`.
pub fn parse_detail_page(html: &str, base: &Url) -> Result<DetailPage> {
    let document = Html::parse_document(html);
    let metadata = extract_metadata(&flatten_text(&document));
    let anchors = parse_selector("a[href]")?;

    let documents = document
        .select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            let caps = DOCUMENT_HREF.captures(href)?;
            let kind = DocumentKind::from_extension(caps.get(1)?.as_str())?;

            let url = resolve_url(base, href);
            let text: String = a.text().map(str::trim).collect();
            let name = if text.is_empty() {
                file_name(href).to_string()
            } else {
                text
            };
            let phase = classify_phase(&name, &url);

            Some(DocumentDescriptor {
                name,
                url,
                kind,
                phase,
            })
        })
        .collect();

    Ok(DetailPage {
        metadata,
        documents,
    })
}
