// src/services/listings.rs

//! Listing crawler service.
//!
//! Finds process detail pages on a portal listing page.

use std::collections::HashSet;

use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::utils::{http::fetch_text, resolve_url};

/// Service for discovering detail pages on listing pages.
pub struct ListingCrawler<'a> {
    client: &'a Client,
    marker: String,
    max_links: usize,
}

impl<'a> ListingCrawler<'a> {
    /// Create a new listing crawler.
    pub fn new(client: &'a Client, config: &CrawlerConfig) -> Self {
        Self {
            client,
            marker: config.detail_link_marker.clone(),
            max_links: config.max_processes_per_page,
        }
    }

    /// Fetch a listing page and return its detail links in page order.
    pub async fn discover(&self, listing_url: &str) -> Result<Vec<String>> {
        let base = Url::parse(listing_url)?;
        let html = fetch_text(self.client, listing_url).await?;
        self.extract(&html, &base)
    }

    /// Extract up to `max_links` unique detail links from listing HTML.
    pub fn extract(&self, html: &str, base: &Url) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        let anchors = parse_selector("a[href]")?;

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for href in document
            .select(&anchors)
            .filter_map(|a| a.value().attr("href"))
        {
            // Sort headers are __doPostBack pseudo-links that may repeat the marker.
            if !href.contains(&self.marker) || href.trim_start().starts_with("javascript:") {
                continue;
            }
            let url = resolve_url(base, href.trim());
            if seen.insert(url.clone()) {
                links.push(url);
            }
        }

        if links.len() > self.max_links {
            log::debug!(
                "Listing {} has {} detail links; keeping the first {}",
                base,
                links.len(),
                self.max_links
            );
            links.truncate(self.max_links);
        }
        Ok(links)
    }
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::utils::http::create_client;

    const MARKER: &str = "oljioahohafnav87412";

    fn anchor(i: usize) -> String {
        format!("<a href=\"Detalhe.aspx?{MARKER}={i}\">Processo {i}</a>")
    }

    fn crawler(client: &Client) -> ListingCrawler<'_> {
        ListingCrawler::new(client, &CrawlerConfig::default())
    }

    #[test]
    fn test_filters_resolves_and_dedups() {
        let client = Client::new();
        let html = format!(
            "<table>\
             <tr><th><a href=\"javascript:__doPostBack('ctl00','Sort${MARKER}')\">Unidade</a></th></tr>\
             <tr><td>{}</td><td>{}</td></tr>\
             <tr><td>{}</td></tr>\
             <tr><td><a href=\"/outra/pagina.aspx\">Sobre</a></td></tr>\
             </table>",
            anchor(7),
            anchor(3),
            anchor(7),
        );
        let base = Url::parse("https://portal.example/dgsdad/ETEC/Abertos.aspx").unwrap();

        let links = crawler(&client).extract(&html, &base).unwrap();
        assert_eq!(
            links,
            vec![
                format!("https://portal.example/dgsdad/ETEC/Detalhe.aspx?{MARKER}=7"),
                format!("https://portal.example/dgsdad/ETEC/Detalhe.aspx?{MARKER}=3"),
            ]
        );
    }

    #[test]
    fn test_caps_at_fifty_in_first_seen_order() {
        let client = Client::new();
        let html: String = (0..80).map(anchor).collect();
        let base = Url::parse("https://portal.example/lista.aspx").unwrap();

        let links = crawler(&client).extract(&html, &base).unwrap();
        assert_eq!(links.len(), 50);
        assert!(links[0].ends_with(&format!("{MARKER}=0")));
        assert!(links[49].ends_with(&format!("{MARKER}=49")));
    }

    #[tokio::test]
    async fn test_discover_fetches_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dgsdad/Abertos.aspx"))
            .respond_with(ResponseTemplate::new(200).set_body_string(anchor(1)))
            .mount(&server)
            .await;

        let client = create_client(&CrawlerConfig::default()).unwrap();
        let links = crawler(&client)
            .discover(&format!("{}/dgsdad/Abertos.aspx", server.uri()))
            .await
            .unwrap();
        assert_eq!(
            links,
            vec![format!("{}/dgsdad/Detalhe.aspx?{MARKER}=1", server.uri())]
        );
    }

    #[tokio::test]
    async fn test_discover_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = create_client(&CrawlerConfig::default()).unwrap();
        let result = crawler(&client)
            .discover(&format!("{}/Abertos.aspx", server.uri()))
            .await;
        assert!(matches!(result, Err(AppError::Status { status: 500, .. })));
    }
}
