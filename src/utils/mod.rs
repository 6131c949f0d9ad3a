//! Utility functions and helpers.

pub mod http;
pub mod log;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Last path segment of a link, without its query string.
pub fn file_name(href: &str) -> &str {
    let without_query = href.split(['?', '#']).next().unwrap_or(href);
    without_query.rsplit('/').next().unwrap_or(without_query)
}
