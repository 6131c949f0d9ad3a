//! DOE-SP search API payloads.

use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// One page of the advanced-search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<GazettePublication>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
}

/// A publication mentioning the searched terms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GazettePublication {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hierarchy: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// ISO 8601 timestamp
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_terms_found: u32,
}

impl GazettePublication {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Sem título"
        } else {
            &self.title
        }
    }

    /// Publication day (`YYYY-MM-DD`) cut from the timestamp.
    pub fn day(&self) -> String {
        self.date.chars().take(10).collect()
    }

    /// Link on the public site, when the API gave a slug.
    pub fn public_url(&self, site_base: &str) -> Option<String> {
        if self.slug.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{}",
            site_base.trim_end_matches('/'),
            self.slug.trim_start_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_page() {
        let json = r#"{
            "items": [{
                "id": "9f1c", "title": "Portaria CEETEPS", "slug": "executivo/portaria-1",
                "hierarchy": "Executivo > Centro Paula Souza", "excerpt": "...",
                "date": "2026-10-02T00:00:00", "totalTermsFound": 3
            }],
            "hasNextPage": true,
            "totalItems": 1
        }"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.items.len(), 1);

        let publication = &page.items[0];
        assert_eq!(publication.total_terms_found, 3);
        assert_eq!(publication.day(), "2026-10-02");
        assert_eq!(
            publication.public_url("https://www.doe.sp.gov.br/").as_deref(),
            Some("https://www.doe.sp.gov.br/executivo/portaria-1")
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let page: SearchPage = serde_json::from_str(r#"{"items": [{"id": "1"}]}"#).unwrap();
        assert!(!page.has_next_page);
        let publication = &page.items[0];
        assert_eq!(publication.display_title(), "Sem título");
        assert_eq!(publication.public_url("https://x"), None);
        assert_eq!(publication.day(), "");
    }

    #[test]
    fn test_null_fields_default() {
        let json = r#"{"items": [{
            "id": "7", "title": null, "slug": null, "hierarchy": null,
            "excerpt": null, "date": null, "totalTermsFound": null
        }]}"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        let publication = &page.items[0];
        assert_eq!(publication.id, "7");
        assert_eq!(publication.display_title(), "Sem título");
        assert_eq!(publication.excerpt, "");
        assert_eq!(publication.total_terms_found, 0);
        assert_eq!(publication.public_url("https://x"), None);
    }
}
