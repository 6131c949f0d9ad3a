// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fail on any non-2xx status.
pub fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AppError::status(response.url().as_str(), status))
    }
}

/// Fetch a page body as text.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = ensure_success(client.get(url).send().await?)?;
    Ok(response.text().await?)
}

/// Download a binary file into memory with its own timeout.
pub async fn download(client: &Client, url: &str, timeout_secs: u64) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await?;
    let bytes = ensure_success(response)?.bytes().await?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_fetch_sends_configured_user_agent() {
        let server = MockServer::start().await;
        let config = CrawlerConfig::default();
        Mock::given(method("GET"))
            .and(path("/lista.aspx"))
            .and(header("user-agent", config.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&config).unwrap();
        let body = fetch_text(&client, &format!("{}/lista.aspx", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<p>ok</p>");
    }

    #[tokio::test]
    async fn test_non_success_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = create_client(&CrawlerConfig::default()).unwrap();
        let err = download(&client, &format!("{}/a.pdf", server.uri()), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { status: 503, .. }));
    }
}
