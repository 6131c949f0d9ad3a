// src/services/notifier.rs

//! Outbound notification delivery.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::NotifierConfig;

/// Something that can deliver a text message to the candidate.
///
/// Implementations pace themselves: callers send messages back to back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// WhatsApp delivery through the CallMeBot HTTP API.
pub struct CallMeBotNotifier {
    client: Client,
    config: NotifierConfig,
}

impl CallMeBotNotifier {
    pub fn new(client: Client, config: NotifierConfig) -> Self {
        Self { client, config }
    }

    async fn deliver(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("phone", self.config.phone.as_str()),
                ("text", message),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::notify(format!(
            "CallMeBot returned {status}: {}",
            body.trim()
        )))
    }
}

#[async_trait]
impl Notifier for CallMeBotNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let result = self.deliver(message).await;
        if result.is_ok() {
            log::info!("WhatsApp message sent");
        }

        // The provider rate-limits per phone; every attempt counts.
        tokio::time::sleep(Duration::from_secs(self.config.delay_secs)).await;
        result
    }
}

/// Fallback that only writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        log::warn!("Notifier not configured; message logged only:\n{message}");
        Ok(())
    }
}

/// Pick CallMeBot when credentials are present, the log otherwise.
pub fn notifier_from_config(client: &Client, config: &NotifierConfig) -> Box<dyn Notifier> {
    if config.is_configured() {
        Box::new(CallMeBotNotifier::new(client.clone(), config.clone()))
    } else {
        log::warn!("CALLMEBOT_PHONE/CALLMEBOT_APIKEY not set; notifications go to the log");
        Box::new(LogNotifier)
    }
}
