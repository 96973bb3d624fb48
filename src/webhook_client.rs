use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::web::types::WebhookPayload;

/// Something that can take a validated signup off our hands.
/// The HTTP implementation is `WebhookClient`, tests plug in their own.
#[async_trait]
pub trait WebhookRelay: Send + Sync {
    async fn submit(&self, payload: &WebhookPayload<'_>) -> Result<()>;
}

pub struct WebhookClient {
    http_client: Client,
    // Webhook urls usually carry the access token in their path, don't log the whole thing.
    url: Url,
}

impl WebhookClient {
    pub fn new(url: &SecretString, timeout: Option<Duration>) -> Result<Self> {
        let url = Url::parse(url.expose_secret()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(WebhookClient { http_client, url })
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("host", &self.host())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WebhookRelay for WebhookClient {
    async fn submit(&self, payload: &WebhookPayload<'_>) -> Result<()> {
        let resp = self
            .http_client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Reqwest(e.without_url()))?;

        let status = resp.status();
        debug!("{:<12} - {} responded with {status}", "WEBHOOK", self.host());

        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Reqwest(e.without_url()))?;
            return Err(Error::Upstream { status, body });
        }

        Ok(())
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse the webhook url: {0}")]
    UrlParsing(String),
    #[error("webhook responded with {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
