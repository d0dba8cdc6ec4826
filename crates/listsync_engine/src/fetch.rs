use std::time::Duration;

use futures_util::StreamExt;
use listsync_core::PageEnvelope;
use listsync_logging::{sync_debug, sync_trace};
use reqwest::header::{ACCEPT, CONTENT_LENGTH};
use url::Url;

use crate::decode::decode_page;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Origin that relative locators are resolved against.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl FetchSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolves a locator: absolute URLs are used as-is, anything else is
    /// joined onto `base_url`.
    pub fn resolve(&self, locator: &str) -> Result<Url, FetchError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(FetchError::new(FailureKind::InvalidLocator, "empty locator"));
        }
        if let Ok(url) = Url::parse(locator) {
            return Ok(url);
        }
        let base = Url::parse(&self.base_url).map_err(|err| {
            FetchError::new(
                FailureKind::InvalidLocator,
                format!("invalid base url {}: {err}", self.base_url),
            )
        })?;
        base.join(locator)
            .map_err(|err| FetchError::new(FailureKind::InvalidLocator, err.to_string()))
    }
}

/// Reads one page of a paginated collection.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_page(&self, locator: &str) -> Result<PageEnvelope, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_page(&self, locator: &str) -> Result<PageEnvelope, FetchError> {
        let url = self.settings.resolve(locator)?;
        sync_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let declared_len = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        if let Some(len) = declared_len {
            if len > self.settings.max_bytes {
                return Err(self.too_large(len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        sync_trace!("Received {} bytes", bytes.len());

        decode_page(&bytes).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
