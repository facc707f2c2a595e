use std::time::Duration;

use export_logging::export_debug;
use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;

use crate::types::ContentEnvelope;
use crate::{ContentPage, FailureKind, FetchError};

/// Header carrying the microCMS API key.
pub const API_KEY_HEADER: &str = "X-MICROCMS-API-KEY";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Source of content pages, addressed by offset and page size.
#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, offset: u64, limit: u32) -> Result<ContentPage, FetchError>;
}

/// Fetches pages from a microCMS list endpoint.
#[derive(Debug, Clone)]
pub struct MicrocmsFetcher {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    settings: FetchSettings,
}

impl MicrocmsFetcher {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
            settings,
        })
    }

    /// `<base_url>?offset=<offset>&limit=<limit>`, keeping any query already on the base.
    pub fn page_url(&self, offset: u64, limit: u32) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ContentFetcher for MicrocmsFetcher {
    async fn fetch(&self, offset: u64, limit: u32) -> Result<ContentPage, FetchError> {
        let url = self.page_url(offset, limit)?;
        export_debug!("GET {} offset={} limit={}", url.path(), offset, limit);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        let envelope: ContentEnvelope = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(envelope.contents)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidRequest, err.to_string());
    }
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
