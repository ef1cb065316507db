// src/congress/client.rs
use async_trait::async_trait;
use reqwest::header;

use crate::congress::models::{BillReference, BillResponse, TextVersion, TextVersionsResponse};
use crate::congress::BillTextSource;
use crate::utils::config::Config;
use crate::utils::error::CongressError;

/// HTTP client for the Congress.gov v3 API and the documents it links to.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct CongressClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl CongressClient {
    /// Creates a client with the configured User-Agent and a per-request timeout.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Calls an API endpoint relative to the base URL and decodes its JSON body.
    async fn get_api_json<T>(&self, path: &str) -> Result<T, CongressError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{}", self.api_base, path);
        tracing::debug!("Querying Congress.gov API: {}", url); // api_key stays out of the log

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let response = check_status(response, &url)?;

        response
            .json::<T>()
            .await
            .map_err(|e| CongressError::Parse(format!("{}: {}", url, e)))
    }

    /// Downloads a linked document; non-2xx statuses become errors.
    async fn get_document(&self, url: &str) -> Result<reqwest::Response, CongressError> {
        tracing::info!("Downloading document from: {}", url);
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/xml,text/html,application/pdf,text/plain,*/*")
            .send()
            .await?;
        check_status(response, url)
    }
}

fn check_status(response: reqwest::Response, url: &str) -> Result<reqwest::Response, CongressError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        tracing::warn!("Received 404 Not Found for URL: {}", url);
        return Err(CongressError::NotFound(url.to_string()));
    }
    if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        tracing::warn!("Received {} - check the API key and rate limits.", status);
    }
    tracing::error!("HTTP error status: {} for URL: {}", status, url);
    Err(CongressError::Http(status))
}

#[async_trait]
impl BillTextSource for CongressClient {
    async fn text_versions(&self, bill: &BillReference) -> Result<Vec<TextVersion>, CongressError> {
        let payload: TextVersionsResponse = self.get_api_json(&format!("bill/{}/text", bill.api_path())).await?;
        Ok(payload.text_versions.into_iter().map(TextVersion::from).collect())
    }

    async fn fetch_text(&self, url: &str) -> Result<String, CongressError> {
        let body = self.get_document(url).await?.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CongressError> {
        let body = self.get_document(url).await?.bytes().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    async fn bill_title(&self, bill: &BillReference) -> Result<Option<String>, CongressError> {
        let payload: BillResponse = self.get_api_json(&format!("bill/{}", bill.api_path())).await?;
        Ok(payload.bill.and_then(|b| b.title))
    }
}
