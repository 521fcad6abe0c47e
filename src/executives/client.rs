//! Executives API client implementation.
//!
//! Handles fetching the executive list for a session and probing avatar images.

use crate::config::Config;
use crate::executives::error::FetchError;
use crate::executives::models::{Executive, parse_executives};
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

/// Executives API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ExecutivesClient {
    /// HTTP client for API requests
    client: Client,
    /// Executives endpoint
    base_url: String,
}

impl ExecutivesClient {
    /// Create a new executives client from configuration.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// * `Result<ExecutivesClient>` - New client or error
    ///
    /// # Details
    /// The configured timeout applies to every request made by this client.
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_url.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Executives API URL is required. Please set api_url in config.jsonc"
            ));
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Fetch the executives of one session.
    ///
    /// # Arguments
    /// * `session` - Session token (e.g. "2022-2023")
    ///
    /// # Returns
    /// * `Result<Vec<Executive>, FetchError>` - Executives in received order
    ///
    /// # Details
    /// Issues `GET {base_url}?session={session}` with JSON content negotiation.
    /// Non-2xx responses, transport failures, and bodies without an executive
    /// list are all reported as a classified `FetchError`.
    pub async fn fetch_executives(&self, session: &str) -> Result<Vec<Executive>, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("session", session)])
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|err| {
            if err.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::UnexpectedShape
            }
        })?;

        parse_executives(body)
    }

    /// Check whether an image URL resolves.
    ///
    /// # Arguments
    /// * `url` - Image URL
    ///
    /// # Returns
    /// * `bool` - True if the image answered with a 2xx status
    ///
    /// # Details
    /// Uses HEAD, falling back to GET for servers that reject HEAD with 405.
    /// Blank or invalid URLs and transport errors count as failures.
    pub async fn probe_image(&self, url: &str) -> bool {
        if url.trim().is_empty() {
            return false;
        }

        match self.client.head(url).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => self
                .client
                .get(url)
                .send()
                .await
                .map(|response| response.status().is_success())
                .unwrap_or(false),
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
