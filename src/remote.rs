//! HTTP client for the remote image-generation service.
//!
//! The service takes the [`IconSpec`] as JSON and answers with either
//! `{"imageUrl": "..."}` or `{"error": "..."}`. The image URL is a base64
//! `data:` URL or an `http(s)` URL that is fetched with the same client.
//!
//! # Feature Flag
//!
//! This module is only available with the `remote` feature enabled.

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::generator::{IconGenerator, classify_status};
use crate::icon::{IconSpec, RasterImage, WORKING_SIZE};

// ============================================================================
// Configuration
// ============================================================================

/// Where and how to reach the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Endpoint receiving the POST.
    pub endpoint: String,

    /// Sent as `Authorization: Bearer ...` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Wire Format
// ============================================================================

/// Body returned by the service, on success and on failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Turns a status and body into the image URL or a classified error.
pub fn interpret_response(status: u16, body: &str) -> Result<String, GenerationError> {
    let parsed: Option<GenerateResponse> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.error.clone())
        .unwrap_or_else(|| body.trim().to_string());

    if !(200..300).contains(&status) {
        return Err(classify_status(status, message));
    }

    let Some(response) = parsed else {
        return Err(GenerationError::RemoteGenerationFailed(
            "response is not JSON".to_string(),
        ));
    };
    if let Some(error) = response.error {
        return Err(GenerationError::RemoteGenerationFailed(error));
    }
    response.image_url.ok_or_else(|| {
        GenerationError::RemoteGenerationFailed("response has no imageUrl".to_string())
    })
}

// ============================================================================
// RemoteGenerator
// ============================================================================

/// [`IconGenerator`] backed by the HTTP service.
pub struct RemoteGenerator {
    client: Client,
    config: RemoteConfig,
}

impl RemoteGenerator {
    pub fn new(config: RemoteConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(failed)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn request_image_url(&self, spec: &IconSpec) -> Result<String, GenerationError> {
        let mut request = self.client.post(&self.config.endpoint).json(spec);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.map_err(failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(failed)?;
        debug!("generation service answered {status}");
        interpret_response(status, &body)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self.client.get(url).send().await.map_err(failed)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::RemoteGenerationFailed(format!(
                "fetching image failed with HTTP {}",
                status.as_u16()
            )));
        }
        let bytes = response.bytes().await.map_err(failed)?;
        Ok(bytes.to_vec())
    }
}

impl IconGenerator for RemoteGenerator {
    async fn generate(&self, spec: &IconSpec) -> Result<RasterImage, GenerationError> {
        let url = self.request_image_url(spec).await?;
        let raster = if url.starts_with("data:") {
            RasterImage::from_data_url(&url, WORKING_SIZE)
        } else if url.starts_with("http://") || url.starts_with("https://") {
            let bytes = self.fetch_image(&url).await?;
            RasterImage::decode(&bytes, WORKING_SIZE)
        } else {
            return Err(GenerationError::RemoteGenerationFailed(format!(
                "unsupported image URL scheme in {:.32}",
                url
            )));
        };
        raster.map_err(failed)
    }
}

fn failed(err: impl std::fmt::Display) -> GenerationError {
    GenerationError::RemoteGenerationFailed(err.to_string())
}
