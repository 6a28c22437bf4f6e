//! Provider seams. Adapters own transport details; the analysis services only
//! see these traits, which lets tests substitute canned providers.

use async_trait::async_trait;
use reqwest::Response;
use serde::{Deserialize, Serialize};

use super::AiError;

/// A label produced by an image model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self { label: label.into(), confidence }
    }
}

/// Text completion (LLM) provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError>;
}

/// Image classification / object detection provider.
#[async_trait]
pub trait ImageDetector: Send + Sync {
    fn name(&self) -> &'static str;

    async fn detect(&self, image_url: &str) -> Result<Vec<Detection>, AiError>;
}

/// Reads the body and maps non-2xx statuses to `AiError::Status`.
pub(crate) async fn read_success_body(
    provider: &'static str,
    response: Response,
) -> Result<Vec<u8>, AiError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|error| AiError::transport(provider, error))?;
    if !status.is_success() {
        return Err(AiError::status(provider, status.as_u16(), body.as_ref()));
    }
    Ok(body.to_vec())
}

/// Downloads an image so it can be forwarded to providers that take raw bytes.
pub(crate) async fn fetch_image(
    provider: &'static str,
    client: &reqwest::Client,
    image_url: &str,
) -> Result<Vec<u8>, AiError> {
    let response = client
        .get(image_url)
        .send()
        .await
        .map_err(|error| AiError::transport(provider, error))?;
    read_success_body(provider, response).await
}
