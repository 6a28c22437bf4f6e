//! Ultralytics HUB inference adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::provider::{fetch_image, read_success_body};
use super::{AiError, Detection, ImageDetector};

const PROVIDER: &str = "ultralytics";

#[derive(Debug, Clone, PartialEq)]
pub struct UltralyticsConfig {
    pub api_key: String,
    /// Full prediction URL of the hosted model.
    pub model_url: String,
}

#[derive(Deserialize)]
struct UltralyticsResponse {
    #[serde(default)]
    images: Vec<UltralyticsImage>,
    #[serde(default)]
    data: Vec<UltralyticsResult>,
}

#[derive(Deserialize)]
struct UltralyticsImage {
    #[serde(default)]
    results: Vec<UltralyticsResult>,
}

#[derive(Deserialize)]
struct UltralyticsResult {
    name: String,
    confidence: f32,
}

pub struct UltralyticsDetector {
    client: Client,
    config: UltralyticsConfig,
}

impl UltralyticsDetector {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: UltralyticsConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: Client::builder().timeout(timeout).build()?, config })
    }
}

#[async_trait]
impl ImageDetector for UltralyticsDetector {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(name = "ultralytics_detect", skip(self))]
    async fn detect(&self, image_url: &str) -> Result<Vec<Detection>, AiError> {
        let image = fetch_image(PROVIDER, &self.client, image_url).await?;
        let form = Form::new()
            .part("file", Part::bytes(image).file_name("listing.jpg"))
            .text("imgsz", "640")
            .text("conf", "0.25");
        let response = self
            .client
            .post(&self.config.model_url)
            .header("x-api-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|error| AiError::transport(PROVIDER, error))?;
        let body = read_success_body(PROVIDER, response).await?;
        parse_results(&body)
    }
}

/// Newer responses nest results per image; older ones use a flat `data` list.
fn parse_results(body: &[u8]) -> Result<Vec<Detection>, AiError> {
    let decoded: UltralyticsResponse =
        serde_json::from_slice(body).map_err(|error| AiError::decode(PROVIDER, error.to_string()))?;
    Ok(decoded
        .images
        .into_iter()
        .flat_map(|image| image.results)
        .chain(decoded.data)
        .map(|result| Detection::new(result.name, result.confidence))
        .collect())
}
