//! Roboflow hosted detection adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::provider::read_success_body;
use super::{AiError, Detection, ImageDetector};

const PROVIDER: &str = "roboflow";
pub const DEFAULT_ROBOFLOW_BASE_URL: &str = "https://detect.roboflow.com";

#[derive(Debug, Clone, PartialEq)]
pub struct RoboflowConfig {
    pub api_key: String,
    pub base_url: String,
    /// `project/version`, e.g. `poultry-detection/2`.
    pub model: String,
}

#[derive(Deserialize)]
struct RoboflowResponse {
    #[serde(default)]
    predictions: Vec<RoboflowPrediction>,
}

#[derive(Deserialize)]
struct RoboflowPrediction {
    class: String,
    confidence: f32,
}

pub struct RoboflowDetector {
    client: Client,
    config: RoboflowConfig,
}

impl RoboflowDetector {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: RoboflowConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: Client::builder().timeout(timeout).build()?, config })
    }
}

#[async_trait]
impl ImageDetector for RoboflowDetector {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(name = "roboflow_detect", skip(self), fields(model = %self.config.model))]
    async fn detect(&self, image_url: &str) -> Result<Vec<Detection>, AiError> {
        let endpoint = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model.trim_matches('/')
        );
        let response = self
            .client
            .post(endpoint)
            .query(&[("api_key", self.config.api_key.as_str()), ("image", image_url)])
            .send()
            .await
            .map_err(|error| AiError::transport(PROVIDER, error))?;
        let body = read_success_body(PROVIDER, response).await?;
        parse_predictions(&body)
    }
}

fn parse_predictions(body: &[u8]) -> Result<Vec<Detection>, AiError> {
    let decoded: RoboflowResponse =
        serde_json::from_slice(body).map_err(|error| AiError::decode(PROVIDER, error.to_string()))?;
    Ok(decoded
        .predictions
        .into_iter()
        .map(|prediction| Detection::new(prediction.class, prediction.confidence))
        .collect())
}
