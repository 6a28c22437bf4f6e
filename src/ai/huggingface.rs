//! Hugging Face Inference API adapters (text generation and image
//! classification).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::provider::{fetch_image, read_success_body};
use super::{AiError, Detection, ImageDetector, TextGenerator};

const TEXT_PROVIDER: &str = "huggingface-text";
const IMAGE_PROVIDER: &str = "huggingface-image";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_TEXT_MODEL: &str = "gpt2";
pub const DEFAULT_HF_IMAGE_MODEL: &str = "google/vit-base-patch16-224";

#[derive(Debug, Clone, PartialEq)]
pub struct HuggingFaceConfig {
    pub token: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl HuggingFaceConfig {
    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), model)
    }
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Deserialize)]
struct ImageLabel {
    label: String,
    score: f32,
}

pub struct HuggingFaceText {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceText {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: HuggingFaceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: Client::builder().timeout(timeout).build()?, config })
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceText {
    fn name(&self) -> &'static str {
        TEXT_PROVIDER
    }

    #[instrument(name = "huggingface_complete", skip_all, fields(model = %self.config.text_model))]
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiError> {
        let body = json!({
            "inputs": format!("{system}\n\n{prompt}"),
            "parameters": { "max_new_tokens": 200, "return_full_text": false, "temperature": 0.7 },
            "options": { "wait_for_model": true },
        });
        let response = self
            .client
            .post(self.config.model_url(&self.config.text_model))
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await
            .map_err(|error| AiError::transport(TEXT_PROVIDER, error))?;
        let body = read_success_body(TEXT_PROVIDER, response).await?;
        parse_generated_text(&body)
    }
}

fn parse_generated_text(body: &[u8]) -> Result<String, AiError> {
    let decoded: Vec<GeneratedText> = serde_json::from_slice(body)
        .map_err(|error| AiError::decode(TEXT_PROVIDER, error.to_string()))?;
    decoded
        .into_iter()
        .map(|generated| generated.generated_text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or(AiError::EmptyResponse { provider: TEXT_PROVIDER })
}

pub struct HuggingFaceImage {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceImage {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: HuggingFaceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self { client: Client::builder().timeout(timeout).build()?, config })
    }
}

#[async_trait]
impl ImageDetector for HuggingFaceImage {
    fn name(&self) -> &'static str {
        IMAGE_PROVIDER
    }

    #[instrument(name = "huggingface_detect", skip(self), fields(model = %self.config.image_model))]
    async fn detect(&self, image_url: &str) -> Result<Vec<Detection>, AiError> {
        let image = fetch_image(IMAGE_PROVIDER, &self.client, image_url).await?;
        let response = self
            .client
            .post(self.config.model_url(&self.config.image_model))
            .bearer_auth(&self.config.token)
            .body(image)
            .send()
            .await
            .map_err(|error| AiError::transport(IMAGE_PROVIDER, error))?;
        let body = read_success_body(IMAGE_PROVIDER, response).await?;
        parse_image_labels(&body)
    }
}

fn parse_image_labels(body: &[u8]) -> Result<Vec<Detection>, AiError> {
    let decoded: Vec<ImageLabel> = serde_json::from_slice(body)
        .map_err(|error| AiError::decode(IMAGE_PROVIDER, error.to_string()))?;
    Ok(decoded
        .into_iter()
        .map(|label| Detection::new(label.label, label.score))
        .collect())
}
