//! Provider selection. A provider is only built when its credentials are set.

use std::sync::Arc;
use std::time::Duration;

use super::huggingface::{HuggingFaceConfig, HuggingFaceImage, HuggingFaceText};
use super::openai::{OpenAiChat, OpenAiConfig};
use super::roboflow::{RoboflowConfig, RoboflowDetector};
use super::ultralytics::{UltralyticsConfig, UltralyticsDetector};
use super::{ImageDetector, TextGenerator};

pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub request_timeout: Duration,
    pub openai: Option<OpenAiConfig>,
    pub huggingface: Option<HuggingFaceConfig>,
    pub roboflow: Option<RoboflowConfig>,
    pub ultralytics: Option<UltralyticsConfig>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_AI_TIMEOUT,
            openai: None,
            huggingface: None,
            roboflow: None,
            ultralytics: None,
        }
    }
}

impl AiConfig {
    /// Text chain: OpenAI, then Hugging Face.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be constructed.
    pub fn text_generators(&self) -> Result<Vec<Arc<dyn TextGenerator>>, reqwest::Error> {
        let mut chain: Vec<Arc<dyn TextGenerator>> = Vec::new();
        if let Some(openai) = &self.openai {
            chain.push(Arc::new(OpenAiChat::new(openai.clone(), self.request_timeout)?));
        }
        if let Some(huggingface) = &self.huggingface {
            chain.push(Arc::new(HuggingFaceText::new(huggingface.clone(), self.request_timeout)?));
        }
        Ok(chain)
    }

    /// Image chain: Roboflow, then Ultralytics HUB, then Hugging Face.
    ///
    /// # Errors
    ///
    /// Returns an error when an HTTP client cannot be constructed.
    pub fn image_detectors(&self) -> Result<Vec<Arc<dyn ImageDetector>>, reqwest::Error> {
        let mut chain: Vec<Arc<dyn ImageDetector>> = Vec::new();
        if let Some(roboflow) = &self.roboflow {
            chain.push(Arc::new(RoboflowDetector::new(roboflow.clone(), self.request_timeout)?));
        }
        if let Some(ultralytics) = &self.ultralytics {
            chain.push(Arc::new(UltralyticsDetector::new(ultralytics.clone(), self.request_timeout)?));
        }
        if let Some(huggingface) = &self.huggingface {
            chain.push(Arc::new(HuggingFaceImage::new(huggingface.clone(), self.request_timeout)?));
        }
        Ok(chain)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.openai.is_some() {
            names.push("openai");
        }
        if self.huggingface.is_some() {
            names.push("huggingface");
        }
        if self.roboflow.is_some() {
            names.push("roboflow");
        }
        if self.ultralytics.is_some() {
            names.push("ultralytics");
        }
        names
    }
}
