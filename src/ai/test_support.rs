//! Canned providers for tests.

use async_trait::async_trait;

use super::{AiError, Detection, ImageDetector, TextGenerator};

pub struct FixedText {
    name: &'static str,
    reply: String,
}

impl FixedText {
    pub fn new(name: &'static str, reply: &str) -> Self {
        Self { name, reply: reply.to_string() }
    }
}

#[async_trait]
impl TextGenerator for FixedText {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, AiError> {
        Ok(self.reply.clone())
    }
}

pub struct FailingText {
    name: &'static str,
}

impl FailingText {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl TextGenerator for FailingText {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Status { provider: self.name, status: 503, body: "unavailable".into() })
    }
}

pub struct FixedDetector {
    name: &'static str,
    detections: Vec<Detection>,
}

impl FixedDetector {
    pub fn new(name: &'static str, detections: Vec<Detection>) -> Self {
        Self { name, detections }
    }
}

#[async_trait]
impl ImageDetector for FixedDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn detect(&self, _image_url: &str) -> Result<Vec<Detection>, AiError> {
        Ok(self.detections.clone())
    }
}

pub struct FailingDetector {
    name: &'static str,
}

impl FailingDetector {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl ImageDetector for FailingDetector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn detect(&self, _image_url: &str) -> Result<Vec<Detection>, AiError> {
        Err(AiError::EmptyResponse { provider: self.name })
    }
}
