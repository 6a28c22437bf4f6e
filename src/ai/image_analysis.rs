use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::heuristics::{category_for_label, classify_text, image_name_hint, is_poultry_label};
use super::{AnalysisSource, Detection, ImageDetector};
use crate::domain::ProductCategory;

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub image_url: String,
    pub labels: Vec<Detection>,
    pub category: Option<ProductCategory>,
    pub poultry_related: bool,
    pub confidence: f32,
    pub source: AnalysisSource,
}

/// Runs detectors in order; the first confident answer wins.
pub struct ImageAnalyzer {
    detectors: Vec<Arc<dyn ImageDetector>>,
    min_confidence: f32,
}

impl ImageAnalyzer {
    pub fn new(detectors: Vec<Arc<dyn ImageDetector>>) -> Self {
        Self { detectors, min_confidence: DEFAULT_MIN_CONFIDENCE }
    }

    pub fn heuristic_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// `context` is the listing text, used when no detector answers.
    #[instrument(skip(self, context))]
    pub async fn analyze(&self, image_url: &str, context: &str) -> ImageAnalysis {
        for detector in &self.detectors {
            match detector.detect(image_url).await {
                Ok(detections) => {
                    let mut labels: Vec<Detection> = detections
                        .into_iter()
                        .filter(|d| d.confidence >= self.min_confidence)
                        .collect();
                    if labels.is_empty() {
                        debug!(provider = detector.name(), "No confident detections");
                        continue;
                    }
                    labels.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
                    return ImageAnalysis {
                        image_url: image_url.to_string(),
                        poultry_related: labels.iter().any(|d| is_poultry_label(&d.label)),
                        category: labels.iter().find_map(|d| category_for_label(&d.label)),
                        confidence: labels[0].confidence,
                        labels,
                        source: AnalysisSource::Provider(detector.name().to_string()),
                    };
                }
                Err(error) => warn!(provider = detector.name(), %error, "Image detector failed"),
            }
        }
        heuristic_analysis(image_url, context)
    }

    pub async fn analyze_all(&self, image_urls: &[String], context: &str) -> Vec<ImageAnalysis> {
        let mut analyses = Vec::with_capacity(image_urls.len());
        for url in image_urls {
            analyses.push(self.analyze(url, context).await);
        }
        analyses
    }
}

/// File name first, then the listing text. Without any signal the image is
/// given the benefit of the doubt only if the listing itself is poultry.
fn heuristic_analysis(image_url: &str, context: &str) -> ImageAnalysis {
    let hint = image_name_hint(image_url);
    let (category, poultry_related, confidence) = match classify_text(&hint) {
        Some((category, score)) => (Some(category), true, 0.4 * score),
        None => match classify_text(context) {
            Some((category, _)) => (Some(category), true, 0.2),
            None => (None, false, 0.0),
        },
    };
    ImageAnalysis {
        image_url: image_url.to_string(),
        labels: Vec::new(),
        category,
        poultry_related,
        confidence,
        source: AnalysisSource::Heuristic,
    }
}
