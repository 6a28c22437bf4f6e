use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::heuristics::template_description;
use super::{AnalysisSource, TextGenerator};
use crate::domain::{format_kes, Cents, ProductCategory};

pub const MAX_DESCRIPTION_CHARS: usize = 600;
const MIN_DESCRIPTION_CHARS: usize = 20;

const DESCRIPTION_SYSTEM_PROMPT: &str = "You write short, honest product descriptions for a Kenyan \
poultry marketplace. Two to four sentences, plain text, no contact details, no prices, no links.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionRequest {
    pub name: String,
    pub category: ProductCategory,
    pub price_cents: Cents,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDescription {
    pub text: String,
    pub source: AnalysisSource,
}

/// Tidies model output: trims, drops wrapping quotes and a leading label,
/// collapses whitespace and cuts at a sentence boundary within `max_chars`.
pub fn clean_generated(raw: &str, max_chars: usize) -> String {
    let mut text = raw.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`').trim();
    for prefix in ["Description:", "description:", "Product description:"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim();
        }
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars).collect();
    match truncated.rfind(". ") {
        Some(end) if end > max_chars / 2 => truncated[..=end].to_string(),
        _ => format!("{}...", truncated.trim_end()),
    }
}

/// Generates listing descriptions; always returns text.
pub struct DescriptionGenerator {
    generators: Vec<Arc<dyn TextGenerator>>,
}

impl DescriptionGenerator {
    pub fn new(generators: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { generators }
    }

    pub fn template_only() -> Self {
        Self::new(Vec::new())
    }

    #[instrument(skip_all, fields(product = %request.name))]
    pub async fn generate(&self, request: &DescriptionRequest) -> GeneratedDescription {
        let prompt = format!(
            "Product: {}\nCategory: {}\nPrice: {}\nLocation: {}",
            request.name,
            request.category.label(),
            format_kes(request.price_cents),
            request.location.as_deref().unwrap_or("Kenya"),
        );
        for generator in &self.generators {
            match generator.complete(DESCRIPTION_SYSTEM_PROMPT, &prompt).await {
                Ok(raw) => {
                    let text = clean_generated(&raw, MAX_DESCRIPTION_CHARS);
                    if text.chars().count() >= MIN_DESCRIPTION_CHARS {
                        return GeneratedDescription {
                            text,
                            source: AnalysisSource::Provider(generator.name().to_string()),
                        };
                    }
                    warn!(provider = generator.name(), "Generated description too short");
                }
                Err(error) => warn!(provider = generator.name(), %error, "Description provider failed"),
            }
        }
        GeneratedDescription {
            text: template_description(&request.name, request.category, request.location.as_deref()),
            source: AnalysisSource::Template,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_support::{FailingText, FixedText};

    fn request() -> DescriptionRequest {
        DescriptionRequest {
            name: "Kuroiler pullets".into(),
            category: ProductCategory::LiveBirds,
            price_cents: 85_000,
            location: Some("Eldoret".into()),
        }
    }

    #[test]
    fn test_clean_generated() {
        assert_eq!(clean_generated("  \"Description:  Hardy   birds.\" ", 600), "Hardy birds.");
        let long = "One sentence here. ".repeat(10);
        let cleaned = clean_generated(&long, 60);
        assert!(cleaned.ends_with('.'));
        assert!(cleaned.chars().count() <= 60);
    }

    #[tokio::test]
    async fn test_second_provider_used_after_failure() {
        let generator = DescriptionGenerator::new(vec![
            Arc::new(FailingText::new("openai")),
            Arc::new(FixedText::new("huggingface-text", "Hardy kuroiler pullets, vaccinated and ready to lay.")),
        ]);
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, AnalysisSource::Provider("huggingface-text".into()));
        assert!(generated.text.starts_with("Hardy kuroiler"));
    }

    #[tokio::test]
    async fn test_template_when_output_unusable() {
        let generator = DescriptionGenerator::new(vec![Arc::new(FixedText::new("openai", "ok"))]);
        let generated = generator.generate(&request()).await;
        assert_eq!(generated.source, AnalysisSource::Template);
        assert!(generated.text.contains("Eldoret"));
    }
}
