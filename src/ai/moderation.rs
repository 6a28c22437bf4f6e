use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::heuristics::{scan_content, ContentFinding};
use super::{AiError, TextGenerator};

/// Where an analysis result came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum AnalysisSource {
    Provider(String),
    Heuristic,
    Template,
}

/// Ordered from most to least permissive so `max` picks the stricter one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Review,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub decision: ModerationDecision,
    pub flags: Vec<String>,
    /// 0.0 (clean) to 1.0 (certain violation).
    pub risk_score: f32,
    pub source: AnalysisSource,
}

const MODERATION_SYSTEM_PROMPT: &str = "You moderate listings on a Kenyan poultry marketplace. \
Only poultry, eggs, poultry meat, feed, equipment and veterinary products are allowed. \
Contact details, external links, abusive language, and illegal or unsafe products are not. \
Answer with JSON only: {\"decision\":\"approve|review|reject\",\"reasons\":[\"...\"]}";

#[derive(Deserialize)]
struct LlmVerdict {
    decision: String,
    #[serde(default)]
    reasons: Vec<String>,
}

fn describe(finding: &ContentFinding) -> String {
    match finding {
        ContentFinding::Prohibited(term) => format!("prohibited item: {term}"),
        ContentFinding::Profanity(term) => format!("abusive language: {term}"),
        ContentFinding::PhoneNumber => "contains a phone number".to_string(),
        ContentFinding::ExternalLink => "contains an external link".to_string(),
        ContentFinding::EmailAddress => "contains an email address".to_string(),
        ContentFinding::Shouting => "mostly upper-case text".to_string(),
        ContentFinding::ExcessivePunctuation => "excessive punctuation".to_string(),
        ContentFinding::TooShort => "description too short".to_string(),
        ContentFinding::OffTopic => "does not look poultry related".to_string(),
    }
}

/// Verdict from the keyword and pattern rules alone.
pub fn heuristic_verdict(text: &str) -> ModerationVerdict {
    let findings = scan_content(text);
    let decision = if findings.iter().any(|f| matches!(f, ContentFinding::Prohibited(_))) {
        ModerationDecision::Reject
    } else if findings.is_empty() {
        ModerationDecision::Approve
    } else {
        ModerationDecision::Review
    };
    let risk_score = match decision {
        ModerationDecision::Reject => 1.0,
        _ => (findings.len() as f32 * 0.2).min(0.9),
    };
    ModerationVerdict {
        decision,
        flags: findings.iter().map(describe).collect(),
        risk_score,
        source: AnalysisSource::Heuristic,
    }
}

/// Extracts the JSON object from a model reply that may wrap it in prose or
/// code fences.
fn parse_llm_verdict(provider: &'static str, reply: &str) -> Result<(ModerationDecision, Vec<String>), AiError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(AiError::decode(provider, "no JSON object in moderation reply")),
    };
    let verdict: LlmVerdict =
        serde_json::from_str(json).map_err(|error| AiError::decode(provider, error.to_string()))?;
    let decision = match verdict.decision.trim().to_lowercase().as_str() {
        "approve" | "approved" | "allow" => ModerationDecision::Approve,
        "review" | "flag" | "flagged" => ModerationDecision::Review,
        "reject" | "rejected" | "deny" => ModerationDecision::Reject,
        other => return Err(AiError::decode(provider, format!("unknown decision {other:?}"))),
    };
    Ok((decision, verdict.reasons))
}

/// Content moderation gate: heuristics first, then the first LLM that answers.
pub struct ContentModerator {
    classifiers: Vec<Arc<dyn TextGenerator>>,
}

impl ContentModerator {
    pub fn new(classifiers: Vec<Arc<dyn TextGenerator>>) -> Self {
        Self { classifiers }
    }

    pub fn heuristic_only() -> Self {
        Self::new(Vec::new())
    }

    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn moderate(&self, text: &str) -> ModerationVerdict {
        let heuristic = heuristic_verdict(text);
        if heuristic.decision == ModerationDecision::Reject {
            info!(flags = ?heuristic.flags, "Rejected by heuristics");
            return heuristic;
        }

        let prompt = format!("Listing:\n{text}");
        for classifier in &self.classifiers {
            let outcome = classifier
                .complete(MODERATION_SYSTEM_PROMPT, &prompt)
                .await
                .and_then(|reply| parse_llm_verdict(classifier.name(), &reply));
            match outcome {
                Ok((decision, reasons)) => {
                    debug!(provider = classifier.name(), ?decision, "Moderation reply parsed");
                    let mut flags = heuristic.flags.clone();
                    flags.extend(reasons.into_iter().filter(|r| !r.trim().is_empty()));
                    let decision = decision.max(heuristic.decision);
                    let risk_score = match decision {
                        ModerationDecision::Reject => 1.0,
                        ModerationDecision::Review => heuristic.risk_score.max(0.5),
                        ModerationDecision::Approve => heuristic.risk_score,
                    };
                    return ModerationVerdict {
                        decision,
                        flags,
                        risk_score,
                        source: AnalysisSource::Provider(classifier.name().to_string()),
                    };
                }
                Err(error) => warn!(provider = classifier.name(), %error, "Moderation provider failed"),
            }
        }
        heuristic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_support::{FailingText, FixedText};

    #[test]
    fn test_parse_llm_verdict_handles_fenced_json() {
        let reply = "```json\n{\"decision\": \"Reject\", \"reasons\": [\"sells steroids\"]}\n```";
        let (decision, reasons) = parse_llm_verdict("test", reply).unwrap();
        assert_eq!(decision, ModerationDecision::Reject);
        assert_eq!(reasons, vec!["sells steroids".to_string()]);

        assert!(parse_llm_verdict("test", "looks fine to me").is_err());
        assert!(parse_llm_verdict("test", r#"{"decision":"maybe"}"#).is_err());
    }

    #[tokio::test]
    async fn test_prohibited_items_skip_the_llm() {
        let moderator = ContentModerator::new(vec![Arc::new(FixedText::new("llm", r#"{"decision":"approve"}"#))]);
        let verdict = moderator.moderate("Counterfeit Newcastle vaccine, cheap").await;
        assert_eq!(verdict.decision, ModerationDecision::Reject);
        assert_eq!(verdict.source, AnalysisSource::Heuristic);
    }

    #[tokio::test]
    async fn test_stricter_verdict_wins() {
        let moderator = ContentModerator::new(vec![Arc::new(FixedText::new("llm", r#"{"decision":"approve"}"#))]);
        let verdict = moderator.moderate("Kienyeji hens, call 0712345678").await;
        assert_eq!(verdict.decision, ModerationDecision::Review);
        assert_eq!(verdict.source, AnalysisSource::Provider("llm".into()));

        let moderator = ContentModerator::new(vec![Arc::new(FixedText::new(
            "llm",
            r#"{"decision":"reject","reasons":["misleading health claims"]}"#,
        ))]);
        let verdict = moderator.moderate("Layers that never get sick, guaranteed").await;
        assert_eq!(verdict.decision, ModerationDecision::Reject);
        assert!(verdict.flags.contains(&"misleading health claims".to_string()));
    }

    #[tokio::test]
    async fn test_failing_providers_fall_through_to_heuristics() {
        let moderator = ContentModerator::new(vec![
            Arc::new(FailingText::new("primary")),
            Arc::new(FixedText::new("secondary", "I cannot help with that")),
        ]);
        let verdict = moderator.moderate("Fresh farm eggs, 30 per tray").await;
        assert_eq!(verdict.decision, ModerationDecision::Approve);
        assert_eq!(verdict.source, AnalysisSource::Heuristic);
    }
}
