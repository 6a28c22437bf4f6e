//! Combines moderation, image analysis, duplicate detection and description
//! generation into a single listing decision.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::heuristics::classify_text;
use super::{
    ContentModerator, DescriptionGenerator, DescriptionRequest, DuplicateMatch, GeneratedDescription,
    ImageAnalysis, ImageAnalyzer, ModerationDecision, ModerationVerdict,
};
use crate::clients::DuplicateClient;
use crate::domain::{listing_text, ProductCategory, ProductStatus, ProductSubmission};

#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub vendor_id: String,
    pub vendor_location: Option<String>,
    pub submission: ProductSubmission,
    /// Set when re-reviewing an existing product so it does not match itself.
    pub exclude_product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingReview {
    pub status: ProductStatus,
    pub notes: Vec<String>,
    pub moderation: ModerationVerdict,
    pub images: Vec<ImageAnalysis>,
    pub duplicate: Option<DuplicateMatch>,
    pub generated_description: Option<GeneratedDescription>,
    pub suggested_category: Option<ProductCategory>,
}

impl ListingReview {
    /// Description the product should be stored with.
    pub fn description_for(&self, submission: &ProductSubmission) -> String {
        match &self.generated_description {
            Some(generated) => generated.text.clone(),
            None => submission.description.trim().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ListingReviewer {
    moderator: Arc<ContentModerator>,
    images: Arc<ImageAnalyzer>,
    describer: Arc<DescriptionGenerator>,
    duplicates: DuplicateClient,
}

impl ListingReviewer {
    pub fn new(
        moderator: ContentModerator,
        images: ImageAnalyzer,
        describer: DescriptionGenerator,
        duplicates: DuplicateClient,
    ) -> Self {
        Self {
            moderator: Arc::new(moderator),
            images: Arc::new(images),
            describer: Arc::new(describer),
            duplicates,
        }
    }

    /// Reviewer that never calls an external provider.
    pub fn offline(duplicates: DuplicateClient) -> Self {
        Self::new(
            ContentModerator::heuristic_only(),
            ImageAnalyzer::heuristic_only(),
            DescriptionGenerator::template_only(),
            duplicates,
        )
    }

    #[instrument(skip_all, fields(vendor_id = %draft.vendor_id, product = %draft.submission.name))]
    pub async fn review(&self, draft: &ListingDraft) -> ListingReview {
        let submission = &draft.submission;

        let generated_description = if submission.description.trim().is_empty() {
            let request = DescriptionRequest {
                name: submission.name.clone(),
                category: submission.category,
                price_cents: submission.price_cents,
                location: draft.vendor_location.clone(),
            };
            Some(self.describer.generate(&request).await)
        } else {
            None
        };
        let description = generated_description
            .as_ref()
            .map_or(submission.description.as_str(), |generated| generated.text.as_str());
        let text = listing_text(&submission.name, description);

        let moderation = self.moderator.moderate(&text).await;
        let images = self.images.analyze_all(&submission.images, &text).await;

        let duplicate = match self.duplicates.check(text.clone(), draft.exclude_product_id.clone()).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%error, "Duplicate check unavailable, skipping");
                None
            }
        };

        let suggested_category = images
            .iter()
            .filter(|analysis| analysis.poultry_related)
            .find_map(|analysis| analysis.category)
            .or_else(|| classify_text(&text).map(|(category, _)| category))
            .filter(|category| *category != submission.category);

        let (status, notes) = decide(&draft.vendor_id, &moderation, &images, duplicate.as_ref());
        info!(?status, flags = moderation.flags.len(), "Listing reviewed");

        ListingReview {
            status,
            notes,
            moderation,
            images,
            duplicate,
            generated_description,
            suggested_category,
        }
    }
}

/// Maps the individual analyses to a product status and reviewer notes.
pub fn decide(
    vendor_id: &str,
    moderation: &ModerationVerdict,
    images: &[ImageAnalysis],
    duplicate: Option<&DuplicateMatch>,
) -> (ProductStatus, Vec<String>) {
    let mut notes: Vec<String> = moderation.flags.clone();
    let mut status = match moderation.decision {
        ModerationDecision::Approve => ProductStatus::Approved,
        ModerationDecision::Review => ProductStatus::Pending,
        ModerationDecision::Reject => ProductStatus::Rejected,
    };

    if let Some(found) = duplicate {
        if found.vendor_id == vendor_id {
            notes.push(format!(
                "duplicate of your listing {} ({:.0}% similar)",
                found.product_id, found.similarity
            ));
            status = ProductStatus::Rejected;
        } else {
            notes.push(format!(
                "similar to listing {} from another vendor ({:.0}% similar)",
                found.product_id, found.similarity
            ));
            if status == ProductStatus::Approved {
                status = ProductStatus::Pending;
            }
        }
    }

    for analysis in images.iter().filter(|analysis| !analysis.poultry_related) {
        notes.push(format!("image {} does not look poultry related", analysis.image_url));
        if status == ProductStatus::Approved {
            status = ProductStatus::Pending;
        }
    }

    (status, notes)
}
