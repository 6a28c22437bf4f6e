use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Maximum number of image URLs per listing.
pub const MAX_PRODUCT_IMAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    LiveBirds,
    Chicks,
    Eggs,
    Meat,
    Feed,
    Equipment,
    Health,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 8] = [
        Self::LiveBirds,
        Self::Chicks,
        Self::Eggs,
        Self::Meat,
        Self::Feed,
        Self::Equipment,
        Self::Health,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::LiveBirds => "live birds",
            Self::Chicks => "chicks",
            Self::Eggs => "eggs",
            Self::Meat => "poultry meat",
            Self::Feed => "poultry feed",
            Self::Equipment => "poultry equipment",
            Self::Health => "poultry health products",
            Self::Other => "poultry products",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Pending,
    Approved,
    Rejected,
}

/// Represents a product listing in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub price_cents: Cents,
    pub stock: u32,
    pub images: Vec<String>,
    pub status: ProductStatus,
    pub moderation_notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Text used for moderation and duplicate detection.
    pub fn listing_text(&self) -> String {
        listing_text(&self.name, &self.description)
    }
}

pub fn listing_text(name: &str, description: &str) -> String {
    format!("{} {}", name.trim(), description.trim()).trim().to_string()
}

/// What a vendor submits for a new listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    pub price_cents: Cents,
    pub stock: u32,
    pub images: Vec<String>,
}

/// Payload for creating a product once the listing review has run.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub vendor_id: String,
    pub submission: ProductSubmission,
    pub status: ProductStatus,
    pub moderation_notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProductCategory>,
    pub price_cents: Option<Cents>,
    pub stock: Option<u32>,
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// Whether the patch touches content that must be reviewed again.
    pub fn changes_content(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.images.is_some()
    }
}

pub fn validate_listing_fields(
    name: &str,
    price_cents: Cents,
    images: &[String],
) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Product name required".to_string());
    }
    if price_cents == 0 {
        return Err("Price must be greater than zero".to_string());
    }
    if images.len() > MAX_PRODUCT_IMAGES {
        return Err(format!("At most {MAX_PRODUCT_IMAGES} images allowed, got {}", images.len()));
    }
    Ok(())
}
