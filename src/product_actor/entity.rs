use chrono::Utc;

use super::actions::{ProductAction, ProductActionResult};
use crate::actor_framework::Entity;
use crate::domain::{validate_listing_fields, Product, ProductCreate, ProductPatch, ProductStatus};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: ProductCreate) -> Result<Self, String> {
        let submission = payload.submission;
        validate_listing_fields(&submission.name, submission.price_cents, &submission.images)?;
        let now = Utc::now();
        Ok(Self {
            id,
            vendor_id: payload.vendor_id,
            name: submission.name.trim().to_string(),
            category: submission.category,
            description: submission.description.trim().to_string(),
            price_cents: submission.price_cents,
            stock: submission.stock,
            images: submission.images,
            status: payload.status,
            moderation_notes: payload.moderation_notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a vendor edit. Content edits send the listing back to review.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        let name = patch.name.as_deref().unwrap_or(&self.name);
        let price = patch.price_cents.unwrap_or(self.price_cents);
        let images = patch.images.as_deref().unwrap_or(&self.images);
        validate_listing_fields(name, price, images)?;

        if patch.changes_content() {
            self.status = ProductStatus::Pending;
        }
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        self.price_cents = price;
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::ReserveStock(amount) => {
                if amount == 0 {
                    return Err("Quantity must be at least 1".to_string());
                }
                if self.status != ProductStatus::Approved {
                    return Err(format!("Product {} is not available for sale", self.id));
                }
                if self.stock < amount {
                    return Err(format!(
                        "Insufficient stock: {} available, {} requested",
                        self.stock, amount
                    ));
                }
                self.stock -= amount;
                Ok(ProductActionResult::Reserved { remaining: self.stock })
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                Ok(ProductActionResult::Released { stock: self.stock })
            }
            ProductAction::SetStatus { status, note } => {
                let from = self.status;
                self.status = status;
                if let Some(note) = note {
                    self.moderation_notes.push(note);
                }
                self.updated_at = Utc::now();
                Ok(ProductActionResult::StatusChanged { from, to: status })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductCategory, ProductSubmission};

    fn product(status: ProductStatus) -> Product {
        Product::from_create(
            "product_1".into(),
            ProductCreate {
                vendor_id: "vendor_1".into(),
                submission: ProductSubmission {
                    name: "Improved Kienyeji chicks".into(),
                    category: ProductCategory::Chicks,
                    description: "Vaccinated, 2 weeks old".into(),
                    price_cents: 15_000,
                    stock: 10,
                    images: vec![],
                },
                status,
                moderation_notes: vec![],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_reserve_requires_approval_and_stock() {
        let mut pending = product(ProductStatus::Pending);
        assert!(pending.handle_action(ProductAction::ReserveStock(1)).is_err());

        let mut approved = product(ProductStatus::Approved);
        assert_eq!(
            approved.handle_action(ProductAction::ReserveStock(4)).unwrap(),
            ProductActionResult::Reserved { remaining: 6 }
        );
        assert!(approved.handle_action(ProductAction::ReserveStock(7)).is_err());
        assert_eq!(
            approved.handle_action(ProductAction::ReleaseStock(4)).unwrap(),
            ProductActionResult::Released { stock: 10 }
        );
    }

    #[test]
    fn test_content_edit_resets_review() {
        let mut approved = product(ProductStatus::Approved);
        approved.on_update(ProductPatch { stock: Some(3), ..Default::default() }).unwrap();
        assert_eq!(approved.status, ProductStatus::Approved);

        approved
            .on_update(ProductPatch { description: Some("Now 3 weeks old".into()), ..Default::default() })
            .unwrap();
        assert_eq!(approved.status, ProductStatus::Pending);
    }

    #[test]
    fn test_invalid_patch_leaves_product_untouched() {
        let mut approved = product(ProductStatus::Approved);
        let err = approved
            .on_update(ProductPatch { price_cents: Some(0), name: Some("x".into()), ..Default::default() })
            .unwrap_err();
        assert!(err.contains("Price"));
        assert_eq!(approved.name, "Improved Kienyeji chicks");
        assert_eq!(approved.status, ProductStatus::Approved);
    }
}
