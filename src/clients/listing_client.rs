use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::ai::{Fingerprint, ListingDraft, ListingReview, ListingReviewer};
use crate::clients::{DuplicateClient, NotificationClient, ProductClient, VendorClient};
use crate::domain::{
    validate_listing_fields, Caller, NotificationCreate, NotificationKind, Product,
    ProductCreate, ProductPatch, ProductStatus, ProductSubmission, VendorProfile, VendorStatus,
};
use crate::product_actor::ProductError;
use crate::vendor_actor::VendorError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListingError {
    #[error("Not permitted: {0}")]
    Forbidden(String),
    #[error("Vendor {0} is not approved to list products")]
    VendorNotApproved(String),
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Result of a submission or revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingOutcome {
    pub product_id: String,
    pub status: ProductStatus,
    pub review: ListingReview,
}

/// The AI-assisted gate every new listing passes through.
#[derive(Clone)]
pub struct ListingClient {
    products: ProductClient,
    vendors: VendorClient,
    notifications: NotificationClient,
    duplicates: DuplicateClient,
    reviewer: ListingReviewer,
}

impl ListingClient {
    pub fn new(
        products: ProductClient,
        vendors: VendorClient,
        notifications: NotificationClient,
        duplicates: DuplicateClient,
        reviewer: ListingReviewer,
    ) -> Self {
        Self { products, vendors, notifications, duplicates, reviewer }
    }

    async fn approved_vendor(&self, caller: &Caller) -> Result<VendorProfile, ListingError> {
        let vendor_id = caller
            .vendor_id()
            .ok_or_else(|| ListingError::Forbidden("Only vendors manage listings".to_string()))?;
        let vendor = self.vendors.require_vendor(vendor_id.to_string()).await?;
        if vendor.user_id != caller.user_id() {
            return Err(ListingError::Forbidden(format!("Vendor {vendor_id} belongs to another user")));
        }
        if vendor.status != VendorStatus::Approved {
            return Err(ListingError::VendorNotApproved(vendor.id));
        }
        Ok(vendor)
    }

    async fn remember(&self, product: &Product) {
        let fingerprint = Fingerprint::new(product.id.clone(), product.vendor_id.clone(), &product.listing_text());
        if let Err(error) = self.duplicates.record(fingerprint).await {
            warn!(%error, product_id = %product.id, "Fingerprint not recorded");
        }
    }

    async fn forget(&self, product_id: &str) {
        if let Err(error) = self.duplicates.remove(product_id.to_string()).await {
            warn!(%error, %product_id, "Fingerprint not removed");
        }
    }

    async fn tell_vendor(&self, vendor_id: &str, title: &str, message: String) {
        match self.vendors.get_vendor(vendor_id.to_string()).await {
            Ok(Some(vendor)) => {
                self.notifications
                    .notify_quietly(NotificationCreate::new(
                        vendor.user_id,
                        NotificationKind::ProductReview,
                        title,
                        message,
                    ))
                    .await;
            }
            Ok(None) => warn!(%vendor_id, "Vendor vanished before notification"),
            Err(error) => warn!(%error, %vendor_id, "Vendor lookup for notification failed"),
        }
    }

    /// Reviews and stores a new listing for the calling vendor.
    #[instrument(skip(self, submission), fields(product = %submission.name))]
    pub async fn submit(&self, caller: &Caller, submission: ProductSubmission) -> Result<ListingOutcome, ListingError> {
        let vendor = self.approved_vendor(caller).await?;
        validate_listing_fields(&submission.name, submission.price_cents, &submission.images)
            .map_err(ProductError::ValidationError)?;

        let draft = ListingDraft {
            vendor_id: vendor.id.clone(),
            vendor_location: Some(vendor.location.clone()),
            submission,
            exclude_product_id: None,
        };
        let review = self.reviewer.review(&draft).await;

        let mut submission = draft.submission;
        submission.description = review.description_for(&submission);
        let product_id = self
            .products
            .create_product(ProductCreate {
                vendor_id: vendor.id.clone(),
                submission,
                status: review.status,
                moderation_notes: review.notes.clone(),
            })
            .await?;
        let product = self.products.require_product(product_id.clone()).await?;
        if review.status != ProductStatus::Rejected {
            self.remember(&product).await;
        }
        info!(%product_id, status = ?review.status, "Listing submitted");

        let (title, message) = match review.status {
            ProductStatus::Approved => ("Listing approved", format!("{} is now live.", product.name)),
            ProductStatus::Pending => (
                "Listing under review",
                format!("{} is waiting for an admin: {}", product.name, review.notes.join("; ")),
            ),
            ProductStatus::Rejected => (
                "Listing rejected",
                format!("{} was rejected: {}", product.name, review.notes.join("; ")),
            ),
        };
        self.notifications
            .notify_quietly(NotificationCreate::new(
                vendor.user_id,
                NotificationKind::ProductReview,
                title,
                message,
            ))
            .await;

        Ok(ListingOutcome { product_id, status: review.status, review })
    }

    /// Applies an owner edit and re-runs the review when content changed.
    #[instrument(skip(self, patch))]
    pub async fn revise(
        &self,
        caller: &Caller,
        product_id: String,
        patch: ProductPatch,
    ) -> Result<Product, ListingError> {
        let vendor = self.approved_vendor(caller).await?;
        let rereview = patch.changes_content();
        let product = self.products.update_product(caller, product_id.clone(), patch).await?;
        if !rereview {
            return Ok(product);
        }

        let draft = ListingDraft {
            vendor_id: vendor.id,
            vendor_location: Some(vendor.location),
            submission: ProductSubmission {
                name: product.name.clone(),
                category: product.category,
                description: product.description.clone(),
                price_cents: product.price_cents,
                stock: product.stock,
                images: product.images.clone(),
            },
            exclude_product_id: Some(product_id.clone()),
        };
        let review = self.reviewer.review(&draft).await;
        if review.generated_description.is_some() {
            let description = review.description_for(&draft.submission);
            let fill = ProductPatch { description: Some(description), ..Default::default() };
            self.products.update_product(caller, product_id.clone(), fill).await?;
        }
        let note = (!review.notes.is_empty()).then(|| review.notes.join("; "));
        self.products.set_status(product_id.clone(), review.status, note).await?;
        let product = self.products.require_product(product_id).await?;
        match product.status {
            ProductStatus::Rejected => self.forget(&product.id).await,
            _ => self.remember(&product).await,
        }
        Ok(product)
    }

    /// Manual admin decision on a listing.
    #[instrument(skip(self))]
    pub async fn moderate(
        &self,
        caller: &Caller,
        product_id: String,
        approve: bool,
        note: Option<String>,
    ) -> Result<Product, ListingError> {
        if !caller.is_admin() {
            return Err(ListingError::Forbidden("Only admins moderate listings".to_string()));
        }
        let status = if approve { ProductStatus::Approved } else { ProductStatus::Rejected };
        self.products.set_status(product_id.clone(), status, note.clone()).await?;
        let product = self.products.require_product(product_id).await?;
        if approve {
            self.remember(&product).await;
        } else {
            self.forget(&product.id).await;
        }

        let (title, verdict) = if approve {
            ("Listing approved", "approved")
        } else {
            ("Listing rejected", "rejected")
        };
        let mut message = format!("{} was {verdict} by an admin.", product.name);
        if let Some(note) = note {
            message.push_str(&format!(" Note: {note}"));
        }
        self.tell_vendor(&product.vendor_id, title, message).await;
        Ok(product)
    }

    /// Deletes a listing. Allowed for its vendor and for admins.
    #[instrument(skip(self))]
    pub async fn remove(&self, caller: &Caller, product_id: String) -> Result<(), ListingError> {
        let product = self.products.require_product(product_id.clone()).await?;
        if !caller.is_admin() && caller.vendor_id() != Some(product.vendor_id.as_str()) {
            return Err(ListingError::Forbidden(format!("Product {product_id} belongs to another vendor")));
        }
        self.products.delete_product(product_id.clone()).await?;
        self.forget(&product_id).await;
        if caller.is_admin() {
            self.tell_vendor(
                &product.vendor_id,
                "Listing removed",
                format!("{} was removed by an admin.", product.name),
            )
            .await;
        }
        info!(%product_id, "Listing removed");
        Ok(())
    }
}

