use tracing::{debug, instrument};

use crate::actor_framework::{id_sequence, FrameworkError, ResourceClient};
use crate::domain::{Caller, Product, ProductCategory, ProductCreate, ProductPatch, ProductStatus};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}

fn newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| id_sequence(&b.id).cmp(&id_sequence(&a.id)));
}

impl ProductClient {
    /// Stores a reviewed listing. Callers go through `ListingClient::submit`.
    #[instrument(skip(self), fields(vendor_id = %payload.vendor_id, status = ?payload.status))]
    pub async fn create_product(&self, payload: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.create(payload).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn require_product(&self, id: String) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.fetch(id).await.map_err(ProductError::from)
    }

    /// A vendor's own catalogue, in every status. Admins may view any vendor.
    #[instrument(skip(self))]
    pub async fn products_for_vendor(&self, caller: &Caller, vendor_id: String) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        if !caller.is_admin() && caller.vendor_id() != Some(vendor_id.as_str()) {
            return Err(ProductError::Forbidden(format!("Cannot view products of vendor {vendor_id}")));
        }
        let mut products = self
            .inner
            .query(move |product| product.vendor_id == vendor_id)
            .await
            .map_err(ProductError::from)?;
        newest_first(&mut products);
        Ok(products)
    }

    /// The public catalogue: approved products, optionally filtered by
    /// category and a case-insensitive search over name and description.
    #[instrument(skip(self))]
    pub async fn browse(
        &self,
        category: Option<ProductCategory>,
        search: Option<String>,
    ) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
        let mut products = self
            .inner
            .query(move |product| {
                product.status == ProductStatus::Approved
                    && category.map_or(true, |category| product.category == category)
                    && needle.as_ref().map_or(true, |needle| {
                        product.name.to_lowercase().contains(needle)
                            || product.description.to_lowercase().contains(needle)
                    })
            })
            .await
            .map_err(ProductError::from)?;
        newest_first(&mut products);
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await {
            Ok(ProductActionResult::StockLevel(level)) => Ok(level),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(e.into()),
        }
    }

    /// Takes `quantity` units out of stock. Returns the remaining stock.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        if quantity == 0 {
            return Err(ProductError::InvalidQuantity(quantity));
        }
        match self.inner.perform_action(id.clone(), ProductAction::ReserveStock(quantity)).await {
            Ok(ProductActionResult::Reserved { remaining }) => Ok(remaining),
            Ok(other) => Err(unexpected(other)),
            Err(FrameworkError::Rejected(reason)) => {
                // the actor refused; look again to report why
                let product = self.require_product(id).await?;
                if product.status != ProductStatus::Approved {
                    Err(ProductError::Unavailable(product.id))
                } else if product.stock < quantity {
                    Err(ProductError::InsufficientStock { requested: quantity, available: product.stock })
                } else {
                    Err(ProductError::ValidationError(reason))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns units to stock. Returns the new stock level.
    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await {
            Ok(ProductActionResult::Released { stock }) => Ok(stock),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(e.into()),
        }
    }

    /// Records a review outcome. Returns the previous status.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: String,
        status: ProductStatus,
        note: Option<String>,
    ) -> Result<ProductStatus, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::SetStatus { status, note }).await {
            Ok(ProductActionResult::StatusChanged { from, .. }) => Ok(from),
            Ok(other) => Err(unexpected(other)),
            Err(e) => Err(e.into()),
        }
    }

    /// Owner-only edit. Editing name, description or images sends the
    /// listing back to Pending.
    #[instrument(skip(self, patch))]
    pub async fn update_product(
        &self,
        caller: &Caller,
        id: String,
        patch: ProductPatch,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        let product = self.require_product(id.clone()).await?;
        if caller.vendor_id() != Some(product.vendor_id.as_str()) {
            return Err(ProductError::Forbidden(format!("Product {id} belongs to another vendor")));
        }
        self.inner.update(id, patch).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: String) -> Result<(), ProductError> {
        debug!("Sending request");
        self.inner.delete(id).await.map_err(ProductError::from)
    }
}
