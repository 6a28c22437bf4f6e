use crate::domain::ProductStatus;

/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Reserves stock for an order. Fails unless the product is approved and
    /// enough units remain.
    ReserveStock(u32),
    /// Returns previously reserved units.
    ReleaseStock(u32),
    /// Records a review outcome.
    SetStatus {
        status: ProductStatus,
        note: Option<String>,
    },
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
    Reserved { remaining: u32 },
    Released { stock: u32 },
    StatusChanged { from: ProductStatus, to: ProductStatus },
}
