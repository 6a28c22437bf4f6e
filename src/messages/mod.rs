//! Typed request enums for the hand-written service actors (ledger, cache).
//! Each variant carries its parameters and a oneshot channel for the reply.

use tokio::sync::oneshot;

use crate::ai::{CacheError, DuplicateMatch, Fingerprint};
use crate::commission::CommissionError;
use crate::domain::{Cents, CommissionRecord, CommissionSummary, Order, VendorEarning};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

#[derive(Debug)]
pub enum CommissionRequest {
    Record {
        order: Order,
        respond_to: ServiceResponse<CommissionRecord, CommissionError>,
    },
    GetForOrder {
        order_id: String,
        respond_to: ServiceResponse<Option<CommissionRecord>, CommissionError>,
    },
    EarningsForVendor {
        vendor_id: String,
        respond_to: ServiceResponse<Vec<VendorEarning>, CommissionError>,
    },
    MarkVendorPaid {
        vendor_id: String,
        respond_to: ServiceResponse<Cents, CommissionError>,
    },
    Summary {
        respond_to: ServiceResponse<CommissionSummary, CommissionError>,
    },
    AllEarnings {
        respond_to: ServiceResponse<Vec<VendorEarning>, CommissionError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum DuplicateRequest {
    Check {
        text: String,
        exclude_product_id: Option<String>,
        respond_to: ServiceResponse<Option<DuplicateMatch>, CacheError>,
    },
    Record {
        fingerprint: Fingerprint,
        respond_to: ServiceResponse<(), CacheError>,
    },
    Remove {
        product_id: String,
        respond_to: ServiceResponse<bool, CacheError>,
    },
    Len {
        respond_to: ServiceResponse<usize, CacheError>,
    },
    Shutdown,
}
