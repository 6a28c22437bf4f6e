use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::commission::CommissionError;
use crate::domain::{Cents, CommissionRecord, CommissionSummary, Order, VendorEarning};
use crate::messages::CommissionRequest;

/// Client for the commission ledger.
#[derive(Clone)]
pub struct CommissionClient {
    sender: mpsc::Sender<CommissionRequest>,
}

impl CommissionClient {
    pub fn new(sender: mpsc::Sender<CommissionRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CommissionError> {
        debug!("Sending request");
        self.sender
            .send(CommissionRequest::Shutdown)
            .await
            .map_err(|_| CommissionError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CommissionClient => fn record(order: Order) -> CommissionRecord as CommissionRequest::Record, Error = CommissionError);
client_method!(CommissionClient => fn get_for_order(order_id: String) -> Option<CommissionRecord> as CommissionRequest::GetForOrder, Error = CommissionError);
client_method!(CommissionClient => fn earnings_for_vendor(vendor_id: String) -> Vec<VendorEarning> as CommissionRequest::EarningsForVendor, Error = CommissionError);
client_method!(CommissionClient => fn mark_vendor_paid(vendor_id: String) -> Cents as CommissionRequest::MarkVendorPaid, Error = CommissionError);
client_method!(CommissionClient => fn summary() -> CommissionSummary as CommissionRequest::Summary, Error = CommissionError);
client_method!(CommissionClient => fn all_earnings() -> Vec<VendorEarning> as CommissionRequest::AllEarnings, Error = CommissionError);
