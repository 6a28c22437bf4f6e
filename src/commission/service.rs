use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::CommissionError;
use crate::clients::CommissionClient;
use crate::domain::{
    split_order, Cents, CommissionRecord, CommissionStatus, CommissionSummary, EarningStatus,
    Order, OrderStatus, PlatformCommission, VendorEarning,
};
use crate::messages::{CommissionRequest, ServiceResponse};

/// Ledger actor. Owning the ledger in one task makes "check for an existing
/// record, then insert" a single step per order.
pub struct CommissionService {
    receiver: mpsc::Receiver<CommissionRequest>,
    rate_bps: u32,
    commissions: HashMap<String, PlatformCommission>,
    earnings: Vec<VendorEarning>,
    next_commission_id: u64,
    next_earning_id: u64,
}

impl CommissionService {
    pub fn new(buffer_size: usize, rate_bps: u32) -> (Self, CommissionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            rate_bps,
            commissions: HashMap::new(),
            earnings: Vec::new(),
            next_commission_id: 1,
            next_earning_id: 1,
        };
        (service, CommissionClient::new(sender))
    }

    #[instrument(name = "commission_service", skip(self), fields(rate_bps = self.rate_bps))]
    pub async fn run(mut self) {
        info!("CommissionService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CommissionRequest::Record { order, respond_to } => {
                    self.handle_record(order, respond_to);
                }
                CommissionRequest::GetForOrder { order_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.record_for(&order_id)));
                }
                CommissionRequest::EarningsForVendor { vendor_id, respond_to } => {
                    let earnings = self
                        .earnings
                        .iter()
                        .filter(|earning| earning.vendor_id == vendor_id)
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(earnings));
                }
                CommissionRequest::MarkVendorPaid { vendor_id, respond_to } => {
                    self.handle_mark_paid(vendor_id, respond_to);
                }
                CommissionRequest::Summary { respond_to } => {
                    let _ = respond_to.send(Ok(self.summary()));
                }
                CommissionRequest::AllEarnings { respond_to } => {
                    let _ = respond_to.send(Ok(self.earnings.clone()));
                }
                CommissionRequest::Shutdown => {
                    info!("CommissionService shutting down");
                    break;
                }
            }
        }
        info!("CommissionService stopped");
    }

    #[instrument(fields(order_id = %order.id, total = order.total_cents), skip(self, order, respond_to))]
    fn handle_record(&mut self, order: Order, respond_to: ServiceResponse<CommissionRecord, CommissionError>) {
        debug!("Processing record_commission request");

        if order.status != OrderStatus::Delivered {
            warn!(status = %order.status, "Refusing commission for undelivered order");
            let _ = respond_to.send(Err(CommissionError::NotDelivered {
                order_id: order.id,
                status: order.status,
            }));
            return;
        }
        if self.commissions.contains_key(&order.id) {
            warn!("Commission already recorded");
            let _ = respond_to.send(Err(CommissionError::AlreadyRecorded(order.id)));
            return;
        }

        let split = split_order(&order, self.rate_bps);
        let now = Utc::now();
        let commission = PlatformCommission {
            id: format!("commission_{}", self.next_commission_id),
            order_id: order.id.clone(),
            order_total_cents: split.order_total_cents,
            rate_bps: self.rate_bps,
            platform_cents: split.platform_cents,
            vendor_cents: split.vendor_cents,
            status: CommissionStatus::Collected,
            created_at: now,
        };
        self.next_commission_id += 1;

        let mut earnings = Vec::with_capacity(split.shares.len());
        for share in split.shares {
            earnings.push(VendorEarning {
                id: format!("earning_{}", self.next_earning_id),
                order_id: order.id.clone(),
                vendor_id: share.vendor_id,
                gross_cents: share.gross_cents,
                commission_cents: share.commission_cents,
                net_cents: share.net_cents,
                status: EarningStatus::Pending,
                created_at: now,
                paid_at: None,
            });
            self.next_earning_id += 1;
        }

        info!(
            platform_cents = commission.platform_cents,
            vendor_cents = commission.vendor_cents,
            vendors = earnings.len(),
            "Commission recorded"
        );
        self.commissions.insert(order.id.clone(), commission.clone());
        self.earnings.extend(earnings.iter().cloned());
        let _ = respond_to.send(Ok(CommissionRecord { commission, earnings }));
    }

    #[instrument(fields(vendor_id = %vendor_id), skip(self, respond_to))]
    fn handle_mark_paid(&mut self, vendor_id: String, respond_to: ServiceResponse<Cents, CommissionError>) {
        let now = Utc::now();
        let mut paid = 0;
        for earning in self
            .earnings
            .iter_mut()
            .filter(|earning| earning.vendor_id == vendor_id && earning.status == EarningStatus::Pending)
        {
            earning.status = EarningStatus::Paid;
            earning.paid_at = Some(now);
            paid += earning.net_cents;
        }
        info!(paid_cents = paid, "Vendor payout recorded");
        let _ = respond_to.send(Ok(paid));
    }

    fn record_for(&self, order_id: &str) -> Option<CommissionRecord> {
        self.commissions.get(order_id).map(|commission| CommissionRecord {
            commission: commission.clone(),
            earnings: self
                .earnings
                .iter()
                .filter(|earning| earning.order_id == order_id)
                .cloned()
                .collect(),
        })
    }

    fn summary(&self) -> CommissionSummary {
        let mut summary = CommissionSummary { orders: self.commissions.len(), ..Default::default() };
        for commission in self.commissions.values() {
            summary.gross_cents += commission.order_total_cents;
            summary.platform_cents += commission.platform_cents;
        }
        for earning in &self.earnings {
            match earning.status {
                EarningStatus::Pending => summary.vendor_pending_cents += earning.net_cents,
                EarningStatus::Paid => summary.vendor_paid_cents += earning.net_cents,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{items_total, OrderItem, PaymentMethod, ShippingInfo};

    fn delivered_order(id: &str, items: Vec<OrderItem>) -> Order {
        Order {
            id: id.into(),
            buyer_id: "user_1".into(),
            total_cents: items_total(&items),
            items,
            shipping: ShippingInfo {
                recipient: "Kamau".into(),
                phone: "0733000000".into(),
                address: "Thika Rd".into(),
                town: "Thika".into(),
                notes: None,
            },
            payment_method: PaymentMethod::Mpesa,
            status: OrderStatus::Delivered,
            history: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn start() -> CommissionClient {
        let (service, client) = CommissionService::new(10, 1_000);
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn test_commission_recorded_once_per_order() -> Result<(), Box<dyn std::error::Error>> {
        let client = start();
        let order = delivered_order("order_1", vec![OrderItem::new("p1", "v1", "Layer hens", 80_000, 10)]);

        let record = client.record(order.clone()).await?;
        assert_eq!(record.commission.platform_cents, 80_000);
        assert_eq!(record.commission.vendor_cents, 720_000);
        assert_eq!(record.earnings.len(), 1);

        let err = client.record(order).await.unwrap_err();
        assert_eq!(err, CommissionError::AlreadyRecorded("order_1".into()));

        let summary = client.summary().await?;
        assert_eq!(summary.orders, 1);
        assert_eq!(summary.platform_cents, 80_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_undelivered_order_is_refused() {
        let client = start();
        let mut order = delivered_order("order_2", vec![OrderItem::new("p1", "v1", "Feed", 1_000, 1)]);
        order.status = OrderStatus::Shipped;
        assert!(matches!(client.record(order).await, Err(CommissionError::NotDelivered { .. })));
        assert_eq!(client.get_for_order("order_2".into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_records_produce_one_entry() {
        let client = start();
        let order = delivered_order("order_3", vec![OrderItem::new("p1", "v1", "Eggs", 50_000, 2)]);

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                let order = order.clone();
                tokio::spawn(async move { client.record(order).await })
            })
            .collect();
        let mut successes = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(client.summary().await.unwrap().orders, 1);
    }

    #[tokio::test]
    async fn test_vendor_payout_moves_pending_to_paid() -> Result<(), Box<dyn std::error::Error>> {
        let client = start();
        client
            .record(delivered_order(
                "order_4",
                vec![OrderItem::new("p1", "v1", "Feeder", 10_000, 1), OrderItem::new("p2", "v2", "Drinker", 20_000, 1)],
            ))
            .await?;

        assert_eq!(client.mark_vendor_paid("v1".into()).await?, 9_000);
        assert_eq!(client.mark_vendor_paid("v1".into()).await?, 0);

        let summary = client.summary().await?;
        assert_eq!(summary.vendor_paid_cents, 9_000);
        assert_eq!(summary.vendor_pending_cents, 18_000);

        let v1 = client.earnings_for_vendor("v1".into()).await?;
        assert_eq!(v1[0].status, EarningStatus::Paid);
        Ok(())
    }
}
