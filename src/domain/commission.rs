use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{apply_rate, Cents, Order};

/// Default platform cut: 10%.
pub const DEFAULT_COMMISSION_BPS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    Pending,
    Collected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformCommission {
    pub id: String,
    pub order_id: String,
    pub order_total_cents: Cents,
    pub rate_bps: u32,
    pub platform_cents: Cents,
    pub vendor_cents: Cents,
    pub status: CommissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorEarning {
    pub id: String,
    pub order_id: String,
    pub vendor_id: String,
    pub gross_cents: Cents,
    pub commission_cents: Cents,
    pub net_cents: Cents,
    pub status: EarningStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// One vendor's share of an order before ids are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorShare {
    pub vendor_id: String,
    pub gross_cents: Cents,
    pub commission_cents: Cents,
    pub net_cents: Cents,
}

/// The split of an order total between platform and vendors.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionSplit {
    pub order_total_cents: Cents,
    pub platform_cents: Cents,
    pub vendor_cents: Cents,
    pub shares: Vec<VendorShare>,
}

/// Rounds each vendor's commission separately; the platform share is their sum
/// so the ledger always balances to the order total.
pub fn split_order(order: &Order, rate_bps: u32) -> CommissionSplit {
    let shares: Vec<VendorShare> = order
        .vendor_subtotals()
        .into_iter()
        .map(|(vendor_id, gross_cents)| {
            let commission_cents = apply_rate(gross_cents, rate_bps);
            VendorShare {
                vendor_id,
                gross_cents,
                commission_cents,
                net_cents: gross_cents - commission_cents,
            }
        })
        .collect();
    let platform_cents = shares.iter().map(|share| share.commission_cents).sum();
    CommissionSplit {
        order_total_cents: order.total_cents,
        platform_cents,
        vendor_cents: order.total_cents - platform_cents,
        shares,
    }
}

/// Ledger totals for dashboards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub orders: usize,
    pub gross_cents: Cents,
    pub platform_cents: Cents,
    pub vendor_pending_cents: Cents,
    pub vendor_paid_cents: Cents,
}

/// A recorded commission together with the vendor earnings it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecord {
    pub commission: PlatformCommission,
    pub earnings: Vec<VendorEarning>,
}
