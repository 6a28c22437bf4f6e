use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Order lifecycle. Delivered and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Mpesa,
    CashOnDelivery,
    Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub recipient: String,
    pub phone: String,
    pub address: String,
    pub town: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub vendor_id: String,
    pub product_name: String,
    pub unit_price_cents: Cents,
    pub quantity: u32,
    pub line_total_cents: Cents,
}

impl OrderItem {
    /// Priced line, or `None` when the line total does not fit in `Cents`.
    pub fn priced(
        product_id: impl Into<String>,
        vendor_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price_cents: Cents,
        quantity: u32,
    ) -> Option<Self> {
        let line_total_cents = unit_price_cents.checked_mul(Cents::from(quantity))?;
        Some(Self {
            product_id: product_id.into(),
            vendor_id: vendor_id.into(),
            product_name: product_name.into(),
            unit_price_cents,
            quantity,
            line_total_cents,
        })
    }

    /// Like [`OrderItem::priced`] but saturates the line total.
    pub fn new(
        product_id: impl Into<String>,
        vendor_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price_cents: Cents,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            vendor_id: vendor_id.into(),
            product_name: product_name.into(),
            unit_price_cents,
            quantity,
            line_total_cents: unit_price_cents.saturating_mul(Cents::from(quantity)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub changed_by: String,
    pub at: DateTime<Utc>,
}

/// Represents a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub total_cents: Cents,
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn involves_vendor(&self, vendor_id: &str) -> bool {
        self.items.iter().any(|item| item.vendor_id == vendor_id)
    }

    /// Sum of line totals grouped by vendor, in first-seen order.
    pub fn vendor_subtotals(&self) -> Vec<(String, Cents)> {
        let mut subtotals: Vec<(String, Cents)> = Vec::new();
        for item in &self.items {
            match subtotals.iter_mut().find(|(vendor, _)| *vendor == item.vendor_id) {
                Some((_, subtotal)) => *subtotal += item.line_total_cents,
                None => subtotals.push((item.vendor_id.clone(), item.line_total_cents)),
            }
        }
        subtotals
    }

    pub fn vendor_ids(&self) -> Vec<String> {
        self.vendor_subtotals().into_iter().map(|(vendor, _)| vendor).collect()
    }
}

pub fn items_total(items: &[OrderItem]) -> Cents {
    items.iter().fold(0, |total: Cents, item| total.saturating_add(item.line_total_cents))
}

/// Order total, or `None` on overflow.
pub fn checked_items_total(items: &[OrderItem]) -> Option<Cents> {
    items.iter().try_fold(0, |total: Cents, item| total.checked_add(item.line_total_cents))
}

/// A requested line before prices are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self { product_id: product_id.into(), quantity }
    }
}

/// What a buyer submits at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub buyer_id: String,
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
}

/// Payload for creating an order once lines are priced and stock reserved.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub buyer_id: String,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_machine() {
        use OrderStatus::*;
        let forward = [Pending, Confirmed, Processing, Shipped, Delivered];
        for pair in forward.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(!pair[1].can_transition_to(pair[0]));
        }
        assert!(Processing.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Shipped));
        for status in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(status));
            assert!(!Cancelled.can_transition_to(status));
        }
    }

    #[test]
    fn test_vendor_subtotals_group_lines() {
        let items = vec![
            OrderItem::new("p1", "v1", "Layers mash", 250_000, 2),
            OrderItem::new("p2", "v2", "Tray of eggs", 45_000, 3),
            OrderItem::new("p3", "v1", "Drinker", 80_000, 1),
        ];
        assert_eq!(items_total(&items), 500_000 + 135_000 + 80_000);
        assert_eq!(checked_items_total(&items), Some(715_000));
        let order = Order {
            id: "order_1".into(),
            buyer_id: "user_1".into(),
            items,
            shipping: ShippingInfo {
                recipient: "Achieng".into(),
                phone: "0712345678".into(),
                address: "Plot 4".into(),
                town: "Kisumu".into(),
                notes: None,
            },
            payment_method: PaymentMethod::Mpesa,
            status: OrderStatus::Pending,
            total_cents: 715_000,
            history: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(
            order.vendor_subtotals(),
            vec![("v1".to_string(), 580_000), ("v2".to_string(), 135_000)]
        );
        assert!(order.involves_vendor("v2"));
        assert!(!order.involves_vendor("v3"));
    }

    #[test]
    fn test_line_and_order_totals_refuse_overflow() {
        assert!(OrderItem::priced("p1", "v1", "Prize cock", u64::MAX / 2, 3).is_none());
        let item = OrderItem::priced("p1", "v1", "Prize cock", u64::MAX / 2, 2).unwrap();
        assert_eq!(item.line_total_cents, u64::MAX - 1);
        let small = OrderItem::new("p2", "v1", "Egg tray", 45_000, 1);
        assert_eq!(checked_items_total(&[item.clone(), small.clone()]), None);
        assert_eq!(items_total(&[item, small]), u64::MAX);
    }
}
