use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::clients::{CommissionClient, OrderClient, ProductClient, UserClient, VendorClient};
use crate::commission::CommissionError;
use crate::domain::{Caller, Cents, EarningStatus, Order, OrderItem, OrderStatus, Product};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use crate::vendor_actor::VendorError;

/// Products with fewer units than this are reported as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;
const TOP_N: usize = 5;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("Not permitted: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Users(#[from] UserError),
    #[error(transparent)]
    Vendors(#[from] VendorError),
    #[error(transparent)]
    Products(#[from] ProductError),
    #[error(transparent)]
    Orders(#[from] OrderError),
    #[error(transparent)]
    Commission(#[from] CommissionError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorRanking {
    pub vendor_id: String,
    pub farm_name: String,
    pub net_cents: Cents,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRanking {
    pub product_id: String,
    pub name: String,
    pub units_sold: u64,
    pub revenue_cents: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformOverview {
    pub users_by_role: BTreeMap<String, usize>,
    pub vendors_by_status: BTreeMap<String, usize>,
    pub products_by_status: BTreeMap<String, usize>,
    pub orders_by_status: BTreeMap<String, usize>,
    /// Total of delivered orders.
    pub gross_merchandise_cents: Cents,
    pub platform_commission_cents: Cents,
    /// Delivered revenue keyed by `YYYY-MM`.
    pub revenue_by_month: BTreeMap<String, Cents>,
    pub top_vendors: Vec<VendorRanking>,
    pub top_products: Vec<ProductRanking>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    pub product_id: String,
    pub name: String,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorDashboard {
    pub vendor_id: String,
    pub products_total: usize,
    pub products_by_status: BTreeMap<String, usize>,
    pub low_stock: Vec<LowStockItem>,
    pub orders_total: usize,
    pub orders_by_status: BTreeMap<String, usize>,
    pub units_sold: u64,
    /// The vendor's share of non-cancelled order value, before commission.
    pub sales_cents: Cents,
    pub pending_earnings_cents: Cents,
    pub paid_earnings_cents: Cents,
}

/// Serialized name of a unit enum variant, e.g. `ProductStatus::Approved`
/// becomes `approved`.
fn key<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => "unknown".to_string(),
    }
}

fn count_by<'a, T: 'a, K: Serialize>(items: impl IntoIterator<Item = &'a T>, field: impl Fn(&T) -> K) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(&field(item))).or_insert(0) += 1;
    }
    counts
}

fn top_products(orders: &[Order], names: &[Product]) -> Vec<ProductRanking> {
    let mut rankings: Vec<ProductRanking> = Vec::new();
    for item in orders.iter().filter(|o| o.status != OrderStatus::Cancelled).flat_map(|o| &o.items) {
        match rankings.iter_mut().find(|r| r.product_id == item.product_id) {
            Some(ranking) => {
                ranking.units_sold += u64::from(item.quantity);
                ranking.revenue_cents += item.line_total_cents;
            }
            None => rankings.push(ProductRanking {
                product_id: item.product_id.clone(),
                name: names
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map_or_else(|| item.product_name.clone(), |p| p.name.clone()),
                units_sold: u64::from(item.quantity),
                revenue_cents: item.line_total_cents,
            }),
        }
    }
    rankings.sort_by(|a, b| b.units_sold.cmp(&a.units_sold).then_with(|| a.product_id.cmp(&b.product_id)));
    rankings.truncate(TOP_N);
    rankings
}

/// Read-only reporting over every other client.
#[derive(Clone)]
pub struct AnalyticsClient {
    users: UserClient,
    vendors: VendorClient,
    products: ProductClient,
    orders: OrderClient,
    commission: CommissionClient,
}

impl AnalyticsClient {
    pub fn new(
        users: UserClient,
        vendors: VendorClient,
        products: ProductClient,
        orders: OrderClient,
        commission: CommissionClient,
    ) -> Self {
        Self { users, vendors, products, orders, commission }
    }

    #[instrument(skip(self))]
    pub async fn platform_overview(&self, caller: &Caller) -> Result<PlatformOverview, AnalyticsError> {
        debug!("Collecting platform overview");
        if !caller.is_admin() {
            return Err(AnalyticsError::Forbidden("Platform analytics are admin only".to_string()));
        }
        let users = self.users.list_users().await?;
        let vendors = self.vendors.list_vendors().await?;
        let products = self.products.list_products().await?;
        let orders = self.orders.list_orders().await?;
        let summary = self.commission.summary().await?;
        let earnings = self.commission.all_earnings().await?;

        let delivered: Vec<&Order> = orders.iter().filter(|o| o.status == OrderStatus::Delivered).collect();
        let mut revenue_by_month = BTreeMap::new();
        for order in &delivered {
            *revenue_by_month.entry(order.updated_at.format("%Y-%m").to_string()).or_insert(0) += order.total_cents;
        }

        let mut top_vendors: Vec<VendorRanking> = Vec::new();
        for earning in &earnings {
            match top_vendors.iter_mut().find(|r| r.vendor_id == earning.vendor_id) {
                Some(ranking) => {
                    ranking.net_cents += earning.net_cents;
                    ranking.orders += 1;
                }
                None => top_vendors.push(VendorRanking {
                    vendor_id: earning.vendor_id.clone(),
                    farm_name: vendors
                        .iter()
                        .find(|v| v.id == earning.vendor_id)
                        .map_or_else(String::new, |v| v.farm_name.clone()),
                    net_cents: earning.net_cents,
                    orders: 1,
                }),
            }
        }
        top_vendors.sort_by(|a, b| b.net_cents.cmp(&a.net_cents).then_with(|| a.vendor_id.cmp(&b.vendor_id)));
        top_vendors.truncate(TOP_N);

        Ok(PlatformOverview {
            users_by_role: count_by(&users, |u| u.role),
            vendors_by_status: count_by(&vendors, |v| v.status),
            products_by_status: count_by(&products, |p| p.status),
            orders_by_status: count_by(&orders, |o| o.status),
            gross_merchandise_cents: delivered.iter().map(|o| o.total_cents).sum(),
            platform_commission_cents: summary.platform_cents,
            revenue_by_month,
            top_vendors,
            top_products: top_products(&orders, &products),
        })
    }

    #[instrument(skip(self))]
    pub async fn vendor_dashboard(&self, caller: &Caller, vendor_id: String) -> Result<VendorDashboard, AnalyticsError> {
        debug!("Collecting vendor dashboard");
        let products = self.products.products_for_vendor(caller, vendor_id.clone()).await?;
        let orders = self.orders.orders_for_caller(caller).await?;
        let orders: Vec<Order> = orders.into_iter().filter(|o| o.involves_vendor(&vendor_id)).collect();
        let earnings = self.commission.earnings_for_vendor(vendor_id.clone()).await?;

        let mut low_stock: Vec<LowStockItem> = products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .map(|p| LowStockItem { product_id: p.id.clone(), name: p.name.clone(), stock: p.stock })
            .collect();
        low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.product_id.cmp(&b.product_id)));

        let own_items: Vec<&OrderItem> = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .flat_map(|o| &o.items)
            .filter(|item| item.vendor_id == vendor_id)
            .collect();
        let sum_earnings = |status: EarningStatus| -> Cents {
            earnings.iter().filter(|e| e.status == status).map(|e| e.net_cents).sum()
        };

        Ok(VendorDashboard {
            vendor_id: vendor_id.clone(),
            products_total: products.len(),
            products_by_status: count_by(&products, |p| p.status),
            low_stock,
            orders_total: orders.len(),
            orders_by_status: count_by(&orders, |o| o.status),
            units_sold: own_items.iter().map(|item| u64::from(item.quantity)).sum(),
            sales_cents: own_items.iter().map(|item| item.line_total_cents).sum(),
            pending_earnings_cents: sum_earnings(EarningStatus::Pending),
            paid_earnings_cents: sum_earnings(EarningStatus::Paid),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductStatus, Role};

    #[test]
    fn test_counts_use_serialized_names() {
        let roles = [Role::Customer, Role::Vendor, Role::Customer];
        let counts = count_by(&roles, |r| *r);
        assert_eq!(counts.get("customer"), Some(&2));
        assert_eq!(counts.get("vendor"), Some(&1));
        assert_eq!(key(&ProductStatus::Approved), "approved");
        assert_eq!(key(&OrderStatus::Cancelled), "cancelled");
    }
}
