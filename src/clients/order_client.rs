use tracing::{error, info, instrument, warn};

use crate::actor_framework::{id_sequence, FrameworkError, ResourceClient};
use crate::clients::{CommissionClient, NotificationClient, ProductClient, UserClient, VendorClient};
use crate::domain::{
    checked_items_total, format_kes, Caller, NotificationCreate, NotificationKind, Order, OrderCreate, OrderItem, OrderLine,
    OrderPlacement, OrderStatus, ProductStatus, Role,
};
use crate::order_actor::{OrderAction, OrderError};
use crate::product_actor::ProductError;

/// Client for interacting with the Order actor.
///
/// Placement and status changes are orchestrated here: users and products
/// are validated, stock is reserved (and released again on failure), the
/// ledger is updated on delivery and everyone involved is notified.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    vendor_client: VendorClient,
    notification_client: NotificationClient,
    commission_client: CommissionClient,
}

/// Folds repeated product lines into one, keeping first-seen order.
pub fn merge_lines(lines: Vec<OrderLine>) -> Vec<OrderLine> {
    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|existing| existing.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

/// Buyer sees own orders, a vendor sees orders containing its items, admins
/// see everything.
pub fn can_view(caller: &Caller, order: &Order) -> bool {
    match caller {
        Caller::Admin { .. } => true,
        Caller::Vendor { vendor_id, .. } => order.involves_vendor(vendor_id),
        Caller::Customer { user_id } => *user_id == order.buyer_id,
    }
}

fn authorize_transition(caller: &Caller, order: &Order, to: OrderStatus) -> Result<(), OrderError> {
    match caller {
        Caller::Admin { .. } => Ok(()),
        Caller::Vendor { vendor_id, .. } if order.involves_vendor(vendor_id) => Ok(()),
        Caller::Customer { user_id } if *user_id == order.buyer_id => {
            if order.status == OrderStatus::Pending && to == OrderStatus::Cancelled {
                Ok(())
            } else {
                Err(OrderError::Forbidden("Buyers can only cancel pending orders".to_string()))
            }
        }
        _ => Err(OrderError::Forbidden(format!("Order {} is not yours to update", order.id))),
    }
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        vendor_client: VendorClient,
        notification_client: NotificationClient,
        commission_client: CommissionClient,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            vendor_client,
            notification_client,
            commission_client,
        }
    }

    /// Puts back stock taken for `items`. Failures are logged.
    async fn release_items(&self, items: &[OrderItem]) {
        for item in items {
            if let Err(e) = self.product_client.release_stock(item.product_id.clone(), item.quantity).await {
                error!(error = %e, product_id = %item.product_id, "Stock release failed");
            }
        }
    }

    async fn notify_vendors(&self, vendor_ids: Vec<String>, kind: NotificationKind, title: &str, message: impl Fn(&str) -> String) {
        for vendor_id in vendor_ids {
            match self.vendor_client.get_vendor(vendor_id.clone()).await {
                Ok(Some(vendor)) => {
                    self.notification_client
                        .notify_quietly(NotificationCreate::new(vendor.user_id, kind, title, message(&vendor_id)))
                        .await;
                }
                Ok(None) => warn!(%vendor_id, "Vendor missing, notification skipped"),
                Err(e) => warn!(error = %e, %vendor_id, "Vendor lookup failed, notification skipped"),
            }
        }
    }

    #[instrument(skip(self, placement), fields(buyer_id = %placement.buyer_id))]
    pub async fn place_order(&self, caller: &Caller, placement: OrderPlacement) -> Result<Order, OrderError> {
        info!("Processing place_order request (Client Side)");

        match caller {
            Caller::Admin { .. } => {}
            Caller::Customer { user_id } if *user_id == placement.buyer_id => {}
            _ => return Err(OrderError::Forbidden("Orders are placed by the buying customer".to_string())),
        }

        // Step 1: Validate buyer
        match self.user_client.get_user(placement.buyer_id.clone()).await {
            Ok(Some(user)) if user.role == Role::Customer || user.role == Role::Admin => {
                info!(user_name = %user.name, "User validation successful")
            }
            Ok(Some(user)) => {
                return Err(OrderError::InvalidUser(format!("{} cannot buy as {:?}", user.id, user.role)));
            }
            Ok(None) => {
                error!("User not found");
                return Err(OrderError::InvalidUser(placement.buyer_id));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(OrderError::InvalidUser(format!("User validation failed: {e}")));
            }
        }

        // Step 2: Resolve products and prices
        let lines = merge_lines(placement.lines);
        if lines.is_empty() {
            return Err(OrderError::ValidationError("Order must contain at least one item".to_string()));
        }
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            if line.quantity == 0 {
                return Err(OrderError::ValidationError(format!(
                    "Quantity for {} must be at least 1",
                    line.product_id
                )));
            }
            let product = match self.product_client.get_product(line.product_id.clone()).await {
                Ok(Some(product)) => product,
                Ok(None) => return Err(OrderError::InvalidProduct(line.product_id.clone())),
                Err(e) => {
                    return Err(OrderError::InvalidProduct(format!("Product validation failed: {e}")));
                }
            };
            if product.status != ProductStatus::Approved {
                return Err(OrderError::InvalidProduct(format!("{} is not available for sale", product.id)));
            }
            let item = OrderItem::priced(product.id, product.vendor_id, product.name, product.price_cents, line.quantity)
                .ok_or_else(|| {
                    OrderError::ValidationError(format!("Line total for {} is too large", line.product_id))
                })?;
            items.push(item);
        }
        if checked_items_total(&items).is_none() {
            return Err(OrderError::ValidationError("Order total is too large".to_string()));
        }

        // Step 3: Reserve stock, undoing earlier lines if one fails
        for (reserved, item) in items.iter().enumerate() {
            if let Err(e) = self.product_client.reserve_stock(item.product_id.clone(), item.quantity).await {
                error!(error = %e, product_id = %item.product_id, "Stock reservation failed");
                self.release_items(&items[..reserved]).await;
                return Err(match e {
                    ProductError::InsufficientStock { .. } => OrderError::InsufficientStock(e.to_string()),
                    other => OrderError::InvalidProduct(other.to_string()),
                });
            }
        }
        info!("Stock reserved successfully");

        // Step 4: Create order in ResourceActor
        let payload = OrderCreate {
            buyer_id: placement.buyer_id.clone(),
            items: items.clone(),
            shipping: placement.shipping,
            payment_method: placement.payment_method,
        };
        let order_id = match self.inner.create(payload).await {
            Ok(id) => id,
            Err(e) => {
                self.release_items(&items).await;
                return Err(e.into());
            }
        };
        let order = self.inner.fetch(order_id.clone()).await?;
        info!(%order_id, total = order.total_cents, "Order placed");

        // Step 5: Notify
        self.notification_client
            .notify_quietly(NotificationCreate::new(
                order.buyer_id.clone(),
                NotificationKind::OrderPlaced,
                "Order placed",
                format!("Order {} for {} has been received.", order.id, format_kes(order.total_cents)),
            ))
            .await;
        let subtotals = order.vendor_subtotals();
        self.notify_vendors(order.vendor_ids(), NotificationKind::OrderPlaced, "New order", |vendor_id| {
            let subtotal = subtotals.iter().find(|(v, _)| v == vendor_id).map_or(0, |(_, c)| *c);
            format!("Order {} includes your products worth {}.", order.id, format_kes(subtotal))
        })
        .await;

        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, caller: &Caller, order_id: String, to: OrderStatus) -> Result<Order, OrderError> {
        let order = self.inner.fetch(order_id.clone()).await?;
        authorize_transition(caller, &order, to)?;
        let from = order.status;
        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition { from, to });
        }

        let action = OrderAction::Transition { to, changed_by: caller.user_id().to_string() };
        self.inner.perform_action(order_id.clone(), action).await.map_err(|e| match e {
            // another caller moved the order first
            FrameworkError::Rejected(_) => OrderError::InvalidTransition { from, to },
            other => other.into(),
        })?;
        let order = self.inner.fetch(order_id).await?;
        info!(%from, %to, "Order status updated");

        match to {
            OrderStatus::Cancelled => self.release_items(&order.items).await,
            OrderStatus::Delivered => match self.commission_client.record(order.clone()).await {
                Ok(record) => {
                    let earnings = record.earnings;
                    self.notify_vendors(order.vendor_ids(), NotificationKind::Earnings, "Earnings recorded", |vendor_id| {
                        let net = earnings.iter().find(|e| e.vendor_id == vendor_id).map_or(0, |e| e.net_cents);
                        format!("Order {} delivered. {} added to your pending earnings.", order.id, format_kes(net))
                    })
                    .await;
                }
                Err(e) => error!(error = %e, order_id = %order.id, "Commission not recorded"),
            },
            _ => {}
        }

        self.notification_client
            .notify_quietly(NotificationCreate::new(
                order.buyer_id.clone(),
                NotificationKind::OrderStatus,
                format!("Order {to}"),
                format!("Order {} is now {to}.", order.id),
            ))
            .await;
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, caller: &Caller, order_id: String) -> Result<Order, OrderError> {
        let order = self.inner.fetch(order_id).await?;
        if !can_view(caller, &order) {
            return Err(OrderError::Forbidden(format!("Order {} is not visible to this caller", order.id)));
        }
        Ok(order)
    }

    /// Orders visible to the caller, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_caller(&self, caller: &Caller) -> Result<Vec<Order>, OrderError> {
        let viewer = caller.clone();
        let mut orders = self.inner.query(move |order| can_view(&viewer, order)).await?;
        orders.sort_by(|a, b| id_sequence(&b.id).cmp(&id_sequence(&a.id)));
        Ok(orders)
    }

    /// Every order, for reporting.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.inner.list().await?)
    }
}
