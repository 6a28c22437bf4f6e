use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use crate::actor_framework::Entity;
use crate::domain::{checked_items_total, Order, OrderCreate, OrderStatus, StatusChange};

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a Pending order. The total is always recomputed from the items.
    fn from_create(id: String, payload: OrderCreate) -> Result<Self, String> {
        if payload.items.is_empty() {
            return Err("Order must contain at least one item".to_string());
        }
        for item in &payload.items {
            if item.quantity == 0 {
                return Err(format!("Quantity for {} must be at least 1", item.product_id));
            }
            if item.unit_price_cents.checked_mul(u64::from(item.quantity)) != Some(item.line_total_cents) {
                return Err(format!("Line total mismatch for {}", item.product_id));
            }
        }
        let total_cents =
            checked_items_total(&payload.items).ok_or_else(|| "Order total is too large".to_string())?;
        let now = Utc::now();
        Ok(Self {
            id,
            total_cents,
            buyer_id: payload.buyer_id.clone(),
            items: payload.items,
            shipping: payload.shipping,
            payment_method: payload.payment_method,
            status: OrderStatus::Pending,
            history: vec![StatusChange {
                status: OrderStatus::Pending,
                changed_by: payload.buyer_id,
                at: now,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    /// Orders are immutable apart from status transitions.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Orders cannot be edited".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Orders cannot be deleted".to_string())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::Transition { to, changed_by } => {
                let from = self.status;
                if !from.can_transition_to(to) {
                    return Err(format!("Invalid status transition: {from} -> {to}"));
                }
                let now = Utc::now();
                self.status = to;
                self.updated_at = now;
                self.history.push(StatusChange { status: to, changed_by, at: now });
                Ok(OrderActionResult::Transitioned { from, to })
            }
        }
    }
}
