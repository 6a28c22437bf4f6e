use crate::domain::OrderStatus;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves the order along its lifecycle; `changed_by` is the acting user id.
    Transition { to: OrderStatus, changed_by: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    Transitioned { from: OrderStatus, to: OrderStatus },
}
