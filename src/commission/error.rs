use thiserror::Error;

use crate::domain::OrderStatus;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommissionError {
    #[error("Order {order_id} is {status}, commission is only recorded for delivered orders")]
    NotDelivered { order_id: String, status: OrderStatus },
    #[error("Commission already recorded for order {0}")]
    AlreadyRecorded(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
