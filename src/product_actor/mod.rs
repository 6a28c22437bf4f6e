//! Product-specific domain logic, including stock management and review status.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
