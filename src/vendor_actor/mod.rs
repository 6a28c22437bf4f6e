//! Vendor profiles and their admin review state machine.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
