//! User accounts: validation, unique emails, approval flag.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
