//! Commission ledger: splits delivered orders between the platform and vendors.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
