//! System orchestration, startup, and shutdown logic.

pub mod config;
pub mod marketplace_system;
pub mod telemetry;

pub use config::*;
pub use marketplace_system::*;
pub use telemetry::*;
