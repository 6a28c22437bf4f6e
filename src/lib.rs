//! Poultry Hub Kenya marketplace core.
//!
//! Every resource is owned by one actor task; callers use the typed clients
//! wired together by [`app_system::MarketplaceSystem`].

pub mod actor_framework;
pub mod ai;
pub mod app_system;
pub mod clients;
pub mod commission;
pub mod domain;
pub mod messages;
pub mod notification_actor;
pub mod order_actor;
pub mod product_actor;
pub mod user_actor;
pub mod vendor_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
