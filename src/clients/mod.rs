//! Typed clients. Resource clients wrap a `ResourceClient`; service clients
//! wrap the sender of a hand-written service actor.

#[macro_use]
mod macros;

pub mod analytics_client;
pub mod commission_client;
pub mod duplicate_client;
pub mod listing_client;
pub mod notification_client;
pub mod order_client;
pub mod product_client;
pub mod user_client;
pub mod vendor_client;

pub use analytics_client::*;
pub use commission_client::*;
pub use duplicate_client::*;
pub use listing_client::*;
pub use notification_client::*;
pub use order_client::*;
pub use product_client::*;
pub use user_client::*;
pub use vendor_client::*;
