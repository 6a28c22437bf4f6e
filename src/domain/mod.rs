pub mod caller;
pub mod commission;
pub mod money;
pub mod notification;
pub mod order;
pub mod product;
pub mod user;
pub mod vendor;

pub use caller::*;
pub use commission::*;
pub use money::*;
pub use notification::*;
pub use order::*;
pub use product::*;
pub use user::*;
pub use vendor::*;
