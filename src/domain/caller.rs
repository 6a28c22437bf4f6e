use serde::{Deserialize, Serialize};

use super::Role;

/// The already-authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Caller {
    /// Any signed-in user acting without a vendor profile, including a
    /// vendor-role user whose application is not filed yet.
    Customer { user_id: String },
    Vendor { user_id: String, vendor_id: String },
    Admin { user_id: String },
}

impl Caller {
    pub fn customer(user_id: impl Into<String>) -> Self {
        Self::Customer { user_id: user_id.into() }
    }

    pub fn vendor(user_id: impl Into<String>, vendor_id: impl Into<String>) -> Self {
        Self::Vendor { user_id: user_id.into(), vendor_id: vendor_id.into() }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::Admin { user_id: user_id.into() }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Customer { user_id } | Self::Vendor { user_id, .. } | Self::Admin { user_id } => {
                user_id
            }
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Customer { .. } => Role::Customer,
            Self::Vendor { .. } => Role::Vendor,
            Self::Admin { .. } => Role::Admin,
        }
    }

    pub fn vendor_id(&self) -> Option<&str> {
        match self {
            Self::Vendor { vendor_id, .. } => Some(vendor_id),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }
}
