use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

/// A seller's farm profile. Listings hang off the profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub id: String,
    pub user_id: String,
    pub farm_name: String,
    pub location: String,
    pub phone: String,
    pub description: String,
    pub status: VendorStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreate {
    pub user_id: String,
    pub farm_name: String,
    pub location: String,
    pub phone: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorPatch {
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// Admin review decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum VendorReview {
    Approve,
    Reject { reason: String },
    Suspend { reason: String },
    Reinstate,
    Resubmit,
}

impl VendorReview {
    /// Target status, or `None` when the move is not allowed from `from`.
    pub fn target(&self, from: VendorStatus) -> Option<VendorStatus> {
        use VendorStatus::*;
        match (self, from) {
            (Self::Approve, Pending) => Some(Approved),
            (Self::Reject { .. }, Pending) => Some(Rejected),
            (Self::Suspend { .. }, Approved) => Some(Suspended),
            (Self::Reinstate, Suspended) => Some(Approved),
            (Self::Resubmit, Rejected) => Some(Pending),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Reject { reason } | Self::Suspend { reason } => Some(reason),
            _ => None,
        }
    }
}
