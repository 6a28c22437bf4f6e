use chrono::Utc;

use super::actions::{VendorAction, VendorActionResult};
use crate::actor_framework::Entity;
use crate::domain::{VendorCreate, VendorPatch, VendorProfile, VendorReview, VendorStatus};

fn required(field: &str, value: String) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{field} required"))
    } else {
        Ok(trimmed.to_string())
    }
}

impl Entity for VendorProfile {
    type Id = String;
    type CreatePayload = VendorCreate;
    type Patch = VendorPatch;
    type Action = VendorAction;
    type ActionResult = VendorActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: VendorCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: payload.user_id,
            farm_name: required("Farm name", payload.farm_name)?,
            location: required("Location", payload.location)?,
            phone: required("Phone", payload.phone)?,
            description: payload.description.trim().to_string(),
            status: VendorStatus::Pending,
            rejection_reason: None,
            created_at: Utc::now(),
            reviewed_at: None,
        })
    }

    /// One profile per user.
    fn conflict_key(&self) -> Option<String> {
        Some(self.user_id.clone())
    }

    fn on_update(&mut self, patch: VendorPatch) -> Result<(), String> {
        // validate the whole patch before touching any field
        let farm_name = patch.farm_name.map(|v| required("Farm name", v)).transpose()?;
        let location = patch.location.map(|v| required("Location", v)).transpose()?;
        let phone = patch.phone.map(|v| required("Phone", v)).transpose()?;

        if let Some(farm_name) = farm_name {
            self.farm_name = farm_name;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        Ok(())
    }

    fn handle_action(&mut self, action: VendorAction) -> Result<VendorActionResult, String> {
        match action {
            VendorAction::Review(review) => {
                let from = self.status;
                let to = review
                    .target(from)
                    .ok_or_else(|| format!("Cannot apply {review:?} to a {from:?} vendor"))?;
                self.status = to;
                self.rejection_reason = match &review {
                    VendorReview::Reject { reason } | VendorReview::Suspend { reason } => {
                        Some(reason.clone())
                    }
                    _ => None,
                };
                self.reviewed_at = Some(Utc::now());
                Ok(VendorActionResult::Reviewed { from, to })
            }
        }
    }
}
