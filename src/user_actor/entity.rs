use chrono::Utc;

use super::actions::UserAction;
use crate::actor_framework::Entity;
use crate::domain::{is_valid_email, Role, User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreatePayload = UserCreate;
    type Patch = UserPatch;
    type Action = UserAction;
    type ActionResult = bool;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// Vendors start unapproved; everyone else is approved immediately.
    fn from_create(id: String, payload: UserCreate) -> Result<Self, String> {
        let name = payload.name.trim().to_string();
        let email = payload.email.trim().to_string();
        if name.is_empty() {
            return Err("Name required".to_string());
        }
        if !is_valid_email(&email) {
            return Err(format!("Invalid email: {email}"));
        }
        Ok(Self {
            id,
            name,
            email,
            phone: payload.phone,
            approved: payload.role != Role::Vendor,
            role: payload.role,
            created_at: Utc::now(),
        })
    }

    fn conflict_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err("Name required".to_string());
            }
            self.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: UserAction) -> Result<bool, String> {
        match action {
            UserAction::SetApproved(approved) => {
                let changed = self.approved != approved;
                self.approved = approved;
                Ok(changed)
            }
        }
    }
}
