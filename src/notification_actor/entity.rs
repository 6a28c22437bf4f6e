use chrono::Utc;

use super::actions::NotificationAction;
use crate::actor_framework::Entity;
use crate::domain::{Notification, NotificationCreate};

impl Entity for Notification {
    type Id = String;
    type CreatePayload = NotificationCreate;
    type Patch = ();
    type Action = NotificationAction;
    type ActionResult = bool;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create(id: String, payload: NotificationCreate) -> Result<Self, String> {
        if payload.message.trim().is_empty() {
            return Err("Notification message required".to_string());
        }
        Ok(Self {
            id,
            user_id: payload.user_id,
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            read: false,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: NotificationAction) -> Result<bool, String> {
        match action {
            NotificationAction::MarkRead => {
                let changed = !self.read;
                self.read = true;
                Ok(changed)
            }
        }
    }
}
