use tracing::{debug, instrument, warn};

use crate::actor_framework::{id_sequence, ResourceClient};
use crate::domain::{Notification, NotificationCreate};
use crate::notification_actor::{NotificationAction, NotificationError};

/// Client for in-app notifications.
#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

impl_client_new!(NotificationClient, Notification);

impl NotificationClient {
    #[instrument(skip(self), fields(user_id = %payload.user_id, kind = ?payload.kind))]
    pub async fn notify(&self, payload: NotificationCreate) -> Result<String, NotificationError> {
        debug!("Sending request");
        self.inner.create(payload).await.map_err(NotificationError::from)
    }

    /// Sends a notification from inside another workflow. Failures are logged
    /// and never propagated.
    pub(crate) async fn notify_quietly(&self, payload: NotificationCreate) {
        if let Err(error) = self.notify(payload).await {
            warn!(%error, "Notification not delivered");
        }
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: String) -> Result<Vec<Notification>, NotificationError> {
        debug!("Sending request");
        let mut notifications = self
            .inner
            .query(move |notification| notification.user_id == user_id)
            .await
            .map_err(NotificationError::from)?;
        notifications.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| id_sequence(&b.id).cmp(&id_sequence(&a.id)))
        });
        Ok(notifications)
    }

    #[instrument(skip(self))]
    pub async fn unread_count(&self, user_id: String) -> Result<usize, NotificationError> {
        debug!("Sending request");
        let unread = self
            .inner
            .query(move |notification| notification.user_id == user_id && !notification.read)
            .await
            .map_err(NotificationError::from)?;
        Ok(unread.len())
    }

    /// Marks one notification read. Only its recipient may do so.
    #[instrument(skip(self))]
    pub async fn mark_read(&self, user_id: String, notification_id: String) -> Result<bool, NotificationError> {
        debug!("Sending request");
        let notification = self.inner.fetch(notification_id.clone()).await.map_err(NotificationError::from)?;
        if notification.user_id != user_id {
            return Err(NotificationError::Forbidden(format!(
                "Notification {notification_id} belongs to another user"
            )));
        }
        self.inner
            .perform_action(notification_id, NotificationAction::MarkRead)
            .await
            .map_err(NotificationError::from)
    }

    /// Returns how many notifications changed.
    #[instrument(skip(self))]
    pub async fn mark_all_read(&self, user_id: String) -> Result<usize, NotificationError> {
        debug!("Sending request");
        let unread = self
            .inner
            .query(move |notification| notification.user_id == user_id && !notification.read)
            .await
            .map_err(NotificationError::from)?;
        let mut changed = 0;
        for notification in unread {
            if self
                .inner
                .perform_action(notification.id, NotificationAction::MarkRead)
                .await
                .map_err(NotificationError::from)?
            {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
