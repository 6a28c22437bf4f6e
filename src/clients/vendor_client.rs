use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{NotificationClient, UserClient};
use crate::domain::{
    Caller, NotificationCreate, NotificationKind, Role, VendorCreate, VendorPatch, VendorProfile,
    VendorReview, VendorStatus,
};
use crate::vendor_actor::{VendorAction, VendorActionResult, VendorError};

/// Client for vendor profiles and the admin review workflow.
#[derive(Clone)]
pub struct VendorClient {
    inner: ResourceClient<VendorProfile>,
    users: UserClient,
    notifications: NotificationClient,
}

impl_client_methods!(VendorClient, VendorProfile, VendorError, vendor);

impl VendorClient {
    pub fn new(
        inner: ResourceClient<VendorProfile>,
        users: UserClient,
        notifications: NotificationClient,
    ) -> Self {
        Self { inner, users, notifications }
    }

    /// Creates a Pending profile for the calling vendor-role user.
    #[instrument(skip(self, application), fields(user_id = %application.user_id))]
    pub async fn apply(&self, caller: &Caller, application: VendorCreate) -> Result<String, VendorError> {
        debug!("Sending request");
        if caller.user_id() != application.user_id {
            return Err(VendorError::Forbidden(format!(
                "User {} cannot apply on behalf of {}",
                caller.user_id(),
                application.user_id
            )));
        }
        if caller.vendor_id().is_some() {
            return Err(VendorError::AlreadyExists(application.user_id));
        }
        let user = self
            .users
            .get_user(application.user_id.clone())
            .await
            .map_err(|e| VendorError::UserLookup(e.to_string()))?
            .ok_or_else(|| VendorError::UserLookup(format!("No user {}", application.user_id)))?;
        if user.role != Role::Vendor {
            return Err(VendorError::Forbidden(format!("User {} is not a vendor account", user.id)));
        }

        let vendor_id = self.inner.create(application).await.map_err(VendorError::from)?;
        info!(%vendor_id, "Vendor application received");
        self.notifications
            .notify_quietly(NotificationCreate::new(
                user.id,
                NotificationKind::VendorReview,
                "Application received",
                "Your vendor application is awaiting review.",
            ))
            .await;
        Ok(vendor_id)
    }

    #[instrument(skip(self))]
    pub async fn require_vendor(&self, id: String) -> Result<VendorProfile, VendorError> {
        debug!("Sending request");
        self.inner.fetch(id).await.map_err(VendorError::from)
    }

    #[instrument(skip(self))]
    pub async fn vendors_by_status(&self, status: Option<VendorStatus>) -> Result<Vec<VendorProfile>, VendorError> {
        debug!("Sending request");
        self.inner
            .query(move |vendor| status.map_or(true, |status| vendor.status == status))
            .await
            .map_err(VendorError::from)
    }

    #[instrument(skip(self))]
    pub async fn vendor_for_user(&self, user_id: String) -> Result<Option<VendorProfile>, VendorError> {
        debug!("Sending request");
        let mut found = self
            .inner
            .query(move |vendor| vendor.user_id == user_id)
            .await
            .map_err(VendorError::from)?;
        Ok(found.pop())
    }

    /// The owning vendor edits farm details.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(
        &self,
        caller: &Caller,
        vendor_id: String,
        patch: VendorPatch,
    ) -> Result<VendorProfile, VendorError> {
        debug!("Sending request");
        if caller.vendor_id() != Some(vendor_id.as_str()) {
            return Err(VendorError::Forbidden(format!("Cannot edit vendor {vendor_id}")));
        }
        self.inner.update(vendor_id, patch).await.map_err(VendorError::from)
    }

    /// Applies an admin decision, syncs the owner's approval flag and
    /// notifies the owner.
    #[instrument(skip(self))]
    pub async fn review(
        &self,
        caller: &Caller,
        vendor_id: String,
        review: VendorReview,
    ) -> Result<VendorProfile, VendorError> {
        debug!("Sending request");
        if !caller.is_admin() {
            return Err(VendorError::Forbidden("Only admins review vendors".to_string()));
        }

        let VendorActionResult::Reviewed { from, to } = self
            .inner
            .perform_action(vendor_id.clone(), VendorAction::Review(review.clone()))
            .await
            .map_err(VendorError::from)?;
        let vendor = self.inner.fetch(vendor_id).await.map_err(VendorError::from)?;
        info!(?from, ?to, "Vendor reviewed");

        let approved = match to {
            VendorStatus::Approved => Some(true),
            VendorStatus::Rejected | VendorStatus::Suspended => Some(false),
            VendorStatus::Pending => None,
        };
        if let Some(approved) = approved {
            if let Err(error) = self.users.set_approved(vendor.user_id.clone(), approved).await {
                warn!(%error, user_id = %vendor.user_id, "Could not sync user approval");
            }
        }

        let (title, message) = match (&review, review.reason()) {
            (VendorReview::Approve, _) => (
                "Vendor account approved",
                format!("{} can now list products.", vendor.farm_name),
            ),
            (VendorReview::Reinstate, _) => (
                "Vendor account reinstated",
                format!("{} is active again.", vendor.farm_name),
            ),
            (VendorReview::Resubmit, _) => (
                "Application reopened",
                "Your vendor application is awaiting review again.".to_string(),
            ),
            (VendorReview::Reject { .. }, reason) => (
                "Vendor application rejected",
                format!("Reason: {}", reason.unwrap_or_default()),
            ),
            (VendorReview::Suspend { .. }, reason) => (
                "Vendor account suspended",
                format!("Reason: {}", reason.unwrap_or_default()),
            ),
        };
        self.notifications
            .notify_quietly(NotificationCreate::new(
                vendor.user_id.clone(),
                NotificationKind::VendorReview,
                title,
                message,
            ))
            .await;
        Ok(vendor)
    }
}
