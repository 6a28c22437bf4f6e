use thiserror::Error;
use tracing::{error, info};

use super::AppConfig;
use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::ai::{ContentModerator, DescriptionGenerator, DuplicateCacheService, ImageAnalyzer, ListingReviewer};
use crate::clients::{
    AnalyticsClient, CommissionClient, DuplicateClient, ListingClient, NotificationClient, OrderClient,
    ProductClient, UserClient, VendorClient,
};
use crate::commission::CommissionService;
use crate::domain::{Notification, Order, Product, User, VendorProfile};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Could not build AI provider client: {0}")]
    Provider(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] super::ConfigError),
}

/// The marketplace: every actor and service plus the clients wired to them.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct MarketplaceSystem {
    pub user_client: UserClient,
    pub vendor_client: VendorClient,
    pub product_client: ProductClient,
    pub listing_client: ListingClient,
    pub order_client: OrderClient,
    pub notification_client: NotificationClient,
    pub commission_client: CommissionClient,
    pub duplicate_client: DuplicateClient,
    pub analytics_client: AnalyticsClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketplaceSystem {
    /// Starts every actor. Must be called inside a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        super::check_commission_rate(config.commission_rate_bps)?;
        super::check_threshold(config.duplicates.threshold)?;
        let buffer = config.channel_buffer;
        let mut handles = Vec::new();

        // 1. Resource actors
        let (user_actor, user_inner) = ResourceActor::<User>::new(buffer, sequential_ids("user"));
        handles.push(tokio::spawn(user_actor.run()));
        let (vendor_actor, vendor_inner) = ResourceActor::<VendorProfile>::new(buffer, sequential_ids("vendor"));
        handles.push(tokio::spawn(vendor_actor.run()));
        let (product_actor, product_inner) = ResourceActor::<Product>::new(buffer, sequential_ids("product"));
        handles.push(tokio::spawn(product_actor.run()));
        let (order_actor, order_inner) = ResourceActor::<Order>::new(buffer, sequential_ids("order"));
        handles.push(tokio::spawn(order_actor.run()));
        let (notification_actor, notification_inner) =
            ResourceActor::<Notification>::new(buffer, sequential_ids("notification"));
        handles.push(tokio::spawn(notification_actor.run()));

        // 2. Service actors
        let (commission_service, commission_client) = CommissionService::new(buffer, config.commission_rate_bps);
        handles.push(tokio::spawn(commission_service.run()));
        let (duplicate_service, duplicate_client) = DuplicateCacheService::new(buffer, config.duplicates.clone());
        handles.push(tokio::spawn(duplicate_service.run()));

        // 3. AI chains
        let text_generators = config.ai.text_generators()?;
        let reviewer = ListingReviewer::new(
            ContentModerator::new(text_generators.clone()),
            ImageAnalyzer::new(config.ai.image_detectors()?),
            DescriptionGenerator::new(text_generators),
            duplicate_client.clone(),
        );

        // 4. Clients
        let user_client = UserClient::new(user_inner);
        let notification_client = NotificationClient::new(notification_inner);
        let vendor_client = VendorClient::new(vendor_inner, user_client.clone(), notification_client.clone());
        let product_client = ProductClient::new(product_inner);
        let listing_client = ListingClient::new(
            product_client.clone(),
            vendor_client.clone(),
            notification_client.clone(),
            duplicate_client.clone(),
            reviewer,
        );
        let order_client = OrderClient::new(
            order_inner,
            user_client.clone(),
            product_client.clone(),
            vendor_client.clone(),
            notification_client.clone(),
            commission_client.clone(),
        );
        let analytics_client = AnalyticsClient::new(
            user_client.clone(),
            vendor_client.clone(),
            product_client.clone(),
            order_client.clone(),
            commission_client.clone(),
        );

        info!(
            commission_bps = config.commission_rate_bps,
            providers = ?config.ai.provider_names(),
            "Marketplace system started"
        );
        Ok(Self {
            user_client,
            vendor_client,
            product_client,
            listing_client,
            order_client,
            notification_client,
            commission_client,
            duplicate_client,
            analytics_client,
            handles,
        })
    }

    /// Stops the service actors, drops every client so the resource actors
    /// see their channels close, then waits for all tasks.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        if let Err(e) = self.commission_client.shutdown().await {
            error!(error = %e, "Commission service already stopped");
        }
        if let Err(e) = self.duplicate_client.shutdown().await {
            error!(error = %e, "Duplicate cache already stopped");
        }

        drop(self.analytics_client);
        drop(self.order_client);
        drop(self.listing_client);
        drop(self.vendor_client);
        drop(self.product_client);
        drop(self.user_client);
        drop(self.notification_client);
        drop(self.commission_client);
        drop(self.duplicate_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
