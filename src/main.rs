use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn, Instrument};

use poultry_hub::app_system::{check_threshold, setup_tracing, AppConfig, LogFormat, MarketplaceSystem};
use poultry_hub::domain::{
    Caller, OrderLine, OrderPlacement, OrderStatus, PaymentMethod, ProductCategory, ProductStatus,
    ProductSubmission, Role, ShippingInfo, UserCreate, VendorCreate, VendorReview,
};

/// Runs a scripted marketplace session and prints the resulting analytics.
#[derive(Debug, Parser)]
#[command(name = "poultry_hub", version)]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    /// Duplicate-listing cache file (overrides POULTRY_HUB_CACHE_PATH). Without
    /// either, the session uses a throwaway file so runs do not see each
    /// other's listings.
    #[arg(long)]
    cache_path: Option<PathBuf>,
    /// Similarity percentage at which listings count as duplicates.
    #[arg(long)]
    duplicate_threshold: Option<f64>,
    /// Platform commission in basis points (1000 = 10%).
    #[arg(long)]
    commission_bps: Option<u32>,
}

fn submission(name: &str, category: ProductCategory, description: &str, price_cents: u64, stock: u32) -> ProductSubmission {
    ProductSubmission {
        name: name.to_string(),
        category,
        description: description.to_string(),
        price_cents,
        stock,
        images: Vec::new(),
    }
}

/// Cache file for this session and whether it should be removed afterwards.
fn session_cache_path(cli_path: Option<PathBuf>, env_path_set: bool, configured: PathBuf) -> (PathBuf, bool) {
    match cli_path {
        Some(path) => (path, false),
        None if env_path_set => (configured, false),
        None => {
            let file = format!("poultry_hub_session_{}.json", std::process::id());
            (std::env::temp_dir().join(file), true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    setup_tracing(cli.log_format);

    let mut config = AppConfig::from_env().map_err(|e| e.to_string())?;
    let env_path_set = std::env::var_os("POULTRY_HUB_CACHE_PATH").is_some();
    let (cache_path, throwaway_cache) =
        session_cache_path(cli.cache_path, env_path_set, config.duplicates.path.clone());
    config.duplicates.path = cache_path.clone();
    if let Some(threshold) = cli.duplicate_threshold {
        check_threshold(threshold).map_err(|e| e.to_string())?;
        config.duplicates.threshold = threshold;
    }
    if let Some(bps) = cli.commission_bps {
        config.commission_rate_bps = bps;
    }

    info!("Starting marketplace session");
    let system = MarketplaceSystem::new(config).map_err(|e| e.to_string())?;

    // Accounts
    let admin_id = system
        .user_client
        .create_user(UserCreate::new("Platform Admin", "admin@poultryhub.co.ke", Role::Admin))
        .await
        .map_err(|e| e.to_string())?;
    let buyer_id = system
        .user_client
        .create_user(UserCreate::new("Akinyi Odhiambo", "akinyi@example.co.ke", Role::Customer).with_phone("0712345678"))
        .await
        .map_err(|e| e.to_string())?;
    let farmer_id = system
        .user_client
        .create_user(UserCreate::new("Peter Kiprono", "kiprono@example.co.ke", Role::Vendor))
        .await
        .map_err(|e| e.to_string())?;
    let admin = Caller::admin(admin_id);
    let buyer = Caller::customer(buyer_id.clone());

    // Vendor onboarding
    let vendor_id = async {
        let vendor_id = system
            .vendor_client
            .apply(&Caller::customer(farmer_id.clone()), VendorCreate {
                user_id: farmer_id.clone(),
                farm_name: "Kiprono Poultry Farm".into(),
                location: "Eldoret".into(),
                phone: "0722111333".into(),
                description: "Improved kienyeji and layers".into(),
            })
            .await?;
        system.vendor_client.review(&admin, vendor_id.clone(), VendorReview::Approve).await?;
        Ok::<_, poultry_hub::vendor_actor::VendorError>(vendor_id)
    }
    .instrument(tracing::info_span!("vendor_onboarding"))
    .await
    .map_err(|e| e.to_string())?;
    let farmer = Caller::vendor(farmer_id.clone(), vendor_id.clone());

    // Listings
    let listings = [
        submission(
            "Improved Kienyeji hens",
            ProductCategory::LiveBirds,
            "Vaccinated point-of-lay hens, 5 months old, raised free range.",
            120_000,
            40,
        ),
        submission("Fresh eggs tray", ProductCategory::Eggs, "", 45_000, 60),
        submission(
            "Layers mash 70kg",
            ProductCategory::Feed,
            "Complete layers feed. Call 0722111333 for delivery!!!",
            380_000,
            3,
        ),
    ];
    let mut product_ids = Vec::new();
    for listing in listings {
        let outcome = system
            .listing_client
            .submit(&farmer, listing)
            .instrument(tracing::info_span!("listing_submission"))
            .await
            .map_err(|e| e.to_string())?;
        info!(product_id = %outcome.product_id, status = ?outcome.status, notes = ?outcome.review.notes, "Listing reviewed");
        if outcome.status != ProductStatus::Approved {
            warn!(product_id = %outcome.product_id, "Listing held, approving manually");
            system
                .listing_client
                .moderate(&admin, outcome.product_id.clone(), true, Some("Checked by admin".into()))
                .await
                .map_err(|e| e.to_string())?;
        }
        product_ids.push(outcome.product_id);
    }

    // Order lifecycle
    let placement = OrderPlacement {
        buyer_id,
        lines: vec![
            OrderLine::new(product_ids[0].clone(), 2),
            OrderLine::new(product_ids[1].clone(), 3),
            OrderLine::new(product_ids[0].clone(), 1),
        ],
        shipping: ShippingInfo {
            recipient: "Akinyi Odhiambo".into(),
            phone: "0712345678".into(),
            address: "Milimani Road".into(),
            town: "Kisumu".into(),
            notes: None,
        },
        payment_method: PaymentMethod::Mpesa,
    };
    let span = tracing::info_span!("order_processing");
    let order_result = async {
        let order = system.order_client.place_order(&buyer, placement).await?;
        for status in [OrderStatus::Confirmed, OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Delivered] {
            system.order_client.update_status(&farmer, order.id.clone(), status).await?;
        }
        Ok::<_, poultry_hub::order_actor::OrderError>(order.id)
    }
    .instrument(span)
    .await;
    match order_result {
        Ok(order_id) => info!(%order_id, "Order delivered"),
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    // Reports
    let overview = system.analytics_client.platform_overview(&admin).await.map_err(|e| e.to_string())?;
    let dashboard = system
        .analytics_client
        .vendor_dashboard(&farmer, vendor_id)
        .await
        .map_err(|e| e.to_string())?;
    let unread = system.notification_client.unread_count(farmer_id).await.map_err(|e| e.to_string())?;
    let report = serde_json::json!({
        "platform": overview,
        "vendor": dashboard,
        "vendor_unread_notifications": unread,
    });
    println!("{}", serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?);

    system.shutdown().await?;
    if throwaway_cache {
        if let Err(e) = tokio::fs::remove_file(&cache_path).await {
            warn!(error = %e, path = %cache_path.display(), "Session cache not removed");
        }
    }
    info!("Application completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cache_path_prefers_explicit_paths() {
        let configured = PathBuf::from("data/duplicate_fingerprints.json");

        let (path, throwaway) = session_cache_path(Some("/tmp/mine.json".into()), true, configured.clone());
        assert_eq!(path, PathBuf::from("/tmp/mine.json"));
        assert!(!throwaway);

        let (path, throwaway) = session_cache_path(None, true, configured.clone());
        assert_eq!(path, configured);
        assert!(!throwaway);

        let (path, throwaway) = session_cache_path(None, false, configured.clone());
        assert_ne!(path, configured);
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(throwaway);
    }
}
