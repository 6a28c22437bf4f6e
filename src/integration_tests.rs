#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::actor_framework::{Entity, FrameworkError, ResourceClient};
    use crate::ai::DuplicateCacheConfig;
    use crate::app_system::{AppConfig, MarketplaceSystem};
    use crate::clients::{
        CommissionClient, ListingError, NotificationClient, OrderClient, ProductClient, UserClient, VendorClient,
    };
    use crate::domain::{
        Caller, Notification, Order, OrderLine, OrderPlacement, OrderStatus, PaymentMethod, Product,
        ProductCategory, ProductCreate, ProductPatch, ProductStatus, ProductSubmission, Role, ShippingInfo, User, UserCreate,
        VendorCreate, VendorProfile, VendorReview,
    };
    use crate::mock_framework::{create_mock_client, expect_action, expect_create, expect_get};
    use crate::order_actor::OrderError;
    use crate::vendor_actor::VendorError;
    use crate::product_actor::{ProductAction, ProductActionResult};

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            recipient: "Akinyi".into(),
            phone: "0712345678".into(),
            address: "Oginga Odinga St".into(),
            town: "Kisumu".into(),
            notes: None,
        }
    }

    fn approved_product(id: &str, price_cents: u64, stock: u32) -> Product {
        Product::from_create(
            id.to_string(),
            ProductCreate {
                vendor_id: "vendor_1".into(),
                submission: ProductSubmission {
                    name: format!("Item {id}"),
                    category: ProductCategory::Eggs,
                    description: "Fresh eggs".into(),
                    price_cents,
                    stock,
                    images: vec![],
                },
                status: ProductStatus::Approved,
                moderation_notes: vec![],
            },
        )
        .unwrap()
    }

    /// Order client whose collaborators are mocks. Vendor, notification and
    /// ledger channels are closed, so best-effort side effects just log.
    struct MockedOrders {
        orders: OrderClient,
        user_rx: mpsc::Receiver<crate::actor_framework::ResourceRequest<User>>,
        product_rx: mpsc::Receiver<crate::actor_framework::ResourceRequest<Product>>,
        order_rx: mpsc::Receiver<crate::actor_framework::ResourceRequest<Order>>,
    }

    fn mocked_orders() -> MockedOrders {
        let (user_inner, user_rx) = create_mock_client::<User>(10);
        let (product_inner, product_rx) = create_mock_client::<Product>(10);
        let (order_inner, order_rx) = create_mock_client::<Order>(10);
        let (vendor_inner, _) = create_mock_client::<VendorProfile>(1);
        let (notification_inner, _) = create_mock_client::<Notification>(1);
        let (commission_sender, _) = mpsc::channel(1);

        let user_client = UserClient::new(user_inner);
        let notification_client = NotificationClient::new(notification_inner);
        let vendor_client = VendorClient::new(vendor_inner, user_client.clone(), notification_client.clone());
        let orders = OrderClient::new(
            order_inner,
            user_client,
            ProductClient::new(product_inner),
            vendor_client,
            notification_client,
            CommissionClient::new(commission_sender),
        );
        MockedOrders { orders, user_rx, product_rx, order_rx }
    }

    #[tokio::test]
    async fn test_order_creation_flow() {
        // 1. Setup Mocks
        let MockedOrders { orders, mut user_rx, mut product_rx, mut order_rx } = mocked_orders();

        // 2. Execute Order Creation in background
        let order_task = tokio::spawn(async move {
            let placement = OrderPlacement {
                buyer_id: "user_1".into(),
                lines: vec![OrderLine::new("product_1", 2), OrderLine::new("product_1", 3)],
                shipping: shipping(),
                payment_method: PaymentMethod::Mpesa,
            };
            orders.place_order(&Caller::customer("user_1"), placement).await
        });

        // 3. Verify Interactions
        let (user_id, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        assert_eq!(user_id, "user_1");
        let user = User::from_create(user_id, UserCreate::new("Akinyi", "akinyi@example.ke", Role::Customer)).unwrap();
        responder.send(Ok(Some(user))).unwrap();

        let (product_id, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
        assert_eq!(product_id, "product_1");
        responder.send(Ok(Some(approved_product("product_1", 20_000, 100)))).unwrap();

        // Merged lines reserve once
        let (product_id, action, responder) = expect_action(&mut product_rx).await.expect("Expected Product Action");
        assert_eq!(product_id, "product_1");
        match action {
            ProductAction::ReserveStock(qty) => assert_eq!(qty, 5),
            _ => panic!("Unexpected action: {:?}", action),
        }
        responder.send(Ok(ProductActionResult::Reserved { remaining: 95 })).unwrap();

        // Prices come from the product, not the caller
        let (payload, responder) = expect_create(&mut order_rx).await.expect("Expected Order Create");
        assert_eq!(payload.buyer_id, "user_1");
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].unit_price_cents, 20_000);
        assert_eq!(payload.items[0].line_total_cents, 100_000);
        let created = Order::from_create("order_1".into(), payload).unwrap();
        responder.send(Ok("order_1".to_string())).unwrap();

        let (order_id, responder) = expect_get(&mut order_rx).await.expect("Expected Order Get");
        assert_eq!(order_id, "order_1");
        responder.send(Ok(Some(created))).unwrap();

        // 4. Verify Result
        let order = order_task.await.unwrap().unwrap();
        assert_eq!(order.id, "order_1");
        assert_eq!(order.total_cents, 100_000);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_failed_reservation_releases_earlier_lines() {
        let MockedOrders { orders, mut user_rx, mut product_rx, order_rx } = mocked_orders();

        let order_task = tokio::spawn(async move {
            let placement = OrderPlacement {
                buyer_id: "user_1".into(),
                lines: vec![OrderLine::new("product_1", 2), OrderLine::new("product_2", 4)],
                shipping: shipping(),
                payment_method: PaymentMethod::CashOnDelivery,
            };
            orders.place_order(&Caller::customer("user_1"), placement).await
        });

        let (_, responder) = expect_get(&mut user_rx).await.expect("Expected User Get");
        let user = User::from_create("user_1".into(), UserCreate::new("Akinyi", "akinyi@example.ke", Role::Customer)).unwrap();
        responder.send(Ok(Some(user))).unwrap();
        for (id, stock) in [("product_1", 10), ("product_2", 1)] {
            let (product_id, responder) = expect_get(&mut product_rx).await.expect("Expected Product Get");
            assert_eq!(product_id, id);
            responder.send(Ok(Some(approved_product(id, 5_000, stock)))).unwrap();
        }

        let (_, _, responder) = expect_action(&mut product_rx).await.expect("Expected reserve of product_1");
        responder.send(Ok(ProductActionResult::Reserved { remaining: 8 })).unwrap();

        let (product_id, _, responder) = expect_action(&mut product_rx).await.expect("Expected reserve of product_2");
        assert_eq!(product_id, "product_2");
        responder.send(Err(FrameworkError::Rejected("Insufficient stock".into()))).unwrap();

        // The client looks again to explain the refusal
        let (_, responder) = expect_get(&mut product_rx).await.expect("Expected Product re-check");
        responder.send(Ok(Some(approved_product("product_2", 5_000, 1)))).unwrap();

        // Compensation for the first line
        let (product_id, action, responder) = expect_action(&mut product_rx).await.expect("Expected release");
        assert_eq!(product_id, "product_1");
        assert!(matches!(action, ProductAction::ReleaseStock(2)));
        responder.send(Ok(ProductActionResult::Released { stock: 10 })).unwrap();

        let result = order_task.await.unwrap();
        assert!(matches!(result, Err(OrderError::InsufficientStock(_))), "{result:?}");
        drop(order_rx);
    }

    // =========================================================================
    // Whole-system scenarios
    // =========================================================================

    struct Market {
        system: MarketplaceSystem,
        admin: Caller,
        _dir: tempfile::TempDir,
    }

    fn market() -> Market {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            duplicates: DuplicateCacheConfig::new(dir.path().join("fingerprints.json")),
            ..Default::default()
        };
        Market {
            system: MarketplaceSystem::new(config).unwrap(),
            admin: Caller::admin("user_admin"),
            _dir: dir,
        }
    }

    impl Market {
        async fn customer(&self, name: &str) -> Caller {
            let id = self
                .system
                .user_client
                .create_user(UserCreate::new(name, format!("{}@buyers.ke", name.to_lowercase()), Role::Customer))
                .await
                .unwrap();
            Caller::customer(id)
        }

        async fn vendor(&self, farm: &str, approve: bool) -> Caller {
            let user_id = self
                .system
                .user_client
                .create_user(UserCreate::new(farm, format!("{}@farms.ke", farm.to_lowercase()), Role::Vendor))
                .await
                .unwrap();
            let vendor_id = self
                .system
                .vendor_client
                .apply(&Caller::customer(user_id.clone()), VendorCreate {
                    user_id: user_id.clone(),
                    farm_name: format!("{farm} Farm"),
                    location: "Nakuru".into(),
                    phone: "0733000444".into(),
                    description: String::new(),
                })
                .await
                .unwrap();
            if approve {
                self.system.vendor_client.review(&self.admin, vendor_id.clone(), VendorReview::Approve).await.unwrap();
            }
            Caller::vendor(user_id, vendor_id)
        }

        async fn list(&self, vendor: &Caller, name: &str, description: &str, stock: u32) -> (String, ProductStatus) {
            let outcome = self
                .system
                .listing_client
                .submit(
                    vendor,
                    ProductSubmission {
                        name: name.into(),
                        category: ProductCategory::LiveBirds,
                        description: description.into(),
                        price_cents: 120_000,
                        stock,
                        images: vec![],
                    },
                )
                .await
                .unwrap();
            (outcome.product_id, outcome.status)
        }

        async fn order(&self, buyer: &Caller, product_id: &str, quantity: u32) -> Result<Order, OrderError> {
            self.system
                .order_client
                .place_order(
                    buyer,
                    OrderPlacement {
                        buyer_id: buyer.user_id().to_string(),
                        lines: vec![OrderLine::new(product_id, quantity)],
                        shipping: shipping(),
                        payment_method: PaymentMethod::Mpesa,
                    },
                )
                .await
        }
    }

    const HENS: &str = "Healthy free range kienyeji hens, vaccinated and ready to lay.";

    #[tokio::test]
    async fn test_marketplace_end_to_end() {
        let m = market();
        let buyer = m.customer("Akinyi").await;
        let farmer = m.vendor("Kiprono", true).await;
        let vendor_id = farmer.vendor_id().unwrap().to_string();

        let (product_id, status) = m.list(&farmer, "Kienyeji hens", HENS, 5).await;
        assert_eq!(status, ProductStatus::Approved);

        let order = m.order(&buyer, &product_id, 3).await.unwrap();
        assert_eq!(order.total_cents, 360_000);
        assert_eq!(order.total_cents, order.items.iter().map(|i| i.line_total_cents).sum::<u64>());
        assert_eq!(m.system.product_client.check_stock(product_id.clone()).await.unwrap(), 2);

        for status in [OrderStatus::Confirmed, OrderStatus::Processing, OrderStatus::Shipped, OrderStatus::Delivered] {
            m.system.order_client.update_status(&farmer, order.id.clone(), status).await.unwrap();
        }
        let err = m
            .system
            .order_client
            .update_status(&m.admin, order.id.clone(), OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::InvalidTransition { from: OrderStatus::Delivered, to: OrderStatus::Delivered });

        let record = m.system.commission_client.get_for_order(order.id.clone()).await.unwrap().unwrap();
        assert_eq!(record.commission.platform_cents, 36_000);
        assert_eq!(record.commission.platform_cents + record.commission.vendor_cents, order.total_cents);
        assert_eq!(m.system.commission_client.summary().await.unwrap().orders, 1);

        let overview = m.system.analytics_client.platform_overview(&m.admin).await.unwrap();
        assert_eq!(overview.users_by_role.get("customer"), Some(&1));
        assert_eq!(overview.orders_by_status.get("delivered"), Some(&1));
        assert_eq!(overview.gross_merchandise_cents, 360_000);
        assert_eq!(overview.platform_commission_cents, 36_000);
        assert_eq!(overview.revenue_by_month.values().sum::<u64>(), 360_000);
        assert_eq!(overview.top_vendors[0].net_cents, 324_000);
        assert_eq!(overview.top_products[0].units_sold, 3);
        assert!(m.system.analytics_client.platform_overview(&buyer).await.is_err());

        let dashboard = m.system.analytics_client.vendor_dashboard(&farmer, vendor_id.clone()).await.unwrap();
        assert_eq!(dashboard.low_stock.len(), 1);
        assert_eq!(dashboard.units_sold, 3);
        assert_eq!(dashboard.pending_earnings_cents, 324_000);

        assert_eq!(m.system.commission_client.mark_vendor_paid(vendor_id.clone()).await.unwrap(), 324_000);
        let dashboard = m.system.analytics_client.vendor_dashboard(&farmer, vendor_id).await.unwrap();
        assert_eq!(dashboard.pending_earnings_cents, 0);
        assert_eq!(dashboard.paid_earnings_cents, 324_000);

        // placed + four status changes
        assert_eq!(m.system.notification_client.unread_count(buyer.user_id().to_string()).await.unwrap(), 5);

        m.system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancellation_restores_stock_and_visibility_is_enforced() {
        let m = market();
        let buyer = m.customer("Wanjiru").await;
        let farmer = m.vendor("Mutua", true).await;
        let rival = m.vendor("Chebet", true).await;
        let (product_id, _) = m.list(&farmer, "Kienyeji hens", HENS, 10).await;

        let first = m.order(&buyer, &product_id, 4).await.unwrap();
        assert_eq!(m.system.product_client.check_stock(product_id.clone()).await.unwrap(), 6);
        assert!(matches!(
            m.system.order_client.update_status(&buyer, first.id.clone(), OrderStatus::Confirmed).await,
            Err(OrderError::Forbidden(_))
        ));
        m.system.order_client.update_status(&buyer, first.id.clone(), OrderStatus::Cancelled).await.unwrap();
        assert_eq!(m.system.product_client.check_stock(product_id.clone()).await.unwrap(), 10);

        let second = m.order(&buyer, &product_id, 2).await.unwrap();
        m.system.order_client.update_status(&farmer, second.id.clone(), OrderStatus::Confirmed).await.unwrap();
        assert!(matches!(
            m.system.order_client.update_status(&buyer, second.id.clone(), OrderStatus::Cancelled).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            m.system.order_client.update_status(&rival, second.id.clone(), OrderStatus::Cancelled).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            m.system.order_client.get_order(&rival, second.id.clone()).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(m.system.order_client.orders_for_caller(&rival).await.unwrap().is_empty());

        let mine = m.system.order_client.orders_for_caller(&buyer).await.unwrap();
        assert_eq!(mine.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(), vec![second.id.as_str(), first.id.as_str()]);

        m.system.order_client.update_status(&m.admin, second.id.clone(), OrderStatus::Cancelled).await.unwrap();
        assert_eq!(m.system.product_client.check_stock(product_id.clone()).await.unwrap(), 10);
        assert!(m.system.commission_client.get_for_order(second.id).await.unwrap().is_none());

        let err = m.order(&buyer, &product_id, 50).await.unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(_)));
        assert_eq!(m.system.product_client.check_stock(product_id.clone()).await.unwrap(), 10);

        let someone_else = m.customer("Otieno").await;
        let placement = OrderPlacement {
            buyer_id: someone_else.user_id().to_string(),
            lines: vec![OrderLine::new(product_id, 1)],
            shipping: shipping(),
            payment_method: PaymentMethod::Card,
        };
        assert!(matches!(
            m.system.order_client.place_order(&buyer, placement).await,
            Err(OrderError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_moderation_gate() {
        let m = market();
        let farmer = m.vendor("Njoroge", true).await;
        let rival = m.vendor("Atieno", true).await;
        let newcomer = m.vendor("Kilonzo", false).await;
        let buyer = m.customer("Baraka").await;

        let (original, status) = m.list(&farmer, "Kienyeji hens", HENS, 10).await;
        assert_eq!(status, ProductStatus::Approved);

        let (_, status) = m.list(&farmer, "Layer vaccine", "Counterfeit Newcastle vaccine at half price", 10).await;
        assert_eq!(status, ProductStatus::Rejected);

        let (held, status) = m.list(&farmer, "Broiler chicks", "Day old broiler chicks, call 0712345678 to order", 10).await;
        assert_eq!(status, ProductStatus::Pending);
        assert!(matches!(m.order(&buyer, &held, 1).await, Err(OrderError::InvalidProduct(_))));

        let (_, status) = m.list(&farmer, "Kienyeji hens", HENS, 10).await;
        assert_eq!(status, ProductStatus::Rejected);
        let (_, status) = m.list(&rival, "Kienyeji Hens!", HENS, 10).await;
        assert_eq!(status, ProductStatus::Pending);

        let submission = ProductSubmission {
            name: "Quails".into(),
            category: ProductCategory::LiveBirds,
            description: "Japanese quails".into(),
            price_cents: 30_000,
            stock: 5,
            images: vec![],
        };
        assert!(matches!(
            m.system.listing_client.submit(&newcomer, submission.clone()).await,
            Err(ListingError::VendorNotApproved(_))
        ));
        assert!(matches!(
            m.system.listing_client.submit(&buyer, submission).await,
            Err(ListingError::Forbidden(_))
        ));

        let approved = m.system.listing_client.moderate(&m.admin, held.clone(), true, None).await.unwrap();
        assert_eq!(approved.status, ProductStatus::Approved);
        assert!(m.order(&buyer, &held, 1).await.is_ok());
        assert!(matches!(
            m.system.listing_client.moderate(&farmer, held, false, None).await,
            Err(ListingError::Forbidden(_))
        ));

        let before = m.system.duplicate_client.entry_count().await.unwrap();
        assert!(matches!(
            m.system.listing_client.remove(&rival, original.clone()).await,
            Err(ListingError::Forbidden(_))
        ));
        m.system.listing_client.remove(&farmer, original.clone()).await.unwrap();
        assert_eq!(m.system.duplicate_client.entry_count().await.unwrap(), before - 1);
        assert_eq!(m.system.product_client.get_product(original).await.unwrap(), None);

        let browse = m.system.product_client.browse(None, None).await.unwrap();
        assert!(browse.iter().all(|p| p.status == ProductStatus::Approved));
    }

    #[tokio::test]
    async fn test_revised_listings_are_reviewed_again() {
        let m = market();
        let farmer = m.vendor("Wekesa", true).await;
        let (hens, _) = m.list(&farmer, "Kienyeji hens", HENS, 10).await;
        let (feed, status) =
            m.list(&farmer, "Broiler finisher feed", "Quality broiler finisher feed in 50kg bags, fresh stock.", 10).await;
        assert_eq!(status, ProductStatus::Approved);
        assert_eq!(m.system.duplicate_client.entry_count().await.unwrap(), 2);

        // stock-only edits keep the review outcome
        let restocked = m
            .system
            .listing_client
            .revise(&farmer, hens.clone(), ProductPatch { stock: Some(25), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(restocked.status, ProductStatus::Approved);
        assert_eq!(restocked.stock, 25);

        // the listing must not match its own fingerprint
        let edited = m
            .system
            .listing_client
            .revise(
                &farmer,
                hens.clone(),
                ProductPatch {
                    description: Some("Healthy free range kienyeji hens, dewormed and laying daily.".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.status, ProductStatus::Approved);
        assert_eq!(edited.description, "Healthy free range kienyeji hens, dewormed and laying daily.");

        let blanked = m
            .system
            .listing_client
            .revise(&farmer, hens.clone(), ProductPatch { description: Some("   ".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(blanked.status, ProductStatus::Approved);
        assert!(blanked.description.starts_with("Kienyeji hens."), "{}", blanked.description);
        assert!(blanked.description.contains("Nakuru"));
        let stored = m.system.product_client.require_product(hens.clone()).await.unwrap();
        assert_eq!(stored.description, blanked.description);
        assert_eq!(m.system.duplicate_client.entry_count().await.unwrap(), 2);

        // turning the feed listing into a copy of the hens listing
        let copied = m
            .system
            .listing_client
            .revise(
                &farmer,
                feed.clone(),
                ProductPatch {
                    name: Some("Kienyeji hens".into()),
                    description: Some(stored.description.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(copied.status, ProductStatus::Rejected);
        assert!(copied.moderation_notes.iter().any(|note| note.contains(&hens)), "{:?}", copied.moderation_notes);
        assert_eq!(m.system.duplicate_client.entry_count().await.unwrap(), 1);

        let rival = m.vendor("Cherono", true).await;
        assert!(matches!(
            m.system
                .listing_client
                .revise(&rival, hens, ProductPatch { stock: Some(1), ..Default::default() })
                .await,
            Err(ListingError::Product(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_order_totals_are_refused() {
        let m = market();
        let buyer = m.customer("Moraa").await;
        let farmer = m.vendor("Langat", true).await;
        let (hens, _) = m.list(&farmer, "Kienyeji hens", HENS, 10).await;
        let prize = m
            .system
            .listing_client
            .submit(
                &farmer,
                ProductSubmission {
                    name: "Show cockerel".into(),
                    category: ProductCategory::LiveBirds,
                    description: "Champion kienyeji cockerel from a prize winning line.".into(),
                    price_cents: u64::MAX / 2,
                    stock: 5,
                    images: vec![],
                },
            )
            .await
            .unwrap();
        assert_eq!(prize.status, ProductStatus::Approved);

        let err = m.order(&buyer, &prize.product_id, 3).await.unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)), "{err:?}");

        let placement = OrderPlacement {
            buyer_id: buyer.user_id().to_string(),
            lines: vec![OrderLine::new(prize.product_id.clone(), 2), OrderLine::new(hens.clone(), 1)],
            shipping: shipping(),
            payment_method: PaymentMethod::Mpesa,
        };
        let err = m.system.order_client.place_order(&buyer, placement).await.unwrap_err();
        assert_eq!(err, OrderError::ValidationError("Order total is too large".to_string()));

        assert_eq!(m.system.product_client.check_stock(prize.product_id).await.unwrap(), 5);
        assert_eq!(m.system.product_client.check_stock(hens).await.unwrap(), 10);
        assert!(m.system.order_client.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vendor_applications_are_filed_by_the_applicant() {
        let m = market();
        let user_id = m
            .system
            .user_client
            .create_user(UserCreate::new("Ouma", "ouma@farms.ke", Role::Vendor))
            .await
            .unwrap();
        let application = VendorCreate {
            user_id: user_id.clone(),
            farm_name: "Ouma Farm".into(),
            location: "Siaya".into(),
            phone: "0700111222".into(),
            description: String::new(),
        };
        let stranger = m.customer("Nafula").await;
        assert!(matches!(
            m.system.vendor_client.apply(&stranger, application.clone()).await,
            Err(VendorError::Forbidden(_))
        ));
        assert!(m.system.vendor_client.vendor_for_user(user_id.clone()).await.unwrap().is_none());
        assert!(m.system.vendor_client.apply(&Caller::customer(user_id), application).await.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_with_closed_resource_client_is_clean() {
        let m = market();
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let orphan: ResourceClient<User> = ResourceClient::new(sender);
        assert_eq!(orphan.list().await.unwrap_err(), FrameworkError::ActorClosed);
        m.system.shutdown().await.unwrap();
    }
}
