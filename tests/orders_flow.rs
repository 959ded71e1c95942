use chrono::{Duration, Utc};
use futures::future::join_all;
use restaurant_ordering_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        analytics::SalesPeriod,
        cashflow::CreateCashFlowRequest,
        inventory::StockUpdateRequest,
        menu::{CreateCategoryRequest, CreateMenuItemRequest, UpdateMenuItemRequest},
        orders::{CreateOrderItemRequest, CreateOrderRequest, UpdateOrderStatusRequest, UpdatePaymentRequest},
        tables::CreateTableRequest,
    },
    effects::MAX_AMOUNT,
    entity::{
        cash_flows::{Column as CashFlowCol, Entity as CashFlows, FlowType},
        menu_items::Entity as MenuItems,
        orders::{Column as OrderCol, Entity as Orders, OrderStatus, PaymentStatus},
        restaurant_tables::{ActiveModel as TableActive, Entity as RestaurantTables},
        restaurants::ActiveModel as RestaurantActive,
        stock_movements::{Column as MovementCol, Entity as StockMovements, MovementType},
    },
    error::AppError,
    models::Order,
    realtime::{ServerEvent, Topic},
    routes::params::{AnalyticsQuery, CashFlowQuery, RestaurantOrderQuery, StockMovementQuery},
    services::{
        analytics_service, cashflow_service, inventory_service, menu_service, order_service,
        query_service, table_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// One isolated restaurant per test so tests can share a database and run in parallel.
struct Fixture {
    state: AppState,
    restaurant_id: Uuid,
    table_id: Uuid,
    nasi_goreng: Uuid,
    es_teh: Uuid,
    sold_out: Uuid,
}

async fn setup() -> anyhow::Result<Option<Fixture>> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run order flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    MIGRATED
        .get_or_try_init(|| async { run_migrations(&pool).await })
        .await?;
    let state = AppState::new(pool, AppConfig::with_database_url(&database_url));

    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        name: Set("Warung Makan Sederhana".into()),
        description: Set(None),
        address: Set(None),
        phone: Set(None),
        logo: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let category = menu_service::create_category(
        &state,
        CreateCategoryRequest {
            restaurant_id: restaurant.id,
            name: "Makanan Utama".into(),
            description: None,
            sort_order: Some(1),
        },
    )
    .await?
    .data
    .unwrap();

    let nasi_goreng = create_item(&state, restaurant.id, category.id, "Nasi Goreng", dec!(30000), 50).await?;
    let es_teh = create_item(&state, restaurant.id, category.id, "Es Teh", dec!(5000), 1).await?;
    let sold_out = create_item(&state, restaurant.id, category.id, "Sate", dec!(45000), 10).await?;
    menu_service::delete_menu_item(&state, sold_out).await?;

    let table = table_service::create_table(
        &state,
        CreateTableRequest {
            restaurant_id: restaurant.id,
            table_number: "5".into(),
        },
    )
    .await?
    .data
    .unwrap();

    Ok(Some(Fixture {
        state,
        restaurant_id: restaurant.id,
        table_id: table.id,
        nasi_goreng,
        es_teh,
        sold_out,
    }))
}

async fn create_item(
    state: &AppState,
    restaurant_id: Uuid,
    category_id: Uuid,
    name: &str,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let item = menu_service::create_menu_item(
        state,
        CreateMenuItemRequest {
            restaurant_id,
            category_id,
            name: name.into(),
            description: None,
            price,
            image: None,
            sort_order: None,
            stock_quantity: Some(stock),
            min_stock_alert: Some(5),
            unit: Some("porsi".into()),
        },
    )
    .await?
    .data
    .unwrap();
    Ok(item.id)
}

async fn place(fx: &Fixture, lines: &[(Uuid, i32)]) -> Result<Order, AppError> {
    let resp = order_service::create_order(
        &fx.state,
        CreateOrderRequest {
            table_id: fx.table_id,
            items: lines
                .iter()
                .map(|(menu_item_id, quantity)| CreateOrderItemRequest {
                    menu_item_id: *menu_item_id,
                    quantity: *quantity,
                    notes: None,
                })
                .collect(),
            notes: None,
            customer_name: Some("Budi".into()),
        },
    )
    .await?;
    Ok(resp.data.unwrap())
}

async fn set_status(fx: &Fixture, id: Uuid, status: OrderStatus) -> Result<Order, AppError> {
    let resp =
        order_service::update_status(&fx.state, id, UpdateOrderStatusRequest { status }).await?;
    Ok(resp.data.unwrap())
}

async fn set_payment(fx: &Fixture, id: Uuid, payment_status: PaymentStatus) -> Result<Order, AppError> {
    let resp = order_service::update_payment(
        &fx.state,
        id,
        UpdatePaymentRequest {
            payment_status,
            payment_method: Some("CASH".into()),
            payment_id: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap())
}

async fn stock_of(fx: &Fixture, id: Uuid) -> anyhow::Result<i32> {
    let item = MenuItems::find_by_id(id).one(&fx.state.orm).await?.unwrap();
    Ok(item.stock_quantity)
}

#[tokio::test]
async fn nasi_goreng_order_lifecycle() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let mut kitchen = fx.state.hub.connect();
    let mut table_screen = fx.state.hub.connect();
    fx.state.hub.join(kitchen.id, Topic::Kitchen(fx.restaurant_id));
    fx.state.hub.join(table_screen.id, Topic::Table(fx.table_id));

    let order = place(&fx, &[(fx.nasi_goreng, 2)]).await?;
    assert_eq!(order.total_amount, dec!(60000));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.restaurant_id, fx.restaurant_id);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].subtotal, dec!(60000));
    assert_eq!(order.table.as_ref().map(|t| t.table_number.as_str()), Some("5"));
    assert!(order.order_number.starts_with("ORD-"));

    assert!(matches!(kitchen.receiver.try_recv(), Ok(ServerEvent::NewOrder(o)) if o.id == order.id));
    assert!(matches!(table_screen.receiver.try_recv(), Ok(ServerEvent::OrderCreated(_))));

    let mut tracker = fx.state.hub.connect();
    fx.state.hub.join(tracker.id, Topic::Order(order.id));

    let confirmed = set_status(&fx, order.id, OrderStatus::Confirmed).await?;
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 48);

    let movements = StockMovements::find()
        .filter(MovementCol::OrderId.eq(order.id))
        .all(&fx.state.orm)
        .await?;
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].movement_type, MovementType::Out);
    assert_eq!(movements[0].quantity, 2);
    assert_eq!(movements[0].previous_stock, 50);
    assert_eq!(movements[0].new_stock, 48);

    match tracker.receiver.try_recv() {
        Ok(ServerEvent::OrderStatusUpdated { order_id, status }) => {
            assert_eq!(order_id, order.id);
            assert_eq!(status, OrderStatus::Confirmed);
        }
        other => panic!("Expected OrderStatusUpdated, got {other:?}"),
    }
    assert!(matches!(kitchen.receiver.try_recv(), Ok(ServerEvent::OrderUpdated(_))));

    // Confirming again is a no-op: no second decrement, no second push.
    set_status(&fx, order.id, OrderStatus::Confirmed).await?;
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 48);
    let count = StockMovements::find()
        .filter(MovementCol::OrderId.eq(order.id))
        .count(&fx.state.orm)
        .await?;
    assert_eq!(count, 1);
    assert!(tracker.receiver.try_recv().is_err());

    let paid = set_payment(&fx, order.id, PaymentStatus::Paid).await?;
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert_eq!(paid.payment_method.as_deref(), Some("CASH"));
    set_payment(&fx, order.id, PaymentStatus::Paid).await?;

    let income = CashFlows::find()
        .filter(CashFlowCol::OrderId.eq(order.id))
        .all(&fx.state.orm)
        .await?;
    assert_eq!(income.len(), 1);
    assert_eq!(income[0].flow_type, FlowType::Income);
    assert_eq!(income[0].amount, dec!(60000));
    assert_eq!(income[0].category, "Sales");

    Ok(())
}

#[tokio::test]
async fn unavailable_item_fails_and_persists_nothing() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let err = place(&fx, &[(fx.nasi_goreng, 1), (fx.sold_out, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ItemUnavailable(id) if id == fx.sold_out));

    let err = place(&fx, &[(Uuid::new_v4(), 1)]).await.unwrap_err();
    assert!(matches!(err, AppError::ItemUnavailable(_)));

    let orders = Orders::find()
        .filter(OrderCol::TableId.eq(fx.table_id))
        .count(&fx.state.orm)
        .await?;
    assert_eq!(orders, 0);

    let err = place(&fx, &[]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn missing_table_or_order_is_not_found() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let err = order_service::create_order(
        &fx.state,
        CreateOrderRequest {
            table_id: Uuid::new_v4(),
            items: vec![CreateOrderItemRequest {
                menu_item_id: fx.nasi_goreng,
                quantity: 1,
                notes: None,
            }],
            notes: None,
            customer_name: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Table")));

    let err = order_service::get_order(&fx.state, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Order")));

    let err = set_status(&fx, Uuid::new_v4(), OrderStatus::Confirmed).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Order")));

    Ok(())
}

#[tokio::test]
async fn total_uses_price_snapshot() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let order = place(&fx, &[(fx.nasi_goreng, 2), (fx.es_teh, 1)]).await?;
    assert_eq!(order.total_amount, dec!(65000));

    menu_service::update_menu_item(
        &fx.state,
        fx.nasi_goreng,
        UpdateMenuItemRequest {
            price: Some(dec!(35000)),
            ..Default::default()
        },
    )
    .await?;

    let reloaded = order_service::get_order(&fx.state, order.id).await?.data.unwrap();
    assert_eq!(reloaded.total_amount, dec!(65000));
    let line_sum: Decimal = reloaded.items.iter().map(|line| line.subtotal).sum();
    assert_eq!(line_sum, reloaded.total_amount);
    assert!(reloaded.restaurant.is_some());

    Ok(())
}

#[tokio::test]
async fn kitchen_queue_is_confirmed_and_preparing_oldest_first() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let first = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    let waiting = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    let third = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    let served = place(&fx, &[(fx.nasi_goreng, 1)]).await?;

    set_status(&fx, first.id, OrderStatus::Confirmed).await?;
    set_status(&fx, first.id, OrderStatus::Preparing).await?;
    set_status(&fx, third.id, OrderStatus::Confirmed).await?;
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
    ] {
        set_status(&fx, served.id, status).await?;
    }

    let queue = query_service::kitchen_queue(&fx.state, fx.restaurant_id)
        .await?
        .data
        .unwrap()
        .items;
    let ids: Vec<Uuid> = queue.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![first.id, third.id]);
    assert!(!ids.contains(&waiting.id));
    assert!(queue.iter().all(|o| o.table.is_some() && !o.items.is_empty()));

    let listing = query_service::list_restaurant_orders(
        &fx.state,
        fx.restaurant_id,
        RestaurantOrderQuery {
            status: Some("ALL".into()),
            payment_status: Some("ALL".into()),
            limit: Some(3),
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].id, served.id, "listing is newest first");

    let pending_only = query_service::list_restaurant_orders(
        &fx.state,
        fx.restaurant_id,
        RestaurantOrderQuery {
            status: Some("PENDING".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(pending_only.len(), 1);
    assert_eq!(pending_only[0].id, waiting.id);

    let history = query_service::table_history(&fx.state, fx.table_id)
        .await?
        .data
        .unwrap()
        .items;
    assert_eq!(history.len(), 4);
    assert_eq!(history.last().map(|o| o.id), Some(first.id));

    Ok(())
}

#[tokio::test]
async fn disallowed_transitions_and_cancellation() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let order = place(&fx, &[(fx.nasi_goreng, 3)]).await?;
    let err = set_status(&fx, order.id, OrderStatus::Served).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition { from: OrderStatus::Pending, to: OrderStatus::Served }
    ));

    set_status(&fx, order.id, OrderStatus::Confirmed).await?;
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 47);

    let cancelled = set_status(&fx, order.id, OrderStatus::Cancelled).await?;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 50);

    let restore = StockMovements::find()
        .filter(MovementCol::OrderId.eq(order.id))
        .filter(MovementCol::MovementType.eq(MovementType::In))
        .all(&fx.state.orm)
        .await?;
    assert_eq!(restore.len(), 1);
    assert_eq!(restore[0].previous_stock + restore[0].quantity, restore[0].new_stock);

    let err = set_status(&fx, order.id, OrderStatus::Pending).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    // Cancelling before confirmation has nothing to give back.
    let early = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    set_status(&fx, early.id, OrderStatus::Cancelled).await?;
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 50);

    Ok(())
}

#[tokio::test]
async fn insufficient_stock_rolls_back_confirmation() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let order = place(&fx, &[(fx.nasi_goreng, 2), (fx.es_teh, 2)]).await?;
    let err = set_status(&fx, order.id, OrderStatus::Confirmed).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock { available: 1, requested: 2, .. }
    ));

    let reloaded = order_service::get_order(&fx.state, order.id).await?.data.unwrap();
    assert_eq!(reloaded.status, OrderStatus::Pending);
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 50);
    assert_eq!(stock_of(&fx, fx.es_teh).await?, 1);
    let count = StockMovements::find()
        .filter(MovementCol::OrderId.eq(order.id))
        .count(&fx.state.orm)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn payment_and_order_status_are_independent() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let mut tracker = fx.state.hub.connect();

    // Pay before service.
    let prepaid = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    fx.state.hub.join(tracker.id, Topic::Order(prepaid.id));
    let paid = set_payment(&fx, prepaid.id, PaymentStatus::Paid).await?;
    assert_eq!(paid.status, OrderStatus::Pending);
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert!(matches!(
        tracker.receiver.try_recv(),
        Ok(ServerEvent::OrderPaymentUpdated { payment_status: PaymentStatus::Paid, .. })
    ));

    // Serve before payment.
    let postpaid = place(&fx, &[(fx.nasi_goreng, 1)]).await?;
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
    ] {
        set_status(&fx, postpaid.id, status).await?;
    }
    let failed = set_payment(&fx, postpaid.id, PaymentStatus::Failed).await?;
    assert_eq!(failed.status, OrderStatus::Served);
    let retried = set_payment(&fx, postpaid.id, PaymentStatus::Paid).await?;
    assert_eq!(retried.payment_status, PaymentStatus::Paid);

    let err = set_payment(&fx, prepaid.id, PaymentStatus::Pending).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidPaymentTransition { .. }));

    let refunded = set_payment(&fx, prepaid.id, PaymentStatus::Refunded).await?;
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
    let entries = CashFlows::find()
        .filter(CashFlowCol::OrderId.eq(prepaid.id))
        .all(&fx.state.orm)
        .await?;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.flow_type == FlowType::Expense && e.amount == dec!(30000)));

    Ok(())
}

#[tokio::test]
async fn concurrent_confirmations_take_stock_once() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let order = place(&fx, &[(fx.nasi_goreng, 2)]).await?;
    let results = join_all((0..8).map(|_| set_status(&fx, order.id, OrderStatus::Confirmed))).await;
    for result in results {
        assert_eq!(result?.status, OrderStatus::Confirmed);
    }

    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 48);
    let count = StockMovements::find()
        .filter(MovementCol::OrderId.eq(order.id))
        .count(&fx.state.orm)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn oversized_orders_are_rejected_before_any_write() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let err = place(&fx, &[(fx.nasi_goreng, 400_000)]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let category = menu_service::create_category(
        &fx.state,
        CreateCategoryRequest {
            restaurant_id: fx.restaurant_id,
            name: "Katering".into(),
            description: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    let banquet = create_item(&fx.state, fx.restaurant_id, category.id, "Tumpeng", MAX_AMOUNT, 10).await?;

    let err = place(&fx, &[(banquet, 2)]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("order total")));
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let orders = Orders::find()
        .filter(OrderCol::TableId.eq(fx.table_id))
        .count(&fx.state.orm)
        .await?;
    assert_eq!(orders, 0);

    let err = create_item(
        &fx.state,
        fx.restaurant_id,
        category.id,
        "Tumpeng Emas",
        MAX_AMOUNT + dec!(1),
        1,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::BadRequest(_))
    ));

    Ok(())
}

#[tokio::test]
async fn tables_reject_duplicates_and_inactive_scans() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let create = |number: &str| {
        table_service::create_table(
            &fx.state,
            CreateTableRequest {
                restaurant_id: fx.restaurant_id,
                table_number: number.to_string(),
            },
        )
    };

    let results = join_all((0..8).map(|_| create("77"))).await;
    let created = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);

    let err = create("5").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let scanned = table_service::scan_table(&fx.state, fx.restaurant_id, "5")
        .await?
        .data
        .unwrap();
    assert_eq!(scanned.table.id, fx.table_id);
    assert_eq!(scanned.restaurant.id, fx.restaurant_id);

    let mut table: TableActive = RestaurantTables::find_by_id(fx.table_id)
        .one(&fx.state.orm)
        .await?
        .unwrap()
        .into();
    table.is_active = Set(false);
    table.update(&fx.state.orm).await?;

    let err = table_service::scan_table(&fx.state, fx.restaurant_id, "5")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = table_service::scan_table(&fx.state, fx.restaurant_id, "404")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Table")));

    Ok(())
}

#[tokio::test]
async fn manual_stock_changes_are_recorded() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let adjust = |movement_type: MovementType, quantity: i32| {
        inventory_service::update_stock(
            &fx.state,
            fx.restaurant_id,
            StockUpdateRequest {
                menu_item_id: fx.nasi_goreng,
                movement_type,
                quantity,
                reason: None,
            },
        )
    };

    let out = adjust(MovementType::Out, 80).await?.data.unwrap();
    assert_eq!(out.menu_item.stock_quantity, 0);
    assert_eq!(out.movement.quantity, 80);
    assert_eq!(out.movement.previous_stock, 50);
    assert_eq!(out.movement.new_stock, 0);

    let status = inventory_service::stock_status(&fx.state, fx.restaurant_id)
        .await?
        .data
        .unwrap();
    assert_eq!(status.summary.total_items, 2, "unavailable items are not listed");
    assert_eq!(status.summary.out_of_stock_count, 1);
    assert_eq!(status.summary.low_stock_count, 2);
    assert_eq!(status.items[0].id, fx.nasi_goreng);
    assert_eq!(status.items[0].category.as_deref(), Some("Makanan Utama"));

    let adjusted = adjust(MovementType::Adjustment, 12).await?.data.unwrap();
    assert_eq!(adjusted.menu_item.stock_quantity, 12);
    let restocked = adjust(MovementType::In, 3).await?.data.unwrap();
    assert_eq!(restocked.menu_item.stock_quantity, 15);
    assert_eq!(stock_of(&fx, fx.nasi_goreng).await?, 15);

    let history = inventory_service::list_movements(
        &fx.state,
        fx.restaurant_id,
        StockMovementQuery {
            menu_item_id: Some(fx.nasi_goreng),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    let kinds: Vec<MovementType> = history.iter().map(|m| m.movement_type).collect();
    assert_eq!(
        kinds,
        vec![MovementType::In, MovementType::Adjustment, MovementType::Out]
    );
    assert!(history.iter().all(|m| m.menu_item_name.as_deref() == Some("Nasi Goreng")));

    let before = inventory_service::list_movements(
        &fx.state,
        fx.restaurant_id,
        StockMovementQuery {
            end_date: Some(Utc::now() - Duration::days(1)),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert!(before.is_empty());

    let err = adjust(MovementType::In, -1).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = inventory_service::update_stock(
        &fx.state,
        Uuid::new_v4(),
        StockUpdateRequest {
            menu_item_id: fx.nasi_goreng,
            movement_type: MovementType::In,
            quantity: 1,
            reason: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Menu item")));

    Ok(())
}

#[tokio::test]
async fn manual_cash_flow_entries_are_validated_and_paged() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let entry = |flow_type: FlowType, amount: Decimal, description: &str| {
        cashflow_service::add_entry(
            &fx.state,
            fx.restaurant_id,
            CreateCashFlowRequest {
                flow_type,
                amount,
                description: description.to_string(),
                category: "Operasional".into(),
            },
        )
    };

    let capital = entry(FlowType::Income, dec!(100000), "Modal awal").await?.data.unwrap();
    assert_eq!(capital.order_id, None);
    entry(FlowType::Expense, dec!(20000), "Gas LPG").await?;

    for err in [
        entry(FlowType::Expense, Decimal::ZERO, "Gas LPG").await.unwrap_err(),
        entry(FlowType::Expense, dec!(5000), "  ").await.unwrap_err(),
        entry(FlowType::Income, MAX_AMOUNT + dec!(1), "Hibah").await.unwrap_err(),
    ] {
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    let err = cashflow_service::add_entry(
        &fx.state,
        Uuid::new_v4(),
        CreateCashFlowRequest {
            flow_type: FlowType::Income,
            amount: dec!(1000),
            description: "Tip".into(),
            category: "Lainnya".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Restaurant")));

    let expenses = cashflow_service::list_cash_flows(
        &fx.state,
        fx.restaurant_id,
        CashFlowQuery {
            flow_type: Some(FlowType::Expense),
            ..Default::default()
        },
    )
    .await?;
    let items = expenses.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].amount, dec!(20000));

    let first_page = cashflow_service::list_cash_flows(
        &fx.state,
        fx.restaurant_id,
        CashFlowQuery {
            page: Some(1),
            per_page: Some(1),
            ..Default::default()
        },
    )
    .await?;
    let meta = first_page.meta.unwrap();
    assert_eq!(meta.total, Some(2));
    let newest = first_page.data.unwrap().items;
    assert_eq!(newest.len(), 1);
    assert_eq!(newest[0].description, "Gas LPG");

    Ok(())
}

#[tokio::test]
async fn analytics_counts_paid_orders_only() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    let dinner = place(&fx, &[(fx.nasi_goreng, 2)]).await?;
    let drink = place(&fx, &[(fx.es_teh, 1)]).await?;
    place(&fx, &[(fx.nasi_goreng, 5)]).await?;
    set_payment(&fx, dinner.id, PaymentStatus::Paid).await?;
    set_payment(&fx, drink.id, PaymentStatus::Paid).await?;

    cashflow_service::add_entry(
        &fx.state,
        fx.restaurant_id,
        CreateCashFlowRequest {
            flow_type: FlowType::Expense,
            amount: dec!(20000),
            description: "Belanja sayur".into(),
            category: "Bahan baku".into(),
        },
    )
    .await?;

    let report = analytics_service::restaurant_analytics(
        &fx.state,
        fx.restaurant_id,
        AnalyticsQuery {
            period: Some(SalesPeriod::Today),
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(report.today_revenue, dec!(65000));
    assert_eq!(report.today_orders, 2);
    assert_eq!(report.monthly_revenue, dec!(65000));
    assert_eq!(report.monthly_orders, 2);

    let top: Vec<(Uuid, i64, Decimal)> = report
        .top_menu_items
        .iter()
        .map(|item| (item.id, item.quantity, item.revenue))
        .collect();
    assert_eq!(
        top,
        vec![(fx.nasi_goreng, 2, dec!(60000)), (fx.es_teh, 1, dec!(5000))]
    );

    assert_eq!(report.sales.len(), 24);
    assert_eq!(report.interval_label, "Hourly");
    let series_total: Decimal = report.sales.iter().map(|point| point.revenue).sum();
    let series_orders: i64 = report.sales.iter().map(|point| point.orders).sum();
    assert_eq!(series_total, dec!(65000));
    assert_eq!(series_orders, 2);

    assert_eq!(report.cashflow.income, dec!(65000));
    assert_eq!(report.cashflow.expense, dec!(20000));
    assert_eq!(report.cashflow.net_income, dec!(45000));

    let low: Vec<Uuid> = report.low_stock_items.iter().map(|item| item.id).collect();
    assert_eq!(low, vec![fx.es_teh]);

    let err = analytics_service::restaurant_analytics(
        &fx.state,
        Uuid::new_v4(),
        AnalyticsQuery::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Restaurant")));

    Ok(())
}

#[tokio::test]
async fn migrations_are_recorded_and_rerun_safely() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };

    run_migrations(&fx.state.pool).await?;
    let versions: Vec<i64> =
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(&fx.state.pool)
            .await?;
    assert_eq!(versions.first(), Some(&1));

    Ok(())
}
