use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, UpdateOrderStatusRequest, UpdatePaymentRequest},
    effects::{self, order_total},
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems, Model as MenuItemModel},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Entity as Orders, Model as OrderModel, OrderStatus, PaymentStatus},
        restaurant_tables::{Column as TableCol, Entity as RestaurantTables},
        restaurants::{Column as RestaurantCol, Entity as Restaurants},
    },
    error::{AppError, AppResult},
    lifecycle::{LedgerEffect, PaymentChange, StatusChange, StockEffect, plan_payment_change, plan_status_change},
    models::{
        Order, line_item_from_entity, menu_item_summary, order_from_entity, restaurant_from_entity,
        table_from_entity,
    },
    realtime::fanout,
    response::{ApiResponse, Meta},
    services::{cashflow_service, inventory_service},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("order must contain at least one item".into()));
    }
    for line in &payload.items {
        effects::ensure_line_quantity(line.quantity)?;
    }

    let txn = state.orm.begin().await?;

    let table = RestaurantTables::find_by_id(payload.table_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Table"))?;

    let menu_ids: Vec<Uuid> = payload.items.iter().map(|line| line.menu_item_id).collect();
    let menu: HashMap<Uuid, MenuItemModel> = MenuItems::find()
        .filter(MenuCol::Id.is_in(menu_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mut priced = Vec::with_capacity(payload.items.len());
    for line in &payload.items {
        let item = menu
            .get(&line.menu_item_id)
            .filter(|item| item.is_available && item.restaurant_id == table.restaurant_id)
            .ok_or(AppError::ItemUnavailable(line.menu_item_id))?;
        priced.push((line, item.price));
    }

    let total = order_total(priced.iter().map(|(line, price)| (*price, line.quantity)));
    effects::ensure_storable_amount(total, "order total")?;
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(build_order_number(Utc::now())),
        restaurant_id: Set(table.restaurant_id),
        table_id: Set(table.id),
        total_amount: Set(total),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        payment_method: Set(None),
        payment_id: Set(None),
        notes: Set(payload.notes.clone()),
        customer_name: Set(payload.customer_name.clone()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (line, price) in &priced {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(line.menu_item_id),
            quantity: Set(line.quantity),
            price: Set(*price),
            notes: Set(line.notes.clone()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    let order = populate_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        table_id = %order.table_id,
        total = %order.total_amount,
        "order created"
    );
    fanout::notify_order_created(&state.hub, &order);

    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let order = populate_order(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = lock_order(&txn, id).await?;

    let (from, to, stock) = match plan_status_change(order.status, payload.status)? {
        StatusChange::Unchanged => {
            let order = populate_order(&txn, order).await?;
            txn.commit().await?;
            return Ok(ApiResponse::success("Order status unchanged", order, Some(Meta::empty())));
        }
        StatusChange::Apply { from, to, stock } => (from, to, stock),
    };

    if stock != StockEffect::None {
        apply_stock_effect(&txn, &order, stock).await?;
    }

    let mut active: OrderActive = order.into();
    active.status = Set(to);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    let order = populate_order(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_id = %order.id, %from, %to, "order status changed");
    fanout::notify_status_updated(&state.hub, &order);

    Ok(ApiResponse::success("Order status updated", order, Some(Meta::empty())))
}

pub async fn update_payment(
    state: &AppState,
    id: Uuid,
    payload: UpdatePaymentRequest,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = lock_order(&txn, id).await?;

    let change = plan_payment_change(order.payment_status, payload.payment_status)?;
    let details_supplied = payload.payment_method.is_some() || payload.payment_id.is_some();
    if change == PaymentChange::Unchanged && !details_supplied {
        let order = populate_order(&txn, order).await?;
        txn.commit().await?;
        return Ok(ApiResponse::success("Payment status unchanged", order, Some(Meta::empty())));
    }

    let draft = match change {
        PaymentChange::Apply { ledger: LedgerEffect::Income, .. } => {
            Some(effects::sales_income(&order.order_number, order.total_amount))
        }
        PaymentChange::Apply { ledger: LedgerEffect::Refund, .. } => {
            Some(effects::refund_expense(&order.order_number, order.total_amount))
        }
        _ => None,
    };
    if let Some(draft) = draft {
        cashflow_service::record_entry(&txn, order.restaurant_id, Some(order.id), draft).await?;
    }

    let mut active: OrderActive = order.into();
    if let Some(method) = payload.payment_method {
        active.payment_method = Set(Some(method));
    }
    if let Some(payment_id) = payload.payment_id {
        active.payment_id = Set(Some(payment_id));
    }
    if let PaymentChange::Apply { to, .. } = change {
        active.payment_status = Set(to);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    let order = populate_order(&txn, order).await?;
    txn.commit().await?;

    if let PaymentChange::Apply { from, to, .. } = change {
        tracing::info!(order_id = %order.id, %from, %to, "payment status changed");
        fanout::notify_payment_updated(&state.hub, &order);
    }

    Ok(ApiResponse::success("Payment updated", order, Some(Meta::empty())))
}

/// Load the order row with `FOR UPDATE`, serialising mutations of one order.
async fn lock_order(txn: &DatabaseTransaction, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound("Order"))
}

async fn apply_stock_effect(
    txn: &DatabaseTransaction,
    order: &OrderModel,
    effect: StockEffect,
) -> AppResult<()> {
    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(txn)
        .await?;

    let mut ids: Vec<Uuid> = lines.iter().map(|line| line.menu_item_id).collect();
    ids.sort();
    ids.dedup();

    // Lock in id order so two orders sharing items cannot deadlock.
    let mut stock: HashMap<Uuid, MenuItemModel> = MenuItems::find()
        .filter(MenuCol::Id.is_in(ids))
        .order_by_asc(MenuCol::Id)
        .lock(LockType::Update)
        .all(txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    for line in &lines {
        let item = stock
            .get_mut(&line.menu_item_id)
            .ok_or(AppError::NotFound("Menu item"))?;
        let delta = match effect {
            StockEffect::Consume => effects::consume_for_order(
                item.id,
                &item.name,
                item.stock_quantity,
                line.quantity,
                &order.order_number,
            )?,
            StockEffect::Restore => effects::restore_for_order(
                item.id,
                &item.name,
                item.stock_quantity,
                line.quantity,
                &order.order_number,
            ),
            StockEffect::None => continue,
        };
        item.stock_quantity = delta.new_stock;
        inventory_service::apply_stock_delta(txn, order.restaurant_id, Some(order.id), &delta)
            .await?;
    }

    Ok(())
}

/// Build the full aggregate: line items with menu summaries, table and restaurant.
pub(crate) async fn populate_order<C: ConnectionTrait>(conn: &C, order: OrderModel) -> AppResult<Order> {
    let mut populated = populate_orders(conn, vec![order]).await?;
    populated.pop().ok_or(AppError::NotFound("Order"))
}

/// Batch version of [`populate_order`], keeping the input order.
pub(crate) async fn populate_orders<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let table_ids: Vec<Uuid> = orders.iter().map(|o| o.table_id).collect();
    let restaurant_ids: Vec<Uuid> = orders.iter().map(|o| o.restaurant_id).collect();

    let mut lines_by_order: HashMap<Uuid, Vec<_>> = HashMap::new();
    for (line, item) in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::CreatedAt)
        .find_also_related(MenuItems)
        .all(conn)
        .await?
    {
        let summary = item.as_ref().map(menu_item_summary);
        lines_by_order
            .entry(line.order_id)
            .or_default()
            .push(line_item_from_entity(line, summary));
    }

    let tables: HashMap<Uuid, _> = RestaurantTables::find()
        .filter(TableCol::Id.is_in(table_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, table_from_entity(t)))
        .collect();

    let restaurants: HashMap<Uuid, _> = Restaurants::find()
        .filter(RestaurantCol::Id.is_in(restaurant_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| (r.id, restaurant_from_entity(r)))
        .collect();

    Ok(orders
        .into_iter()
        .map(|model| {
            let items = lines_by_order.remove(&model.id).unwrap_or_default();
            let table = tables.get(&model.table_id).cloned();
            let restaurant = restaurants.get(&model.restaurant_id).cloned();
            let mut order = order_from_entity(model, items);
            order.table = table;
            order.restaurant = restaurant;
            order
        })
        .collect())
}

/// `ORD-{unix millis}-{4 random uppercase alphanumerics}`.
pub fn build_order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("ORD-{}-{}", now.timestamp_millis(), suffix)
}
