use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::inventory::{
        StockItem, StockMovementList, StockStatus, StockSummary, StockUpdateRequest, StockUpdateResult,
    },
    effects::{StockDelta, manual_movement},
    entity::{
        categories::Entity as Categories,
        menu_items::{Column as MenuCol, Entity as MenuItems},
        stock_movements::{
            ActiveModel as MovementActive, Column as MovementCol, Entity as StockMovements,
            Model as MovementModel,
        },
    },
    error::{AppError, AppResult},
    models::{menu_item_from_entity, stock_movement_from_entity},
    response::{ApiResponse, Meta},
    routes::params::StockMovementQuery,
    state::AppState,
};

const MOVEMENT_HISTORY_LIMIT: u64 = 100;

/// Write the new stock level and append the movement that explains it.
///
/// The caller must hold the menu item row lock inside the same transaction.
pub(crate) async fn apply_stock_delta<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: Uuid,
    order_id: Option<Uuid>,
    delta: &StockDelta,
) -> AppResult<MovementModel> {
    MenuItems::update_many()
        .col_expr(MenuCol::StockQuantity, Expr::value(delta.new_stock))
        .col_expr(
            MenuCol::UpdatedAt,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
        )
        .filter(MenuCol::Id.eq(delta.menu_item_id))
        .exec(conn)
        .await?;

    let movement = MovementActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        menu_item_id: Set(delta.menu_item_id),
        order_id: Set(order_id),
        movement_type: Set(delta.movement_type),
        quantity: Set(delta.quantity),
        previous_stock: Set(delta.previous_stock),
        new_stock: Set(delta.new_stock),
        reason: Set(Some(delta.reason.clone())),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        menu_item_id = %delta.menu_item_id,
        movement = %delta.movement_type,
        previous = delta.previous_stock,
        new = delta.new_stock,
        "stock movement recorded"
    );
    Ok(movement)
}

pub fn summarize_stock(items: &[StockItem]) -> StockSummary {
    StockSummary {
        total_items: items.len(),
        low_stock_count: items
            .iter()
            .filter(|item| item.stock_quantity <= item.min_stock_alert)
            .count(),
        out_of_stock_count: items.iter().filter(|item| item.stock_quantity == 0).count(),
    }
}

pub async fn stock_status(
    state: &AppState,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<StockStatus>> {
    let items: Vec<StockItem> = MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant_id))
        .filter(MenuCol::IsAvailable.eq(true))
        .order_by_asc(MenuCol::StockQuantity)
        .order_by_asc(MenuCol::Name)
        .find_also_related(Categories)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(item, category)| StockItem {
            id: item.id,
            name: item.name,
            stock_quantity: item.stock_quantity,
            min_stock_alert: item.min_stock_alert,
            unit: item.unit,
            category: category.map(|c| c.name),
        })
        .collect();

    let summary = summarize_stock(&items);
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", StockStatus { items, summary }, Some(meta)))
}

pub async fn update_stock(
    state: &AppState,
    restaurant_id: Uuid,
    payload: StockUpdateRequest,
) -> AppResult<ApiResponse<StockUpdateResult>> {
    let txn = state.orm.begin().await?;

    let item = MenuItems::find_by_id(payload.menu_item_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .filter(|item| item.restaurant_id == restaurant_id)
        .ok_or(AppError::NotFound("Menu item"))?;

    let delta = manual_movement(
        item.id,
        item.stock_quantity,
        payload.movement_type,
        payload.quantity,
        payload.reason,
    )?;
    let movement = apply_stock_delta(&txn, restaurant_id, None, &delta).await?;

    let item = MenuItems::find_by_id(item.id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;
    txn.commit().await?;

    tracing::info!(
        menu_item_id = %item.id,
        movement = %delta.movement_type,
        previous = delta.previous_stock,
        new = delta.new_stock,
        "stock updated"
    );

    let name = item.name.clone();
    Ok(ApiResponse::success(
        "Stock updated",
        StockUpdateResult {
            menu_item: menu_item_from_entity(item),
            movement: stock_movement_from_entity(movement, Some(name)),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_movements(
    state: &AppState,
    restaurant_id: Uuid,
    query: StockMovementQuery,
) -> AppResult<ApiResponse<StockMovementList>> {
    let mut condition = Condition::all().add(MovementCol::RestaurantId.eq(restaurant_id));
    if let Some(menu_item_id) = query.menu_item_id {
        condition = condition.add(MovementCol::MenuItemId.eq(menu_item_id));
    }
    if let Some(start) = query.start_date {
        condition = condition.add(MovementCol::CreatedAt.gte(start));
    }
    if let Some(end) = query.end_date {
        condition = condition.add(MovementCol::CreatedAt.lte(end));
    }

    let items: Vec<_> = StockMovements::find()
        .filter(condition)
        .order_by_desc(MovementCol::CreatedAt)
        .limit(MOVEMENT_HISTORY_LIMIT)
        .find_also_related(MenuItems)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(movement, item)| stock_movement_from_entity(movement, item.map(|i| i.name)))
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", StockMovementList { items }, Some(meta)))
}
