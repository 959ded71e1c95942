use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::orders::OrderList,
    entity::orders::{Column as OrderCol, Entity as Orders, OrderStatus, PaymentStatus},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::{MAX_LIST_LIMIT, RestaurantOrderQuery, parse_filter},
    services::order_service::populate_orders,
    state::AppState,
};

/// Statuses the kitchen still has to work on.
pub const KITCHEN_STATUSES: [OrderStatus; 2] = [OrderStatus::Confirmed, OrderStatus::Preparing];

/// Orders waiting in the kitchen, oldest first.
pub async fn kitchen_queue(
    state: &AppState,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::RestaurantId.eq(restaurant_id))
        .filter(OrderCol::Status.is_in(KITCHEN_STATUSES))
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items = populate_orders(&state.orm, orders).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

pub async fn list_restaurant_orders(
    state: &AppState,
    restaurant_id: Uuid,
    query: RestaurantOrderQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let status: Option<OrderStatus> = parse_filter(query.status.as_deref(), "status")?;
    let payment_status: Option<PaymentStatus> =
        parse_filter(query.payment_status.as_deref(), "payment_status")?;
    let limit = effective_limit(query.limit, state.config.order_list_limit)?;

    let mut condition = Condition::all().add(OrderCol::RestaurantId.eq(restaurant_id));
    if let Some(status) = status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(payment_status) = payment_status {
        condition = condition.add(OrderCol::PaymentStatus.eq(payment_status));
    }

    let orders = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?;

    let items = populate_orders(&state.orm, orders).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

pub async fn table_history(state: &AppState, table_id: Uuid) -> AppResult<ApiResponse<OrderList>> {
    let orders = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items = populate_orders(&state.orm, orders).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", OrderList { items }, Some(meta)))
}

fn effective_limit(requested: Option<u64>, default: u64) -> AppResult<u64> {
    match requested {
        None => Ok(default.min(MAX_LIST_LIMIT)),
        Some(0) => Err(AppError::BadRequest("limit must be greater than 0".into())),
        Some(limit) => Ok(limit.min(MAX_LIST_LIMIT)),
    }
}
