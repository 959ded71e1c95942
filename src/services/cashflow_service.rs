use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::cashflow::{CashFlowList, CreateCashFlowRequest},
    effects::{CashFlowDraft, ensure_storable_amount},
    entity::{
        cash_flows::{ActiveModel as CashFlowActive, Column as CashFlowCol, Entity as CashFlows, Model as CashFlowModel},
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    models::{CashFlowEntry, cash_flow_from_entity},
    response::{ApiResponse, Meta},
    routes::params::CashFlowQuery,
    state::AppState,
};

/// Append one ledger entry; used by payment transitions and manual entries.
pub(crate) async fn record_entry<C: ConnectionTrait>(
    conn: &C,
    restaurant_id: Uuid,
    order_id: Option<Uuid>,
    draft: CashFlowDraft,
) -> AppResult<CashFlowModel> {
    let entry = CashFlowActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(restaurant_id),
        order_id: Set(order_id),
        flow_type: Set(draft.flow_type),
        amount: Set(draft.amount),
        description: Set(draft.description),
        category: Set(draft.category),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;

    tracing::debug!(
        restaurant_id = %restaurant_id,
        flow_type = %entry.flow_type,
        amount = %entry.amount,
        "cash flow recorded"
    );
    Ok(entry)
}

pub async fn list_cash_flows(
    state: &AppState,
    restaurant_id: Uuid,
    query: CashFlowQuery,
) -> AppResult<ApiResponse<CashFlowList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(CashFlowCol::RestaurantId.eq(restaurant_id));
    if let Some(flow_type) = query.flow_type {
        condition = condition.add(CashFlowCol::FlowType.eq(flow_type));
    }
    if let Some(start) = query.start_date {
        condition = condition.add(CashFlowCol::CreatedAt.gte(start));
    }
    if let Some(end) = query.end_date {
        condition = condition.add(CashFlowCol::CreatedAt.lte(end));
    }

    let finder = CashFlows::find()
        .filter(condition)
        .order_by_desc(CashFlowCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(cash_flow_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("OK", CashFlowList { items }, Some(meta)))
}

pub async fn add_entry(
    state: &AppState,
    restaurant_id: Uuid,
    payload: CreateCashFlowRequest,
) -> AppResult<ApiResponse<CashFlowEntry>> {
    if payload.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be greater than 0".into()));
    }
    ensure_storable_amount(payload.amount, "amount")?;
    if payload.description.trim().is_empty() || payload.category.trim().is_empty() {
        return Err(AppError::BadRequest("description and category are required".into()));
    }

    Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    let entry = record_entry(
        &state.orm,
        restaurant_id,
        None,
        CashFlowDraft {
            flow_type: payload.flow_type,
            amount: payload.amount,
            description: payload.description,
            category: payload.category,
        },
    )
    .await?;

    Ok(ApiResponse::success(
        "Cash flow recorded",
        cash_flow_from_entity(entry),
        Some(Meta::empty()),
    ))
}
