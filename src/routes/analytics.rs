use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        analytics::RestaurantAnalytics,
        cashflow::{CashFlowList, CreateCashFlowRequest},
        inventory::{StockMovementList, StockStatus, StockUpdateRequest, StockUpdateResult},
    },
    error::AppResult,
    models::CashFlowEntry,
    response::ApiResponse,
    routes::extract::{AppJson, AppPath, AppQuery},
    routes::params::{AnalyticsQuery, CashFlowQuery, StockMovementQuery},
    services::{analytics_service, cashflow_service, inventory_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{restaurant_id}", get(restaurant_analytics))
        .route("/{restaurant_id}/stock", get(stock_status).put(update_stock))
        .route("/{restaurant_id}/stock/movements", get(stock_movements))
        .route(
            "/{restaurant_id}/cashflow",
            get(cash_flow_history).post(add_cash_flow),
        )
}

#[utoipa::path(
    get,
    path = "/api/analytics/{restaurant_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        AnalyticsQuery
    ),
    responses(
        (status = 200, description = "Revenue, top items, sales series, cash flow and low stock", body = ApiResponse<RestaurantAnalytics>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Analytics"
)]
pub async fn restaurant_analytics(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AnalyticsQuery>,
) -> AppResult<Json<ApiResponse<RestaurantAnalytics>>> {
    let resp = analytics_service::restaurant_analytics(&state, restaurant_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/{restaurant_id}/stock",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Stock levels of available items", body = ApiResponse<StockStatus>),
    ),
    tag = "Inventory"
)]
pub async fn stock_status(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<StockStatus>>> {
    let resp = inventory_service::stock_status(&state, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/analytics/{restaurant_id}/stock",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    request_body = StockUpdateRequest,
    responses(
        (status = 200, description = "Stock changed and movement recorded", body = ApiResponse<StockUpdateResult>),
        (status = 400, description = "Negative quantity"),
        (status = 404, description = "Menu item not found"),
    ),
    tag = "Inventory"
)]
pub async fn update_stock(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppJson(payload): AppJson<StockUpdateRequest>,
) -> AppResult<Json<ApiResponse<StockUpdateResult>>> {
    let resp = inventory_service::update_stock(&state, restaurant_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/{restaurant_id}/stock/movements",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        StockMovementQuery
    ),
    responses(
        (status = 200, description = "Latest stock movements, newest first", body = ApiResponse<StockMovementList>),
    ),
    tag = "Inventory"
)]
pub async fn stock_movements(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<StockMovementQuery>,
) -> AppResult<Json<ApiResponse<StockMovementList>>> {
    let resp = inventory_service::list_movements(&state, restaurant_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/{restaurant_id}/cashflow",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        CashFlowQuery
    ),
    responses(
        (status = 200, description = "Cash flow entries, newest first", body = ApiResponse<CashFlowList>),
    ),
    tag = "Cash Flow"
)]
pub async fn cash_flow_history(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<CashFlowQuery>,
) -> AppResult<Json<ApiResponse<CashFlowList>>> {
    let resp = cashflow_service::list_cash_flows(&state, restaurant_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/analytics/{restaurant_id}/cashflow",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    request_body = CreateCashFlowRequest,
    responses(
        (status = 200, description = "Manual cash flow entry recorded", body = ApiResponse<CashFlowEntry>),
        (status = 400, description = "Invalid amount or missing description"),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Cash Flow"
)]
pub async fn add_cash_flow(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateCashFlowRequest>,
) -> AppResult<Json<ApiResponse<CashFlowEntry>>> {
    let resp = cashflow_service::add_entry(&state, restaurant_id, payload).await?;
    Ok(Json(resp))
}
