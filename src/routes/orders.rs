use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, UpdateOrderStatusRequest, UpdatePaymentRequest},
    error::AppResult,
    models::Order,
    response::ApiResponse,
    routes::extract::{AppJson, AppPath, AppQuery},
    routes::params::RestaurantOrderQuery,
    services::{order_service, query_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_order_status))
        .route("/{id}/payment", put(update_payment_status))
        .route("/kitchen/{restaurant_id}", get(kitchen_orders))
        .route("/restaurant/{restaurant_id}", get(restaurant_orders))
        .route("/table/{table_id}", get(table_orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Empty order or unavailable menu item"),
        (status = 404, description = "Table not found"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items, table and restaurant", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated and pushed to subscribers", body = ApiResponse<Order>),
        (status = 400, description = "Insufficient stock to confirm"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/payment",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "Orders"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_payment(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/kitchen/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Confirmed and preparing orders, oldest first", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn kitchen_orders(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = query_service::kitchen_queue(&state, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/restaurant/{restaurant_id}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        RestaurantOrderQuery
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = ApiResponse<OrderList>),
        (status = 400, description = "Invalid filter"),
    ),
    tag = "Orders"
)]
pub async fn restaurant_orders(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<RestaurantOrderQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = query_service::list_restaurant_orders(&state, restaurant_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/table/{table_id}",
    params(("table_id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Order history of a table, newest first", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn table_orders(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = query_service::table_history(&state, table_id).await?;
    Ok(Json(resp))
}
