use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::tables::{CreateTableRequest, TableWithRestaurant},
    error::AppResult,
    models::Table,
    response::ApiResponse,
    routes::extract::{AppJson, AppPath},
    services::table_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_table))
        .route("/{id}", get(get_table))
        .route("/scan/{restaurant_id}/{table_number}", get(scan_table))
}

#[utoipa::path(
    post,
    path = "/api/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 200, description = "Table created with its ordering URL", body = ApiResponse<Table>),
        (status = 404, description = "Restaurant not found"),
        (status = 409, description = "Table number already exists"),
    ),
    tag = "Tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTableRequest>,
) -> AppResult<Json<ApiResponse<Table>>> {
    let resp = table_service::create_table(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/{id}",
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table with restaurant", body = ApiResponse<TableWithRestaurant>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<TableWithRestaurant>>> {
    let resp = table_service::get_table(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tables/scan/{restaurant_id}/{table_number}",
    params(
        ("restaurant_id" = Uuid, Path, description = "Restaurant ID"),
        ("table_number" = String, Path, description = "Table number printed on the QR code")
    ),
    responses(
        (status = 200, description = "Table resolved from a scanned QR code", body = ApiResponse<TableWithRestaurant>),
        (status = 400, description = "Table is not active"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Tables"
)]
pub async fn scan_table(
    State(state): State<AppState>,
    AppPath((restaurant_id, table_number)): AppPath<(Uuid, String)>,
) -> AppResult<Json<ApiResponse<TableWithRestaurant>>> {
    let resp = table_service::scan_table(&state, restaurant_id, &table_number).await?;
    Ok(Json(resp))
}
