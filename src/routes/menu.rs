use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::menu::{CreateCategoryRequest, CreateMenuItemRequest, Menu, UpdateMenuItemRequest},
    error::AppResult,
    models::{Category, MenuItem},
    response::ApiResponse,
    routes::extract::{AppJson, AppPath},
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/items", post(create_menu_item))
        .route("/items/{id}", put(update_menu_item).delete(delete_menu_item))
        .route("/{restaurant_id}", get(get_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu/{restaurant_id}",
    params(("restaurant_id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Active categories with available items", body = ApiResponse<Menu>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    AppPath(restaurant_id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Menu>>> {
    let resp = menu_service::get_menu(&state, restaurant_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menu/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 404, description = "Restaurant not found"),
    ),
    tag = "Menu"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = menu_service::create_category(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/menu/items",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item created", body = ApiResponse<MenuItem>),
        (status = 404, description = "Category not found"),
    ),
    tag = "Menu"
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::create_menu_item(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateMenuItemRequest>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::update_menu_item(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/menu/items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item marked unavailable", body = ApiResponse<MenuItem>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Menu"
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let resp = menu_service::delete_menu_item(&state, id).await?;
    Ok(Json(resp))
}
