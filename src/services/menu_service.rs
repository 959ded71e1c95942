use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::menu::{
        CategoryWithItems, CreateCategoryRequest, CreateMenuItemRequest, Menu, UpdateMenuItemRequest,
    },
    effects::ensure_storable_amount,
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        menu_items::{ActiveModel as MenuItemActive, Column as MenuCol, Entity as MenuItems},
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    models::{Category, MenuItem, category_from_entity, menu_item_from_entity},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Active categories with their available items, both by sort order.
pub async fn get_menu(state: &AppState, restaurant_id: Uuid) -> AppResult<ApiResponse<Menu>> {
    Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    let categories = Categories::find()
        .filter(CategoryCol::RestaurantId.eq(restaurant_id))
        .filter(CategoryCol::IsActive.eq(true))
        .order_by_asc(CategoryCol::SortOrder)
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?;

    let mut items_by_category: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    for item in MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant_id))
        .filter(MenuCol::IsAvailable.eq(true))
        .order_by_asc(MenuCol::SortOrder)
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
    {
        items_by_category
            .entry(item.category_id)
            .or_default()
            .push(menu_item_from_entity(item));
    }

    let categories: Vec<CategoryWithItems> = categories
        .into_iter()
        .map(|category| CategoryWithItems {
            items: items_by_category.remove(&category.id).unwrap_or_default(),
            category: category_from_entity(category),
        })
        .collect();

    let meta = Meta::count(categories.len());
    Ok(ApiResponse::success("OK", Menu { categories }, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("category name is required".into()));
    }

    Restaurants::find_by_id(payload.restaurant_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Restaurant"))?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        name: Set(name.to_string()),
        description: Set(payload.description),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

pub async fn create_menu_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("menu item name is required".into()));
    }
    validate_price(payload.price)?;
    let stock_quantity = payload.stock_quantity.unwrap_or(0);
    if stock_quantity < 0 || payload.min_stock_alert.is_some_and(|v| v < 0) {
        return Err(AppError::BadRequest("stock values must not be negative".into()));
    }

    Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?
        .filter(|category| category.restaurant_id == payload.restaurant_id)
        .ok_or(AppError::NotFound("Category"))?;

    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        category_id: Set(payload.category_id),
        name: Set(name.to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        image: Set(payload.image),
        is_available: Set(true),
        stock_quantity: Set(stock_quantity),
        min_stock_alert: Set(payload.min_stock_alert.unwrap_or(0)),
        unit: Set(payload.unit.unwrap_or_else(|| "pcs".to_string())),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(menu_item_id = %item.id, name = %item.name, "menu item created");
    Ok(ApiResponse::success(
        "Menu item created",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Partial update. Orders already placed keep their snapshotted prices.
pub async fn update_menu_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;

    if let Some(category_id) = payload.category_id {
        Categories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .filter(|category| category.restaurant_id == item.restaurant_id)
            .ok_or(AppError::NotFound("Category"))?;
    }

    let mut active: MenuItemActive = item.into();
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(name) = payload.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("menu item name is required".into()));
        }
        active.name = Set(name.to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    if let Some(min_stock_alert) = payload.min_stock_alert {
        if min_stock_alert < 0 {
            return Err(AppError::BadRequest("stock values must not be negative".into()));
        }
        active.min_stock_alert = Set(min_stock_alert);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await?;
    Ok(ApiResponse::success(
        "Menu item updated",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

/// Soft delete: the item disappears from the menu but stays referenced by
/// past orders and stock movements.
pub async fn delete_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Menu item"))?;

    let mut active: MenuItemActive = item.into();
    active.is_available = Set(false);
    active.updated_at = Set(Utc::now().into());
    let item = active.update(&state.orm).await?;

    tracing::info!(menu_item_id = %item.id, "menu item disabled");
    Ok(ApiResponse::success(
        "Menu item deleted",
        menu_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    ensure_storable_amount(price, "price")
}
