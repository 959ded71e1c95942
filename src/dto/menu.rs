use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, MenuItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub sort_order: Option<i32>,
    pub stock_quantity: Option<i32>,
    pub min_stock_alert: Option<i32>,
    pub unit: Option<String>,
}

/// Partial update; stock is changed through stock movements instead.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
    pub min_stock_alert: Option<i32>,
    pub unit: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWithItems {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Menu {
    pub categories: Vec<CategoryWithItems>,
}
