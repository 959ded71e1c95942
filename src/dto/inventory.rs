use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::stock_movements::MovementType;
use crate::models::{MenuItem, StockMovement};

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockUpdateRequest {
    pub menu_item_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockUpdateResult {
    pub menu_item: MenuItem,
    pub movement: StockMovement,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    pub stock_quantity: i32,
    pub min_stock_alert: i32,
    pub unit: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockSummary {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockStatus {
    pub items: Vec<StockItem>,
    pub summary: StockSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockMovementList {
    pub items: Vec<StockMovement>,
}
