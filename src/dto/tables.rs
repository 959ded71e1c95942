use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{RestaurantSummary, Table};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub restaurant_id: Uuid,
    pub table_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableWithRestaurant {
    pub table: Table,
    pub restaurant: RestaurantSummary,
}
