use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum SalesPeriod {
    #[serde(rename = "today")]
    Today,
    #[default]
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SalesPoint {
    /// `HH:00` for hourly buckets, `YYYY-MM-DD` for daily ones.
    pub label: String,
    pub start: DateTime<Utc>,
    pub revenue: Decimal,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TopMenuItem {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CashFlowSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LowStockItem {
    pub id: Uuid,
    pub name: String,
    pub stock_quantity: i32,
    pub min_stock_alert: i32,
    pub unit: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantAnalytics {
    pub today_revenue: Decimal,
    pub today_orders: i64,
    pub monthly_revenue: Decimal,
    pub monthly_orders: i64,
    pub top_menu_items: Vec<TopMenuItem>,
    pub sales: Vec<SalesPoint>,
    pub sales_period: SalesPeriod,
    pub interval_label: String,
    pub cashflow: CashFlowSummary,
    pub low_stock_items: Vec<LowStockItem>,
}
