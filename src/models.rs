use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::effects::line_subtotal;
use crate::entity::{
    cash_flows::{self, FlowType},
    categories, menu_items,
    order_items,
    orders::{self, OrderStatus, PaymentStatus},
    restaurant_tables, restaurants,
    stock_movements::{self, MovementType},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Table {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_number: String,
    pub qr_code: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub is_available: bool,
    pub stock_quantity: i32,
    pub min_stock_alert: i32,
    pub unit: String,
    pub sort_order: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItemSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLineItem {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
    pub subtotal: Decimal,
    pub notes: Option<String>,
    pub menu_item: Option<MenuItemSummary>,
}

/// The order aggregate as returned to clients and pushed to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub restaurant_id: Uuid,
    pub table_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub payment_id: Option<String>,
    pub notes: Option<String>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderLineItem>,
    pub table: Option<Table>,
    pub restaurant: Option<RestaurantSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockMovement {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_name: Option<String>,
    pub order_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CashFlowEntry {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub order_id: Option<Uuid>,
    pub flow_type: FlowType,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

pub fn restaurant_from_entity(model: restaurants::Model) -> RestaurantSummary {
    RestaurantSummary {
        id: model.id,
        name: model.name,
        description: model.description,
        logo: model.logo,
    }
}

pub fn table_from_entity(model: restaurant_tables::Model) -> Table {
    Table {
        id: model.id,
        restaurant_id: model.restaurant_id,
        table_number: model.table_number,
        qr_code: model.qr_code,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        restaurant_id: model.restaurant_id,
        name: model.name,
        description: model.description,
        sort_order: model.sort_order,
        is_active: model.is_active,
    }
}

pub fn menu_item_from_entity(model: menu_items::Model) -> MenuItem {
    MenuItem {
        id: model.id,
        restaurant_id: model.restaurant_id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        image: model.image,
        is_available: model.is_available,
        stock_quantity: model.stock_quantity,
        min_stock_alert: model.min_stock_alert,
        unit: model.unit,
        sort_order: model.sort_order,
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn menu_item_summary(model: &menu_items::Model) -> MenuItemSummary {
    MenuItemSummary {
        id: model.id,
        name: model.name.clone(),
        image: model.image.clone(),
        unit: model.unit.clone(),
    }
}

pub fn line_item_from_entity(
    model: order_items::Model,
    menu_item: Option<MenuItemSummary>,
) -> OrderLineItem {
    OrderLineItem {
        id: model.id,
        menu_item_id: model.menu_item_id,
        quantity: model.quantity,
        subtotal: line_subtotal(model.price, model.quantity),
        price: model.price,
        notes: model.notes,
        menu_item,
    }
}

pub fn order_from_entity(model: orders::Model, items: Vec<OrderLineItem>) -> Order {
    Order {
        id: model.id,
        order_number: model.order_number,
        restaurant_id: model.restaurant_id,
        table_id: model.table_id,
        total_amount: model.total_amount,
        status: model.status,
        payment_status: model.payment_status,
        payment_method: model.payment_method,
        payment_id: model.payment_id,
        notes: model.notes,
        customer_name: model.customer_name,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        items,
        table: None,
        restaurant: None,
    }
}

pub fn stock_movement_from_entity(
    model: stock_movements::Model,
    menu_item_name: Option<String>,
) -> StockMovement {
    StockMovement {
        id: model.id,
        menu_item_id: model.menu_item_id,
        menu_item_name,
        order_id: model.order_id,
        movement_type: model.movement_type,
        quantity: model.quantity,
        previous_stock: model.previous_stock,
        new_stock: model.new_stock,
        reason: model.reason,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub fn cash_flow_from_entity(model: cash_flows::Model) -> CashFlowEntry {
    CashFlowEntry {
        id: model.id,
        restaurant_id: model.restaurant_id,
        order_id: model.order_id,
        flow_type: model.flow_type,
        amount: model.amount,
        description: model.description,
        category: model.category,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
