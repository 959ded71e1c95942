use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analytics::{
            CashFlowSummary, LowStockItem, RestaurantAnalytics, SalesPeriod, SalesPoint, TopMenuItem,
        },
        cashflow::{CashFlowList, CreateCashFlowRequest},
        inventory::{
            StockItem, StockMovementList, StockStatus, StockSummary, StockUpdateRequest,
            StockUpdateResult,
        },
        menu::{CategoryWithItems, CreateCategoryRequest, CreateMenuItemRequest, Menu, UpdateMenuItemRequest},
        orders::{
            CreateOrderItemRequest, CreateOrderRequest, OrderList, UpdateOrderStatusRequest,
            UpdatePaymentRequest,
        },
        tables::{CreateTableRequest, TableWithRestaurant},
    },
    entity::{
        cash_flows::FlowType,
        orders::{OrderStatus, PaymentStatus},
        stock_movements::MovementType,
    },
    models::{
        CashFlowEntry, Category, MenuItem, MenuItemSummary, Order, OrderLineItem,
        RestaurantSummary, StockMovement, Table,
    },
    response::{ApiResponse, Meta},
    routes::{analytics, health, menu, orders, tables},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::get_order,
        orders::update_order_status,
        orders::update_payment_status,
        orders::kitchen_orders,
        orders::restaurant_orders,
        orders::table_orders,
        tables::create_table,
        tables::get_table,
        tables::scan_table,
        menu::get_menu,
        menu::create_category,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        analytics::restaurant_analytics,
        analytics::stock_status,
        analytics::update_stock,
        analytics::stock_movements,
        analytics::cash_flow_history,
        analytics::add_cash_flow
    ),
    components(
        schemas(
            OrderStatus,
            PaymentStatus,
            MovementType,
            FlowType,
            RestaurantSummary,
            Table,
            Category,
            MenuItem,
            MenuItemSummary,
            OrderLineItem,
            Order,
            StockMovement,
            CashFlowEntry,
            CreateOrderItemRequest,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            UpdatePaymentRequest,
            OrderList,
            CreateTableRequest,
            TableWithRestaurant,
            CreateCategoryRequest,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            CategoryWithItems,
            Menu,
            StockUpdateRequest,
            StockUpdateResult,
            StockItem,
            StockSummary,
            StockStatus,
            StockMovementList,
            CreateCashFlowRequest,
            CashFlowList,
            SalesPeriod,
            SalesPoint,
            TopMenuItem,
            CashFlowSummary,
            LowStockItem,
            RestaurantAnalytics,
            Meta,
            health::HealthData,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<Menu>,
            ApiResponse<RestaurantAnalytics>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order placement, lifecycle and queues"),
        (name = "Tables", description = "Tables and QR ordering links"),
        (name = "Menu", description = "Menu categories and items"),
        (name = "Analytics", description = "Sales reporting"),
        (name = "Inventory", description = "Stock levels and movements"),
        (name = "Cash Flow", description = "Income and expense ledger"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
