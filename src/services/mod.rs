pub mod analytics_service;
pub mod cashflow_service;
pub mod inventory_service;
pub mod menu_service;
pub mod order_service;
pub mod query_service;
pub mod table_service;
