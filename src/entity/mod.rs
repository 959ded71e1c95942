pub mod cash_flows;
pub mod categories;
pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod restaurant_tables;
pub mod restaurants;
pub mod stock_movements;

pub use cash_flows::Entity as CashFlows;
pub use categories::Entity as Categories;
pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use restaurant_tables::Entity as RestaurantTables;
pub use restaurants::Entity as Restaurants;
pub use stock_movements::Entity as StockMovements;
