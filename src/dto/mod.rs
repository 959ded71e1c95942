pub mod analytics;
pub mod cashflow;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod tables;
