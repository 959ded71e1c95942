//! Inventory and ledger side effects of order transitions.
//!
//! Everything here is pure: callers load the current stock under a row lock,
//! ask for the resulting movement, and persist both the new stock and the
//! movement record in the same transaction.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entity::{cash_flows::FlowType, stock_movements::MovementType};
use crate::error::{AppError, AppResult};

pub const SALES_CATEGORY: &str = "Sales";
pub const REFUND_CATEGORY: &str = "Refunds";

/// Most units a single order line may ask for.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Largest value a `NUMERIC(12, 2)` money column holds: 9_999_999_999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// One computed stock mutation, ready to be written as a movement row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub menu_item_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowDraft {
    pub flow_type: FlowType,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
}

pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines
        .into_iter()
        .map(|(price, quantity)| line_subtotal(price, quantity))
        .sum()
}

pub fn ensure_line_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest("quantity must be greater than 0".into()));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must not exceed {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// Rejects money values the ledger columns cannot store.
pub fn ensure_storable_amount(amount: Decimal, field: &str) -> AppResult<()> {
    if amount > MAX_AMOUNT {
        return Err(AppError::BadRequest(format!(
            "{field} must not exceed {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Stock taken when an order is confirmed.
pub fn consume_for_order(
    menu_item_id: Uuid,
    item_name: &str,
    current_stock: i32,
    quantity: i32,
    order_number: &str,
) -> AppResult<StockDelta> {
    if current_stock < quantity {
        return Err(AppError::InsufficientStock {
            item: item_name.to_string(),
            available: current_stock,
            requested: quantity,
        });
    }

    Ok(StockDelta {
        menu_item_id,
        movement_type: MovementType::Out,
        quantity,
        previous_stock: current_stock,
        new_stock: current_stock - quantity,
        reason: format!("Order {order_number} - {item_name}"),
    })
}

/// Stock given back when a confirmed order is cancelled.
pub fn restore_for_order(
    menu_item_id: Uuid,
    item_name: &str,
    current_stock: i32,
    quantity: i32,
    order_number: &str,
) -> StockDelta {
    StockDelta {
        menu_item_id,
        movement_type: MovementType::In,
        quantity,
        previous_stock: current_stock,
        new_stock: current_stock + quantity,
        reason: format!("Order {order_number} cancelled - {item_name}"),
    }
}

/// Manual stock movement entered by staff.
///
/// `IN` adds, `OUT` subtracts but never goes below zero, `ADJUSTMENT` sets the
/// absolute level. `quantity` is recorded as entered.
pub fn manual_movement(
    menu_item_id: Uuid,
    current_stock: i32,
    movement_type: MovementType,
    quantity: i32,
    reason: Option<String>,
) -> AppResult<StockDelta> {
    if quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".into()));
    }

    let new_stock = match movement_type {
        MovementType::In => current_stock.saturating_add(quantity),
        MovementType::Out => (current_stock - quantity).max(0),
        MovementType::Adjustment => quantity,
    };

    Ok(StockDelta {
        menu_item_id,
        movement_type,
        quantity,
        previous_stock: current_stock,
        new_stock,
        reason: reason.unwrap_or_else(|| format!("Manual {movement_type}")),
    })
}

pub fn sales_income(order_number: &str, total: Decimal) -> CashFlowDraft {
    CashFlowDraft {
        flow_type: FlowType::Income,
        amount: total,
        description: format!("Payment for order {order_number}"),
        category: SALES_CATEGORY.to_string(),
    }
}

pub fn refund_expense(order_number: &str, total: Decimal) -> CashFlowDraft {
    CashFlowDraft {
        flow_type: FlowType::Expense,
        amount: total,
        description: format!("Refund for order {order_number}"),
        category: REFUND_CATEGORY.to_string(),
    }
}
