//! Order and payment state machines.
//!
//! Order status follows the kitchen flow
//! `PENDING -> CONFIRMED -> PREPARING -> READY -> SERVED`, with `CANCELLED`
//! reachable from every non-terminal state. Payment status is independent of
//! order status; any combination of the two is allowed.

use crate::entity::orders::{OrderStatus, PaymentStatus};
use crate::error::{AppError, AppResult};

/// Stock consequence of an order-status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    None,
    /// Take the ordered quantities out of stock.
    Consume,
    /// Give back what a previous `Consume` took.
    Restore,
}

/// Ledger consequence of a payment-status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    None,
    Income,
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Requested status equals the current one; nothing to write.
    Unchanged,
    Apply {
        from: OrderStatus,
        to: OrderStatus,
        stock: StockEffect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentChange {
    Unchanged,
    Apply {
        from: PaymentStatus,
        to: PaymentStatus,
        ledger: LedgerEffect,
    },
}

pub fn is_terminal(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Served | OrderStatus::Cancelled)
}

pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    valid_next_states(from).contains(&to)
}

pub fn valid_next_states(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
        OrderStatus::Confirmed => &[OrderStatus::Preparing, OrderStatus::Cancelled],
        OrderStatus::Preparing => &[OrderStatus::Ready, OrderStatus::Cancelled],
        OrderStatus::Ready => &[OrderStatus::Served, OrderStatus::Cancelled],
        OrderStatus::Served | OrderStatus::Cancelled => &[],
    }
}

/// Whether stock for the order's line items is currently taken, i.e. the
/// order went through `CONFIRMED` and has not been cancelled since.
pub fn holds_stock(status: OrderStatus) -> bool {
    matches!(
        status,
        OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready | OrderStatus::Served
    )
}

/// Decide what an `UpdateStatus(current -> requested)` call must do.
///
/// Re-requesting the current status is a no-op, so repeated confirmations
/// never consume stock twice.
pub fn plan_status_change(current: OrderStatus, requested: OrderStatus) -> AppResult<StatusChange> {
    if current == requested {
        return Ok(StatusChange::Unchanged);
    }
    if !is_valid_transition(current, requested) {
        return Err(AppError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    let stock = match requested {
        OrderStatus::Confirmed => StockEffect::Consume,
        OrderStatus::Cancelled if holds_stock(current) => StockEffect::Restore,
        _ => StockEffect::None,
    };

    Ok(StatusChange::Apply {
        from: current,
        to: requested,
        stock,
    })
}

pub fn is_valid_payment_transition(from: PaymentStatus, to: PaymentStatus) -> bool {
    matches!(
        (from, to),
        (PaymentStatus::Pending, PaymentStatus::Paid)
            | (PaymentStatus::Pending, PaymentStatus::Failed)
            | (PaymentStatus::Failed, PaymentStatus::Paid)
            | (PaymentStatus::Failed, PaymentStatus::Pending)
            | (PaymentStatus::Paid, PaymentStatus::Refunded)
    )
}

pub fn plan_payment_change(
    current: PaymentStatus,
    requested: PaymentStatus,
) -> AppResult<PaymentChange> {
    if current == requested {
        return Ok(PaymentChange::Unchanged);
    }
    if !is_valid_payment_transition(current, requested) {
        return Err(AppError::InvalidPaymentTransition {
            from: current,
            to: requested,
        });
    }

    let ledger = match requested {
        PaymentStatus::Paid => LedgerEffect::Income,
        PaymentStatus::Refunded => LedgerEffect::Refund,
        _ => LedgerEffect::None,
    };

    Ok(PaymentChange::Apply {
        from: current,
        to: requested,
        ledger,
    })
}
