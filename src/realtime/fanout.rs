use super::events::ServerEvent;
use super::hub::{NotificationHub, Topic};
use crate::models::Order;

/// Topics and frames for a freshly placed order.
pub fn order_created_events(order: &Order) -> Vec<(Topic, ServerEvent)> {
    vec![
        (
            Topic::Kitchen(order.restaurant_id),
            ServerEvent::NewOrder(Box::new(order.clone())),
        ),
        (
            Topic::Table(order.table_id),
            ServerEvent::OrderCreated(Box::new(order.clone())),
        ),
    ]
}

/// Kitchen gets the full order; table and tracker get `{order_id, status}`.
pub fn status_updated_events(order: &Order) -> Vec<(Topic, ServerEvent)> {
    let compact = ServerEvent::OrderStatusUpdated {
        order_id: order.id,
        status: order.status,
    };
    vec![
        (
            Topic::Kitchen(order.restaurant_id),
            ServerEvent::OrderUpdated(Box::new(order.clone())),
        ),
        (Topic::Table(order.table_id), compact.clone()),
        (Topic::Order(order.id), compact),
    ]
}

pub fn payment_updated_events(order: &Order) -> Vec<(Topic, ServerEvent)> {
    let compact = ServerEvent::OrderPaymentUpdated {
        order_id: order.id,
        payment_status: order.payment_status,
    };
    vec![
        (
            Topic::Kitchen(order.restaurant_id),
            ServerEvent::OrderUpdated(Box::new(order.clone())),
        ),
        (Topic::Table(order.table_id), compact.clone()),
        (Topic::Order(order.id), compact),
    ]
}

fn dispatch(hub: &NotificationHub, events: Vec<(Topic, ServerEvent)>) -> usize {
    events
        .into_iter()
        .map(|(topic, event)| hub.publish(&topic, event))
        .sum()
}

pub fn notify_order_created(hub: &NotificationHub, order: &Order) {
    let delivered = dispatch(hub, order_created_events(order));
    tracing::debug!(order_id = %order.id, delivered, "order created fan-out");
}

pub fn notify_status_updated(hub: &NotificationHub, order: &Order) {
    let delivered = dispatch(hub, status_updated_events(order));
    tracing::debug!(order_id = %order.id, status = %order.status, delivered, "status fan-out");
}

pub fn notify_payment_updated(hub: &NotificationHub, order: &Order) {
    let delivered = dispatch(hub, payment_updated_events(order));
    tracing::debug!(
        order_id = %order.id,
        payment_status = %order.payment_status,
        delivered,
        "payment fan-out"
    );
}
