use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hub::Topic;
use crate::entity::orders::{OrderStatus, PaymentStatus};
use crate::models::Order;

/// Frames pushed to subscribers, encoded as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Joined { topic: String },
    Left { topic: String },
    /// Full order to the kitchen when it is placed.
    NewOrder(Box<Order>),
    /// Full order to the table it was placed from.
    OrderCreated(Box<Order>),
    /// Full order to the kitchen after any status or payment change.
    OrderUpdated(Box<Order>),
    #[serde(rename_all = "camelCase")]
    OrderStatusUpdated { order_id: Uuid, status: OrderStatus },
    #[serde(rename_all = "camelCase")]
    OrderPaymentUpdated {
        order_id: Uuid,
        payment_status: PaymentStatus,
    },
    Error { message: String },
}

/// Frames accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientCommand {
    JoinTable(Uuid),
    JoinKitchen(Uuid),
    JoinOrderTracking(Uuid),
    LeaveTable(Uuid),
    LeaveKitchen(Uuid),
    LeaveOrderTracking(Uuid),
}

impl ClientCommand {
    /// Returns the topic and whether the client wants to join it.
    pub fn membership(&self) -> (Topic, bool) {
        match *self {
            ClientCommand::JoinTable(id) => (Topic::Table(id), true),
            ClientCommand::JoinKitchen(id) => (Topic::Kitchen(id), true),
            ClientCommand::JoinOrderTracking(id) => (Topic::Order(id), true),
            ClientCommand::LeaveTable(id) => (Topic::Table(id), false),
            ClientCommand::LeaveKitchen(id) => (Topic::Kitchen(id), false),
            ClientCommand::LeaveOrderTracking(id) => (Topic::Order(id), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join_frames() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"event":"join-order-tracking","data":"{id}"}}"#);
        let cmd: ClientCommand = serde_json::from_str(&raw).unwrap();
        assert_eq!(cmd, ClientCommand::JoinOrderTracking(id));
        assert_eq!(cmd.membership(), (Topic::Order(id), true));

        let raw = format!(r#"{{"event":"leave-kitchen","data":"{id}"}}"#);
        let cmd: ClientCommand = serde_json::from_str(&raw).unwrap();
        assert_eq!(cmd.membership(), (Topic::Kitchen(id), false));
    }

    #[test]
    fn rejects_unknown_frames() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"event":"join-bar","data":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientCommand>(r#"{"event":"join-table","data":"nope"}"#).is_err());
    }

    #[test]
    fn status_frame_is_compact() {
        let order_id = Uuid::nil();
        let frame = ServerEvent::OrderStatusUpdated {
            order_id,
            status: OrderStatus::Preparing,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "order-status-updated",
                "data": { "orderId": order_id, "status": "PREPARING" }
            })
        );
    }

    #[test]
    fn payment_frame_uses_camel_case_keys() {
        let order_id = Uuid::nil();
        let frame = ServerEvent::OrderPaymentUpdated {
            order_id,
            payment_status: PaymentStatus::Refunded,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["event"], "order-payment-updated");
        assert_eq!(json["data"]["orderId"], serde_json::json!(order_id));
        assert_eq!(json["data"]["paymentStatus"], "REFUNDED");
    }
}
