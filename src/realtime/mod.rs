//! Real-time order notifications.
//!
//! ```text
//! order_service (after commit)
//!       │ Order
//!       ▼
//! fanout::notify_*  ── picks topics + event shape
//!       │ (Topic, ServerEvent)
//!       ▼
//! NotificationHub    ── topic -> connection ids -> bounded queue
//!       │
//!       ▼
//! ws::session        ── one task per socket, join/leave commands
//! ```
//!
//! Membership lives in process memory only. Delivery is at-most-once: a
//! client that is not connected, or whose queue is full, misses the event
//! and must refetch after reconnecting and re-joining.

pub mod events;
pub mod fanout;
pub mod hub;
pub mod ws;

pub use events::{ClientCommand, ServerEvent};
pub use hub::{ConnectionId, NotificationHub, Subscription, Topic};
