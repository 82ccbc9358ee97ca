//! Order status and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Picked,
    Packed,
    ReadyToShip,
    Shipped,
    Delivered,
    Cancelled,
}

/// What a requested status change does to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The change is allowed and is recorded.
    Apply,
    /// Cancelling an already cancelled order: succeeds, changes nothing.
    NoOp,
    /// The change is not allowed.
    Reject,
}

impl OrderStatus {
    /// The fulfilment path, in order.
    pub const FORWARD: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Picked,
        OrderStatus::Packed,
        OrderStatus::ReadyToShip,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    fn rank(self) -> Option<usize> {
        Self::FORWARD.iter().position(|s| *s == self)
    }

    /// Classify the change from `self` to `next`.
    ///
    /// Forward moves (skips included) and cancellation of a live order apply;
    /// re-cancelling is a no-op; everything else is rejected.
    pub fn transition_to(self, next: OrderStatus) -> Transition {
        match (self, next) {
            (OrderStatus::Cancelled, OrderStatus::Cancelled) => Transition::NoOp,
            (from, _) if from.is_terminal() => Transition::Reject,
            (_, OrderStatus::Cancelled) => Transition::Apply,
            (from, to) => match (from.rank(), to.rank()) {
                (Some(a), Some(b)) if b > a => Transition::Apply,
                _ => Transition::Reject,
            },
        }
    }

    /// Every status `self` may move to.
    pub fn allowed_next(self) -> Vec<OrderStatus> {
        Self::FORWARD
            .iter()
            .copied()
            .chain([OrderStatus::Cancelled])
            .filter(|next| self.transition_to(*next) == Transition::Apply)
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Picked => "PICKED",
            OrderStatus::Packed => "PACKED",
            OrderStatus::ReadyToShip => "READY_TO_SHIP",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}
