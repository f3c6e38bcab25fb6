//! Order status state machine.
//!
//! Orders normally walk a fixed, linear sequence:
//!
//! ```text
//! pending -> confirmed -> preparing -> baking -> ready -> delivered
//! ```
//!
//! [`OrderStatus::next`] is the total "advance by one" function. The store also
//! accepts explicit targets (see [`OrderAction::SetStatus`](crate::order_actor::OrderAction::SetStatus)),
//! and those are deliberately not checked against this order so the kitchen
//! can correct mistakes.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Baking,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// Every status, in forward order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Baking,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// The fixed successor, or `None` once delivered.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Baking),
            OrderStatus::Baking => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Still in the kitchen's queue.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Rough completion shown on the tracking bar.
    pub fn progress_percent(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 25,
            OrderStatus::Preparing => 50,
            OrderStatus::Baking => 75,
            OrderStatus::Ready => 90,
            OrderStatus::Delivered => 100,
        }
    }

    /// Minutes until the order reaches the customer, as a `(low, high)`
    /// range. `None` once delivered.
    pub fn remaining_minutes(self) -> Option<(u32, u32)> {
        match self {
            OrderStatus::Pending => Some((5, 5)),
            OrderStatus::Confirmed => Some((20, 25)),
            OrderStatus::Preparing => Some((15, 20)),
            OrderStatus::Baking => Some((10, 15)),
            OrderStatus::Ready => Some((5, 10)),
            OrderStatus::Delivered => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Baking => "baking",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the six known names.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Kitchen urgency flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
    Urgent,
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_sequence() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Baking));
        assert_eq!(OrderStatus::Baking.next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn test_walking_next_visits_all_in_order() {
        let mut seen = vec![OrderStatus::Pending];
        while let Some(next) = seen.last().and_then(|s| s.next()) {
            seen.push(next);
        }
        assert_eq!(seen, OrderStatus::ALL.to_vec());
    }

    #[test]
    fn test_only_delivered_is_terminal() {
        for status in OrderStatus::ALL {
            assert_eq!(status.is_terminal(), status == OrderStatus::Delivered);
        }
    }

    #[test]
    fn test_parse_round_trips_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!("  Ready ".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
    }

    #[test]
    fn test_unrecognized_status_is_rejected() {
        let err = "cancelled".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("cancelled".to_string()));
    }

    #[test]
    fn test_progress_is_monotonic() {
        let progress: Vec<u8> = OrderStatus::ALL.iter().map(|s| s.progress_percent()).collect();
        assert!(progress.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_remaining_minutes() {
        assert_eq!(OrderStatus::Pending.remaining_minutes(), Some((5, 5)));
        assert_eq!(OrderStatus::Confirmed.remaining_minutes(), Some((20, 25)));
        assert_eq!(OrderStatus::Preparing.remaining_minutes(), Some((15, 20)));
        assert_eq!(OrderStatus::Baking.remaining_minutes(), Some((10, 15)));
        assert_eq!(OrderStatus::Ready.remaining_minutes(), Some((5, 10)));
        assert_eq!(OrderStatus::Delivered.remaining_minutes(), None);

        for status in OrderStatus::ALL {
            if let Some((low, high)) = status.remaining_minutes() {
                assert!(low <= high, "{status}");
            }
        }
    }

    #[test]
    fn test_priority_defaults_to_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
        assert_eq!("URGENT".parse::<Priority>(), Ok(Priority::Urgent));
        assert!("later".parse::<Priority>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&OrderStatus::Baking).unwrap();
        assert_eq!(json, "\"baking\"");
        let priority: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(priority, Priority::High);
    }
}
