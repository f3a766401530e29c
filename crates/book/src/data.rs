// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Data types carrying order book state information.

use std::fmt::Display;

use ladderbook_core::UnixNanos;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::{
    enums::{BookAction, OrderSide},
    types::{Price, Quantity},
};

/// The identifier for a book order, unique within one book side.
///
/// Identifiers are allocated by an external authority (typically the venue);
/// the book never generates them.
pub type OrderId = u64;

/// Represents an order in a book.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, Serialize, Deserialize)]
pub struct BookOrder {
    /// The order side.
    pub side: OrderSide,
    /// The order price.
    pub price: Price,
    /// The order size.
    pub size: Quantity,
    /// The order ID.
    pub order_id: OrderId,
}

impl BookOrder {
    /// Creates a new [`BookOrder`] instance.
    #[must_use]
    pub fn new(side: OrderSide, price: Price, size: Quantity, order_id: OrderId) -> Self {
        Self {
            side,
            price,
            size,
            order_id,
        }
    }

    /// Returns the total order exposure (price * size).
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.price.as_f64() * self.size.as_f64()
    }

    /// Returns `true` if `other` is the same resting order by identity (id, side,
    /// price and size all match).
    ///
    /// This is the strict comparison; the `PartialEq` implementation is the weak
    /// structural one.
    #[must_use]
    pub fn eq_strict(&self, other: &Self) -> bool {
        self.order_id == other.order_id
            && self.side == other.side
            && self.price == other.price
            && self.size == other.size
    }
}

/// Weak structural equality: two book orders are equal when their sizes match.
///
/// This is the comparison used for book diffing and test assertions, where ids
/// are venue-assigned and differ across sources reporting the same liquidity.
/// Use [`BookOrder::eq_strict`] for identity comparison.
impl PartialEq for BookOrder {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
    }
}

impl Display for BookOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.price, self.size, self.side, self.order_id,
        )
    }
}

/// The order stored for a [`BookAction::Clear`] delta, which carries no order.
pub const NULL_ORDER: BookOrder = BookOrder {
    side: OrderSide::NoOrderSide,
    price: Price {
        raw: 0,
        precision: 0,
    },
    size: Quantity {
        raw: 0,
        precision: 0,
    },
    order_id: 0,
};

/// Represents a single change/delta in an order book.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderBookDelta {
    /// The instrument ID for the book.
    pub instrument_id: Ustr,
    /// The order book delta action.
    pub action: BookAction,
    /// The order to apply.
    pub order: BookOrder,
    /// The message sequence number assigned at the venue.
    pub sequence: u64,
    /// UNIX timestamp (nanoseconds) when the book event occurred.
    pub ts_event: UnixNanos,
}

impl OrderBookDelta {
    /// Creates a new [`OrderBookDelta`] instance.
    #[must_use]
    pub fn new(
        instrument_id: Ustr,
        action: BookAction,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Self {
        Self {
            instrument_id,
            action,
            order,
            sequence,
            ts_event,
        }
    }

    /// Creates a new [`OrderBookDelta`] instance with a `Clear` action and NULL order.
    #[must_use]
    pub fn clear(instrument_id: Ustr, sequence: u64, ts_event: UnixNanos) -> Self {
        Self {
            instrument_id,
            action: BookAction::Clear,
            order: NULL_ORDER,
            sequence,
            ts_event,
        }
    }
}

impl Display for OrderBookDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.instrument_id, self.action, self.order, self.sequence, self.ts_event,
        )
    }
}

/// Represents a batch of order book deltas, applied in sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookDeltas {
    /// The instrument ID for the book.
    pub instrument_id: Ustr,
    /// The batch of deltas.
    pub deltas: Vec<OrderBookDelta>,
}

impl OrderBookDeltas {
    /// Creates a new [`OrderBookDeltas`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `deltas` is empty.
    #[must_use]
    pub fn new(instrument_id: Ustr, deltas: Vec<OrderBookDelta>) -> Self {
        assert!(!deltas.is_empty(), "`deltas` cannot be empty");
        Self {
            instrument_id,
            deltas,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_book_order_new() {
        let order = BookOrder::new(OrderSide::Buy, Price::from("100.00"), Quantity::from(10), 1);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.price, Price::from("100.00"));
        assert_eq!(order.size, Quantity::from(10));
        assert_eq!(order.order_id, 1);
        assert_eq!(order.exposure(), 1000.0);
    }

    #[rstest]
    fn test_weak_equality_ignores_id_and_price() {
        let order1 = BookOrder::new(OrderSide::Buy, Price::from("100.00"), Quantity::from(10), 1);
        let order2 = BookOrder::new(OrderSide::Buy, Price::from("101.00"), Quantity::from(10), 2);
        let order3 = BookOrder::new(OrderSide::Buy, Price::from("100.00"), Quantity::from(11), 1);

        assert_eq!(order1, order2);
        assert_ne!(order1, order3);
    }

    #[rstest]
    fn test_strict_equality_requires_identity() {
        let order1 = BookOrder::new(OrderSide::Buy, Price::from("100.00"), Quantity::from(10), 1);
        let order2 = BookOrder::new(OrderSide::Buy, Price::from("100.00"), Quantity::from(10), 2);

        assert!(order1.eq_strict(&order1));
        assert!(!order1.eq_strict(&order2));
    }

    #[rstest]
    fn test_delta_clear() {
        let delta = OrderBookDelta::clear(Ustr::from("AAPL.XNAS"), 7, UnixNanos::from(1));
        assert_eq!(delta.action, BookAction::Clear);
        assert_eq!(delta.order.order_id, NULL_ORDER.order_id);
        assert_eq!(delta.sequence, 7);
    }

    #[rstest]
    #[should_panic(expected = "`deltas` cannot be empty")]
    fn test_deltas_empty_panics() {
        let _ = OrderBookDeltas::new(Ustr::from("AAPL.XNAS"), vec![]);
    }

    #[rstest]
    fn test_delta_serde_round_trip() {
        let order = BookOrder::new(OrderSide::Sell, Price::from("101.50"), Quantity::from(7), 3);
        let delta = OrderBookDelta::new(
            Ustr::from("AAPL.XNAS"),
            BookAction::Add,
            order,
            1,
            UnixNanos::from(42),
        );
        let json = serde_json::to_string(&delta).unwrap();
        let deserialized: OrderBookDelta = serde_json::from_str(&json).unwrap();
        assert!(deserialized.order.eq_strict(&delta.order));
        assert_eq!(deserialized.action, delta.action);
    }
}
