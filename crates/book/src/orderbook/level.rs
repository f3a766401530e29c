// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Represents a discrete price level in an order book.

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    data::{BookOrder, OrderId},
    orderbook::{error::BookError, ladder::BookPrice},
    types::{Quantity, fixed::FIXED_SCALAR, quantity::QuantityRaw},
};

/// Represents a discrete price level in an order book.
///
/// The level maintains a collection of orders in strict FIFO arrival order
/// (time priority within the price) together with a running aggregate of the
/// resting size, adjusted incrementally on every mutation. Lookup, amend, and
/// removal by order id are O(1) through the order index.
#[derive(Clone, Debug, Eq)]
pub struct BookLevel {
    /// The price of the level.
    pub price: BookPrice,
    /// The orders resting at the level, in FIFO arrival order keyed by order id.
    pub orders: IndexMap<OrderId, BookOrder>,
    size_raw: QuantityRaw,
}

impl BookLevel {
    /// Creates a new, empty [`BookLevel`] instance.
    #[must_use]
    pub fn new(price: BookPrice) -> Self {
        Self {
            price,
            orders: IndexMap::new(),
            size_raw: 0,
        }
    }

    /// Creates a new [`BookLevel`] seeded with the given order.
    #[must_use]
    pub fn from_order(price: BookPrice, order: BookOrder) -> Self {
        let mut level = Self::new(price);
        level.orders.insert(order.order_id, order);
        level.size_raw = order.size.raw;
        level
    }

    /// Returns the number of orders at the level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns true if the level has no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns true if an order with the given id rests at the level.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Returns the order at the front of the FIFO queue (highest time priority).
    #[must_use]
    pub fn first(&self) -> Option<&BookOrder> {
        self.orders.values().next()
    }

    /// Returns an iterator over the orders at the level in FIFO order.
    pub fn iter(&self) -> impl Iterator<Item = &BookOrder> {
        self.orders.values()
    }

    /// Returns the orders at the level in FIFO order.
    #[must_use]
    pub fn get_orders(&self) -> Vec<BookOrder> {
        self.orders.values().copied().collect()
    }

    /// Returns the total size of all orders at the level as an `f64`.
    #[must_use]
    pub fn size(&self) -> f64 {
        self.size_raw as f64 / FIXED_SCALAR
    }

    /// Returns the total size of all orders at the level as the raw fixed-point value.
    #[must_use]
    pub fn size_raw(&self) -> QuantityRaw {
        self.size_raw
    }

    /// Returns the total size of all orders at the level as a `Decimal`.
    #[must_use]
    pub fn size_decimal(&self) -> Decimal {
        self.total_size().as_decimal()
    }

    /// Returns the total size of all orders at the level as a [`Quantity`].
    ///
    /// The precision is taken from the front order, or zero for an empty level.
    #[must_use]
    pub fn total_size(&self) -> Quantity {
        let precision = self.first().map_or(0, |order| order.size.precision);
        Quantity::from_raw(self.size_raw, precision)
    }

    /// Returns the total value exposure (price * size) of all orders at the level.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.price.value.as_f64() * self.size()
    }

    /// Adds the given order to the back of the FIFO queue.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::DuplicateOrderId`] if an order with the same id is
    /// already resting at the level; the level is left unchanged.
    pub fn add(&mut self, order: BookOrder) -> Result<(), BookError> {
        if self.orders.contains_key(&order.order_id) {
            return Err(BookError::DuplicateOrderId {
                order_id: order.order_id,
                price: self.price.value,
            });
        }

        self.size_raw += order.size.raw;
        self.orders.insert(order.order_id, order);
        Ok(())
    }

    /// Amends the size of the order with the given id in place.
    ///
    /// The order keeps its position in the FIFO queue (time priority is not
    /// reset by an amend). An absent id is a no-op.
    pub fn update(&mut self, order_id: OrderId, new_size: Quantity) {
        if let Some(order) = self.orders.get_mut(&order_id) {
            self.size_raw -= order.size.raw;
            self.size_raw += new_size.raw;
            order.size = new_size;
        }
    }

    /// Removes the order with the given id, returning it if present.
    ///
    /// An absent id is a no-op returning `None`.
    pub fn delete(&mut self, order_id: OrderId) -> Option<BookOrder> {
        let removed = self.orders.shift_remove(&order_id);
        if let Some(order) = removed {
            self.size_raw -= order.size.raw;
        }
        removed
    }

    /// Removes all orders from the level and resets the aggregate size.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.size_raw = 0;
    }
}

/// Weak structural equality: two levels are equal when their prices match and
/// their FIFO order sequences match under [`BookOrder`]'s weak (size-only)
/// equality. Order ids do not participate.
impl PartialEq for BookLevel {
    fn eq(&self, other: &Self) -> bool {
        self.price.value == other.price.value && self.orders.values().eq(other.orders.values())
    }
}

impl Display for BookLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(price={}, len={}, size={})",
            stringify!(BookLevel),
            self.price,
            self.len(),
            self.size(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::{OrderSide, OrderSideSpecified},
        types::Price,
    };

    fn bid_level(price: &str) -> BookLevel {
        BookLevel::new(BookPrice::new(Price::from(price), OrderSideSpecified::Buy))
    }

    fn buy_order(price: &str, size: &str, order_id: OrderId) -> BookOrder {
        BookOrder::new(
            OrderSide::Buy,
            Price::from(price),
            Quantity::from(size),
            order_id,
        )
    }

    #[rstest]
    fn test_new_level_is_empty() {
        let level = bid_level("100.00");
        assert!(level.is_empty());
        assert_eq!(level.len(), 0);
        assert_eq!(level.size(), 0.0);
        assert_eq!(level.first(), None);
    }

    #[rstest]
    fn test_add_accumulates_size() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();
        level.add(buy_order("100.00", "5", 2)).unwrap();

        assert_eq!(level.len(), 2);
        assert_eq!(level.size(), 15.0);
        assert_eq!(level.size_raw(), Quantity::from(15).raw);
        assert_eq!(level.exposure(), 1500.0);
    }

    #[rstest]
    fn test_add_duplicate_id_rejected() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();

        let result = level.add(buy_order("100.00", "5", 1));
        assert_eq!(
            result,
            Err(BookError::DuplicateOrderId {
                order_id: 1,
                price: Price::from("100.00"),
            })
        );
        // Level unchanged
        assert_eq!(level.len(), 1);
        assert_eq!(level.size(), 10.0);
    }

    #[rstest]
    fn test_update_preserves_fifo_position() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();
        level.add(buy_order("100.00", "20", 2)).unwrap();
        level.add(buy_order("100.00", "30", 3)).unwrap();

        level.update(2, Quantity::from(25));

        let ids: Vec<OrderId> = level.iter().map(|order| order.order_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(level.size(), 65.0);
        assert_eq!(level.orders[&2].size, Quantity::from(25));
    }

    #[rstest]
    fn test_update_absent_id_is_noop() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();

        level.update(42, Quantity::from(99));

        assert_eq!(level.len(), 1);
        assert_eq!(level.size(), 10.0);
    }

    #[rstest]
    fn test_delete_subtracts_size() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();
        level.add(buy_order("100.00", "5", 2)).unwrap();

        let removed = level.delete(1).unwrap();
        assert_eq!(removed.order_id, 1);
        assert_eq!(level.len(), 1);
        assert_eq!(level.size(), 5.0);
        assert_eq!(level.first().unwrap().order_id, 2);
    }

    #[rstest]
    fn test_delete_absent_id_is_noop() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();

        assert_eq!(level.delete(42), None);
        assert_eq!(level.len(), 1);
        assert_eq!(level.size(), 10.0);
    }

    #[rstest]
    fn test_clear() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10", 1)).unwrap();
        level.clear();

        assert!(level.is_empty());
        assert_eq!(level.size(), 0.0);
    }

    #[rstest]
    fn test_weak_equality_ignores_order_ids() {
        let mut lhs = bid_level("100.00");
        lhs.add(buy_order("100.00", "10", 1)).unwrap();
        lhs.add(buy_order("100.00", "5", 2)).unwrap();

        let mut rhs = bid_level("100.00");
        rhs.add(buy_order("100.00", "10", 100)).unwrap();
        rhs.add(buy_order("100.00", "5", 200)).unwrap();

        assert_eq!(lhs, rhs);

        rhs.update(200, Quantity::from(6));
        assert_ne!(lhs, rhs);
    }

    #[rstest]
    fn test_total_size_precision_follows_front_order() {
        let mut level = bid_level("100.00");
        level.add(buy_order("100.00", "10.500", 1)).unwrap();
        level.add(buy_order("100.00", "0.250", 2)).unwrap();

        assert_eq!(level.total_size(), Quantity::from("10.750"));
        assert_eq!(level.total_size().precision, 3);
    }

    mod prop {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            // The running aggregate must equal the sum of member order sizes
            // after any sequence of adds, amends, and removals.
            #[test]
            fn aggregate_size_matches_order_sum(
                ops in proptest::collection::vec(
                    (0_u8..3, 1_u64..10, 1_u64..1_000),
                    1..100,
                ),
            ) {
                let mut level = bid_level("100.00");
                for (op, order_id, size) in ops {
                    match op {
                        0 => {
                            let _ = level.add(BookOrder::new(
                                OrderSide::Buy,
                                Price::from("100.00"),
                                Quantity::from(size),
                                order_id,
                            ));
                        }
                        1 => level.update(order_id, Quantity::from(size)),
                        _ => {
                            level.delete(order_id);
                        }
                    }
                }
                let computed: u64 = level.iter().map(|order| order.size.raw).sum();
                prop_assert_eq!(computed, level.size_raw());
            }

            // In-place amends must never move an order relative to its peers.
            #[test]
            fn updates_never_reorder_fifo(
                sizes in proptest::collection::vec(1_u64..1_000, 2..20),
                updates in proptest::collection::vec((0_u64..20, 1_u64..1_000), 1..50),
            ) {
                let mut level = bid_level("100.00");
                for (i, size) in sizes.iter().enumerate() {
                    level
                        .add(BookOrder::new(
                            OrderSide::Buy,
                            Price::from("100.00"),
                            Quantity::from(*size),
                            i as u64 + 1,
                        ))
                        .unwrap();
                }
                let before: Vec<u64> = level.iter().map(|order| order.order_id).collect();

                for (id, size) in updates {
                    level.update(id % sizes.len() as u64 + 1, Quantity::from(size));
                }

                let after: Vec<u64> = level.iter().map(|order| order.order_id).collect();
                prop_assert_eq!(before, after);
            }
        }
    }
}
