// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Represents a ladder of price levels for one side of an order book.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt::{Debug, Display, Formatter},
};

use crate::{
    data::{BookOrder, OrderId},
    enums::OrderSideSpecified,
    orderbook::{error::BookError, level::BookLevel},
    types::{Price, Quantity},
};

/// Represents a price on one side of an order book, used as the ladder key.
///
/// The ordering is side-aware: bid prices sort descending so that for both
/// sides the first key in the ladder is the best price.
#[derive(Clone, Copy, Debug, Eq)]
pub struct BookPrice {
    /// The price value.
    pub value: Price,
    /// The specified order side.
    pub side: OrderSideSpecified,
}

impl BookPrice {
    /// Creates a new [`BookPrice`] instance.
    #[must_use]
    pub fn new(value: Price, side: OrderSideSpecified) -> Self {
        Self { value, side }
    }
}

impl PartialOrd for BookPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.side {
            OrderSideSpecified::Buy => other.value.cmp(&self.value),
            OrderSideSpecified::Sell => self.value.cmp(&other.value),
        }
    }
}

impl PartialEq for BookPrice {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Display for BookPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents one side of an order book as a ladder of price levels.
///
/// Levels are keyed by side-aware [`BookPrice`], so iteration always walks
/// from best to worst. An order-id cache maps every resting id to its price
/// for O(log n) amends and removals without a ladder scan.
pub struct BookLadder {
    /// The specified order side of the ladder.
    pub side: OrderSideSpecified,
    /// The price levels, keyed from best to worst.
    pub levels: BTreeMap<BookPrice, BookLevel>,
    cache: HashMap<OrderId, BookPrice>,
}

impl BookLadder {
    /// Creates a new, empty [`BookLadder`] instance.
    #[must_use]
    pub fn new(side: OrderSideSpecified) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Returns the number of price levels in the ladder.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the ladder has no price levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the total number of orders resting in the ladder.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if an order with the given id rests anywhere in the ladder.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.cache.contains_key(&order_id)
    }

    /// Returns the order with the given id, if resting in the ladder.
    #[must_use]
    pub fn get_order(&self, order_id: OrderId) -> Option<&BookOrder> {
        let price = self.cache.get(&order_id)?;
        self.levels.get(price)?.orders.get(&order_id)
    }

    /// Returns the level at the given price, if present.
    #[must_use]
    pub fn get_level(&self, price: Price) -> Option<&BookLevel> {
        self.levels.get(&BookPrice::new(price, self.side))
    }

    /// Returns the best (top) level of the ladder, if present.
    #[must_use]
    pub fn top(&self) -> Option<&BookLevel> {
        self.levels.values().next()
    }

    /// Adds the given order to the ladder, creating the level if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::DuplicateOrderId`] if an order with the same id is
    /// already resting anywhere in the ladder; the ladder is left unchanged.
    pub fn add(&mut self, order: BookOrder) -> Result<(), BookError> {
        if let Some(existing) = self.cache.get(&order.order_id) {
            return Err(BookError::DuplicateOrderId {
                order_id: order.order_id,
                price: existing.value,
            });
        }

        let book_price = BookPrice::new(order.price, self.side);
        self.cache.insert(order.order_id, book_price);
        match self.levels.get_mut(&book_price) {
            Some(level) => {
                // Cannot collide: the id is absent from the ladder-wide cache
                level.add(order)?;
            }
            None => {
                let level = BookLevel::from_order(book_price, order);
                self.levels.insert(book_price, level);
            }
        }
        Ok(())
    }

    /// Adds the given orders to the ladder, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`BookError`] encountered; orders already applied
    /// remain in the ladder.
    pub fn add_bulk(&mut self, orders: Vec<BookOrder>) -> Result<(), BookError> {
        for order in orders {
            self.add(order)?;
        }
        Ok(())
    }

    /// Amends the size of the order with the given id in place.
    ///
    /// The order keeps its time priority at its price level. An absent id is
    /// a no-op. Amending to zero size keeps the order resting with zero size.
    pub fn update(&mut self, order_id: OrderId, new_size: Quantity) {
        if let Some(price) = self.cache.get(&order_id) {
            if let Some(level) = self.levels.get_mut(price) {
                level.update(order_id, new_size);
            }
        }
    }

    /// Removes the order with the given id, returning it if present.
    ///
    /// The level is pruned from the ladder when its last order is removed.
    /// An absent id is a no-op returning `None`.
    pub fn delete(&mut self, order_id: OrderId) -> Option<BookOrder> {
        let price = self.cache.remove(&order_id)?;
        let level = self.levels.get_mut(&price)?;
        let removed = level.delete(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    /// Inserts or amends the given order by id.
    ///
    /// - Absent id: behaves as [`BookLadder::add`].
    /// - Resting at the same price: amends the size in place, keeping time priority.
    /// - Resting at a different price: removes the old order and adds the new one,
    ///   which places it at the back of the queue at the new price.
    pub fn upsert(&mut self, order: BookOrder) {
        match self.cache.get(&order.order_id) {
            Some(price) if price.value == order.price => {
                self.update(order.order_id, order.size);
            }
            Some(_) => {
                self.delete(order.order_id);
                // Infallible: the id was just removed
                let _ = self.add(order);
            }
            None => {
                let _ = self.add(order);
            }
        }
    }

    /// Replaces the level at the given order's price with that single order.
    ///
    /// Any orders previously resting at the price are dropped and their ids
    /// released. If the order's id currently rests at a different price, it is
    /// removed from there first. A zero-size order clears the level instead.
    pub fn replace_level(&mut self, order: BookOrder) {
        self.delete(order.order_id);

        let book_price = BookPrice::new(order.price, self.side);
        if let Some(level) = self.levels.remove(&book_price) {
            for order_id in level.orders.keys() {
                self.cache.remove(order_id);
            }
        }

        if order.size.is_positive() {
            self.cache.insert(order.order_id, book_price);
            self.levels
                .insert(book_price, BookLevel::from_order(book_price, order));
        }
    }

    /// Removes all levels and orders from the ladder.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.cache.clear();
    }

    /// Returns the total size of all orders in the ladder.
    #[must_use]
    pub fn sizes(&self) -> f64 {
        self.levels.values().map(BookLevel::size).sum()
    }

    /// Returns the total value exposure (price * size) of all orders in the ladder.
    #[must_use]
    pub fn exposures(&self) -> f64 {
        self.levels.values().map(BookLevel::exposure).sum()
    }

    pub(crate) fn cache(&self) -> &HashMap<OrderId, BookPrice> {
        &self.cache
    }
}

/// Weak structural equality: two ladders are equal when their level sequences
/// are equal under [`BookLevel`]'s weak equality.
impl PartialEq for BookLadder {
    fn eq(&self, other: &Self) -> bool {
        self.levels.values().eq(other.levels.values())
    }
}

impl Clone for BookLadder {
    fn clone(&self) -> Self {
        Self {
            side: self.side,
            levels: self.levels.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl Debug for BookLadder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BookLadder))
            .field("side", &self.side)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

impl Display for BookLadder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}(side={})", stringify!(BookLadder), self.side)?;
        for (price, level) in &self.levels {
            writeln!(f, "  {price} -> {} orders, size {}", level.len(), level.size())?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::enums::OrderSide;

    fn order(side: OrderSide, price: &str, size: &str, order_id: OrderId) -> BookOrder {
        BookOrder::new(side, Price::from(price), Quantity::from(size), order_id)
    }

    #[rstest]
    fn test_book_price_bid_sorting() {
        let mut bid_prices = [
            BookPrice::new(Price::from("2.0"), OrderSideSpecified::Buy),
            BookPrice::new(Price::from("4.0"), OrderSideSpecified::Buy),
            BookPrice::new(Price::from("1.0"), OrderSideSpecified::Buy),
            BookPrice::new(Price::from("3.0"), OrderSideSpecified::Buy),
        ];
        bid_prices.sort();
        assert_eq!(bid_prices[0].value, Price::from("4.0"));
        assert_eq!(bid_prices[3].value, Price::from("1.0"));
    }

    #[rstest]
    fn test_book_price_ask_sorting() {
        let mut ask_prices = [
            BookPrice::new(Price::from("2.0"), OrderSideSpecified::Sell),
            BookPrice::new(Price::from("4.0"), OrderSideSpecified::Sell),
            BookPrice::new(Price::from("1.0"), OrderSideSpecified::Sell),
            BookPrice::new(Price::from("3.0"), OrderSideSpecified::Sell),
        ];
        ask_prices.sort();
        assert_eq!(ask_prices[0].value, Price::from("1.0"));
        assert_eq!(ask_prices[3].value, Price::from("4.0"));
    }

    #[rstest]
    fn test_add_creates_and_joins_levels() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Buy, "10.00", "30", 2)).unwrap();
        ladder.add(order(OrderSide::Buy, "9.00", "25", 3)).unwrap();

        assert_eq!(ladder.len(), 2);
        assert_eq!(ladder.order_count(), 3);
        assert_eq!(ladder.sizes(), 75.0);
        assert_eq!(ladder.exposures(), 725.0);

        let top = ladder.top().unwrap();
        assert_eq!(top.price.value, Price::from("10.00"));
        assert_eq!(top.size(), 50.0);
    }

    #[rstest]
    fn test_top_is_best_price_per_side() {
        let mut bids = BookLadder::new(OrderSideSpecified::Buy);
        bids.add(order(OrderSide::Buy, "9.00", "1", 1)).unwrap();
        bids.add(order(OrderSide::Buy, "10.00", "1", 2)).unwrap();
        assert_eq!(bids.top().unwrap().price.value, Price::from("10.00"));

        let mut asks = BookLadder::new(OrderSideSpecified::Sell);
        asks.add(order(OrderSide::Sell, "11.00", "1", 1)).unwrap();
        asks.add(order(OrderSide::Sell, "10.50", "1", 2)).unwrap();
        assert_eq!(asks.top().unwrap().price.value, Price::from("10.50"));
    }

    #[rstest]
    fn test_add_duplicate_id_across_levels_rejected() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        let result = ladder.add(order(OrderSide::Buy, "9.00", "5", 1));
        assert_eq!(
            result,
            Err(BookError::DuplicateOrderId {
                order_id: 1,
                price: Price::from("10.00"),
            })
        );
        assert_eq!(ladder.len(), 1);
        assert_eq!(ladder.order_count(), 1);
    }

    #[rstest]
    fn test_update_amends_size_in_place() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Sell);
        ladder.add(order(OrderSide::Sell, "11.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Sell, "11.00", "30", 2)).unwrap();

        ladder.update(1, Quantity::from(5));

        let level = ladder.get_level(Price::from("11.00")).unwrap();
        assert_eq!(level.size(), 35.0);
        assert_eq!(level.first().unwrap().order_id, 1);
    }

    #[rstest]
    fn test_update_absent_id_is_noop() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        ladder.update(42, Quantity::from(5));

        assert_eq!(ladder.sizes(), 20.0);
        assert_eq!(ladder.order_count(), 1);
    }

    #[rstest]
    fn test_update_to_zero_keeps_order_resting() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        ladder.update(1, Quantity::zero(0));

        assert_eq!(ladder.len(), 1);
        assert!(ladder.contains(1));
        assert_eq!(ladder.sizes(), 0.0);
    }

    #[rstest]
    fn test_delete_prunes_empty_level() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Buy, "9.00", "30", 2)).unwrap();

        let removed = ladder.delete(1).unwrap();
        assert_eq!(removed.order_id, 1);
        assert_eq!(ladder.len(), 1);
        assert!(!ladder.contains(1));
        assert_eq!(ladder.top().unwrap().price.value, Price::from("9.00"));

        // Id can be reused after removal
        ladder.add(order(OrderSide::Buy, "8.00", "1", 1)).unwrap();
        assert_eq!(ladder.order_count(), 2);
    }

    #[rstest]
    fn test_delete_absent_id_is_noop() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        assert_eq!(ladder.delete(42), None);
        assert_eq!(ladder.order_count(), 1);
    }

    #[rstest]
    fn test_upsert_same_price_keeps_priority() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Buy, "10.00", "30", 2)).unwrap();

        ladder.upsert(order(OrderSide::Buy, "10.00", "25", 1));

        let level = ladder.get_level(Price::from("10.00")).unwrap();
        assert_eq!(level.first().unwrap().order_id, 1);
        assert_eq!(level.size(), 55.0);
    }

    #[rstest]
    fn test_upsert_new_price_moves_order() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        ladder.upsert(order(OrderSide::Buy, "9.50", "20", 1));

        assert_eq!(ladder.len(), 1);
        assert!(ladder.get_level(Price::from("10.00")).is_none());
        assert_eq!(ladder.get_order(1).unwrap().price, Price::from("9.50"));
    }

    #[rstest]
    fn test_upsert_absent_id_adds() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Sell);
        ladder.upsert(order(OrderSide::Sell, "11.00", "20", 1));

        assert_eq!(ladder.order_count(), 1);
        assert_eq!(ladder.sizes(), 20.0);
    }

    #[rstest]
    fn test_replace_level_drops_resting_orders() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Buy, "10.00", "30", 2)).unwrap();

        ladder.replace_level(order(OrderSide::Buy, "10.00", "50", 3));

        let level = ladder.get_level(Price::from("10.00")).unwrap();
        assert_eq!(level.len(), 1);
        assert_eq!(level.size(), 50.0);
        assert!(!ladder.contains(1));
        assert!(!ladder.contains(2));

        // Released ids can be re-added
        ladder.add(order(OrderSide::Buy, "9.00", "5", 1)).unwrap();
        assert_eq!(ladder.order_count(), 2);
    }

    #[rstest]
    fn test_replace_level_with_zero_size_clears() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();

        ladder.replace_level(order(OrderSide::Buy, "10.00", "0", 2));

        assert!(ladder.is_empty());
        assert_eq!(ladder.order_count(), 0);
    }

    #[rstest]
    fn test_clear() {
        let mut ladder = BookLadder::new(OrderSideSpecified::Buy);
        ladder.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        ladder.add(order(OrderSide::Buy, "9.00", "30", 2)).unwrap();

        ladder.clear();

        assert!(ladder.is_empty());
        assert_eq!(ladder.order_count(), 0);
        assert_eq!(ladder.sizes(), 0.0);
    }

    #[rstest]
    fn test_weak_equality_compares_level_sequences() {
        let mut lhs = BookLadder::new(OrderSideSpecified::Buy);
        lhs.add(order(OrderSide::Buy, "10.00", "20", 1)).unwrap();
        lhs.add(order(OrderSide::Buy, "9.00", "30", 2)).unwrap();

        let mut rhs = BookLadder::new(OrderSideSpecified::Buy);
        rhs.add(order(OrderSide::Buy, "10.00", "20", 10)).unwrap();
        rhs.add(order(OrderSide::Buy, "9.00", "30", 20)).unwrap();

        assert_eq!(lhs, rhs);

        rhs.update(20, Quantity::from(31));
        assert_ne!(lhs, rhs);
    }
}
