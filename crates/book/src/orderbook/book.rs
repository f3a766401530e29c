// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Provides a performant, thread-safe, generic order book.

use std::{
    fmt::{Debug, Display, Formatter},
    sync::Mutex,
};

use indexmap::IndexMap;
use ladderbook_core::{MUTEX_POISONED, UnixNanos};
use rust_decimal::Decimal;
use ustr::Ustr;

use crate::{
    data::{BookOrder, OrderBookDelta, OrderBookDeltas, OrderId},
    enums::{BookAction, OrderSide, OrderSideSpecified},
    orderbook::{
        display::pprint_book,
        error::{BookError, BookIntegrityError},
        ladder::BookLadder,
        level::BookLevel,
    },
    types::{Price, Quantity},
};

/// The mutable state of an order book, guarded as a unit.
#[derive(Clone, Debug)]
pub(crate) struct BookState {
    pub(crate) bids: BookLadder,
    pub(crate) asks: BookLadder,
    pub(crate) sequence: u64,
    pub(crate) ts_last: UnixNanos,
    pub(crate) update_count: u64,
}

impl BookState {
    fn new() -> Self {
        Self {
            bids: BookLadder::new(OrderSideSpecified::Buy),
            asks: BookLadder::new(OrderSideSpecified::Sell),
            sequence: 0,
            ts_last: UnixNanos::default(),
            update_count: 0,
        }
    }

    fn ladder(&self, side: OrderSideSpecified) -> &BookLadder {
        match side {
            OrderSideSpecified::Buy => &self.bids,
            OrderSideSpecified::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: OrderSideSpecified) -> &mut BookLadder {
        match side {
            OrderSideSpecified::Buy => &mut self.bids,
            OrderSideSpecified::Sell => &mut self.asks,
        }
    }

    // The sequence is caller-owned: stored as given, monotonicity is not
    // validated here. Gap detection belongs to the feed layer.
    fn record_update(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.sequence = sequence;
        self.ts_last = ts_event;
        self.update_count += 1;
    }
}

/// Provides a performant, thread-safe order book keyed off price levels.
///
/// All state sits behind a single coarse [`Mutex`], so every operation takes
/// `&self` and the book can be shared across threads behind an `Arc` without
/// external locking. Mutations and queries each acquire the lock once.
pub struct OrderBook {
    /// The instrument ID for the book.
    pub instrument_id: Ustr,
    inner: Mutex<BookState>,
}

impl OrderBook {
    /// Creates a new, empty [`OrderBook`] instance.
    #[must_use]
    pub fn new(instrument_id: Ustr) -> Self {
        Self {
            instrument_id,
            inner: Mutex::new(BookState::new()),
        }
    }

    /// Adds the given order to the book.
    ///
    /// # Errors
    ///
    /// Returns an error:
    /// - If the order side is not `BUY` or `SELL`.
    /// - If the order id already rests on that side of the book.
    pub fn add(
        &self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = specified(order.side)?;
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.ladder_mut(side).add(order)?;
        state.record_update(sequence, ts_event);
        Ok(())
    }

    /// Amends the size of the resting order with the given id.
    ///
    /// The order keeps its time priority at its price level. An absent id is a
    /// no-op; the sequence and timestamp still advance since the event was
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn update(
        &self,
        side: OrderSide,
        order_id: OrderId,
        new_size: Quantity,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = specified(side)?;
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.ladder_mut(side).update(order_id, new_size);
        state.record_update(sequence, ts_event);
        Ok(())
    }

    /// Removes the resting order with the given id, returning it if present.
    ///
    /// An absent id is a no-op returning `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn delete(
        &self,
        side: OrderSide,
        order_id: OrderId,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<Option<BookOrder>, BookError> {
        let side = specified(side)?;
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        let removed = state.ladder_mut(side).delete(order_id);
        state.record_update(sequence, ts_event);
        Ok(removed)
    }

    /// Inserts or amends the given order by id (see [`BookLadder::upsert`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the order side is not `BUY` or `SELL`.
    pub fn upsert(
        &self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = specified(order.side)?;
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.ladder_mut(side).upsert(order);
        state.record_update(sequence, ts_event);
        Ok(())
    }

    /// Replaces the level at the order's price with that single order
    /// (see [`BookLadder::replace_level`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the order side is not `BUY` or `SELL`.
    pub fn replace_level(
        &self,
        order: BookOrder,
        sequence: u64,
        ts_event: UnixNanos,
    ) -> Result<(), BookError> {
        let side = specified(order.side)?;
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.ladder_mut(side).replace_level(order);
        state.record_update(sequence, ts_event);
        Ok(())
    }

    /// Applies the given delta to the book.
    ///
    /// `Add` inserts the delta's order, `Update` upserts it, `Delete` removes
    /// it by id, and `Clear` resets both sides.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as the dispatched operation.
    pub fn apply_delta(&self, delta: &OrderBookDelta) -> Result<(), BookError> {
        let order = delta.order;
        match delta.action {
            BookAction::Add => self.add(order, delta.sequence, delta.ts_event),
            BookAction::Update => self.upsert(order, delta.sequence, delta.ts_event),
            BookAction::Delete => self
                .delete(order.side, order.order_id, delta.sequence, delta.ts_event)
                .map(|_| ()),
            BookAction::Clear => {
                self.clear(delta.sequence, delta.ts_event);
                Ok(())
            }
        }
    }

    /// Applies the given batch of deltas to the book, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; deltas already applied remain.
    pub fn apply_deltas(&self, deltas: &OrderBookDeltas) -> Result<(), BookError> {
        for delta in &deltas.deltas {
            self.apply_delta(delta)?;
        }
        Ok(())
    }

    /// Removes all orders from both sides of the book.
    pub fn clear(&self, sequence: u64, ts_event: UnixNanos) {
        log::debug!("Clearing book {}", self.instrument_id);
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.bids.clear();
        state.asks.clear();
        state.record_update(sequence, ts_event);
    }

    /// Removes all orders from the bid side of the book.
    pub fn clear_bids(&self, sequence: u64, ts_event: UnixNanos) {
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.bids.clear();
        state.record_update(sequence, ts_event);
    }

    /// Removes all orders from the ask side of the book.
    pub fn clear_asks(&self, sequence: u64, ts_event: UnixNanos) {
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        state.asks.clear();
        state.record_update(sequence, ts_event);
    }

    /// Resets the book to its initial empty state, including counters.
    pub fn reset(&self) {
        log::debug!("Resetting book {}", self.instrument_id);
        let mut state = self.inner.lock().expect(MUTEX_POISONED);
        *state = BookState::new();
    }

    /// Returns true if any bids rest in the book.
    #[must_use]
    pub fn has_bid(&self) -> bool {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        !state.bids.is_empty()
    }

    /// Returns true if any asks rest in the book.
    #[must_use]
    pub fn has_ask(&self) -> bool {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        !state.asks.is_empty()
    }

    /// Returns the best bid price, if any bids rest in the book.
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        state.bids.top().map(|level| level.price.value)
    }

    /// Returns the best ask price, if any asks rest in the book.
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        state.asks.top().map(|level| level.price.value)
    }

    /// Returns the aggregate size at the best bid level, if any bids rest in the book.
    #[must_use]
    pub fn best_bid_size(&self) -> Option<Quantity> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        state.bids.top().map(BookLevel::total_size)
    }

    /// Returns the aggregate size at the best ask level, if any asks rest in the book.
    #[must_use]
    pub fn best_ask_size(&self) -> Option<Quantity> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        state.asks.top().map(BookLevel::total_size)
    }

    /// Returns the spread between the best ask and best bid, if both sides have orders.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        match (state.bids.top(), state.asks.top()) {
            (Some(bid), Some(ask)) => Some(ask.price.value.as_f64() - bid.price.value.as_f64()),
            _ => None,
        }
    }

    /// Returns the midpoint of the best bid and ask, if both sides have orders.
    #[must_use]
    pub fn midpoint(&self) -> Option<f64> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        match (state.bids.top(), state.asks.top()) {
            (Some(bid), Some(ask)) => {
                Some((ask.price.value.as_f64() + bid.price.value.as_f64()) / 2.0)
            }
            _ => None,
        }
    }

    /// Returns the best price on the given side, if any orders rest there.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn best_price(&self, side: OrderSide) -> Result<Option<Price>, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).top().map(|level| level.price.value))
    }

    /// Returns the aggregate size at the best level on the given side, if any
    /// orders rest there.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn best_size(&self, side: OrderSide) -> Result<Option<Quantity>, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).top().map(BookLevel::total_size))
    }

    /// Returns the aggregate size resting at the given price, if a level exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn size_at(&self, side: OrderSide, price: Price) -> Result<Option<Quantity>, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state
            .ladder(side)
            .get_level(price)
            .map(BookLevel::total_size))
    }

    /// Returns the resting order with the given id, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn get_order(
        &self,
        side: OrderSide,
        order_id: OrderId,
    ) -> Result<Option<BookOrder>, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).get_order(order_id).copied())
    }

    /// Returns the number of price levels on the given side.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn level_count(&self, side: OrderSide) -> Result<usize, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).len())
    }

    /// Returns the number of orders resting on the given side.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn order_count(&self, side: OrderSide) -> Result<usize, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).order_count())
    }

    /// Returns the total size of all orders on the given side.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn total_size(&self, side: OrderSide) -> Result<f64, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).sizes())
    }

    /// Returns the total value exposure of all orders on the given side.
    ///
    /// # Errors
    ///
    /// Returns an error if `side` is not `BUY` or `SELL`.
    pub fn total_exposure(&self, side: OrderSide) -> Result<f64, BookError> {
        let side = specified(side)?;
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Ok(state.ladder(side).exposures())
    }

    /// Returns a snapshot of the bid levels from best to worst, limited to `depth`
    /// levels if given.
    #[must_use]
    pub fn bids(&self, depth: Option<usize>) -> Vec<BookLevel> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        snapshot_levels(&state.bids, depth)
    }

    /// Returns a snapshot of the ask levels from best to worst, limited to `depth`
    /// levels if given.
    #[must_use]
    pub fn asks(&self, depth: Option<usize>) -> Vec<BookLevel> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        snapshot_levels(&state.asks, depth)
    }

    /// Returns a price → aggregate size snapshot of the bid levels from best
    /// to worst, limited to `depth` levels if given.
    #[must_use]
    pub fn bids_as_map(&self, depth: Option<usize>) -> IndexMap<Decimal, Decimal> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        snapshot_map(&state.bids, depth)
    }

    /// Returns a price → aggregate size snapshot of the ask levels from best
    /// to worst, limited to `depth` levels if given.
    #[must_use]
    pub fn asks_as_map(&self, depth: Option<usize>) -> IndexMap<Decimal, Decimal> {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        snapshot_map(&state.asks, depth)
    }

    /// Returns the last sequence number applied to the book.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.inner.lock().expect(MUTEX_POISONED).sequence
    }

    /// Returns the UNIX timestamp (nanoseconds) of the last applied event.
    #[must_use]
    pub fn ts_last(&self) -> UnixNanos {
        self.inner.lock().expect(MUTEX_POISONED).ts_last
    }

    /// Returns the number of events applied to the book.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.inner.lock().expect(MUTEX_POISONED).update_count
    }

    /// Verifies the internal consistency of the book.
    ///
    /// # Errors
    ///
    /// Returns an error:
    /// - If the best bid price crosses the best ask price.
    /// - If any level's running aggregate differs from the sum of its orders.
    /// - If any cached order id points at a price with no resident level.
    pub fn check_integrity(&self) -> Result<(), BookIntegrityError> {
        let state = self.inner.lock().expect(MUTEX_POISONED);

        if let (Some(bid), Some(ask)) = (state.bids.top(), state.asks.top()) {
            if bid.price.value > ask.price.value {
                return Err(BookIntegrityError::OrdersCrossed(bid.price, ask.price));
            }
        }

        for ladder in [&state.bids, &state.asks] {
            for (price, level) in &ladder.levels {
                let computed: u64 = level.iter().map(|order| order.size.raw).sum();
                if computed != level.size_raw() {
                    return Err(BookIntegrityError::SizeMismatch {
                        price: *price,
                        aggregate: level.size_raw(),
                        computed,
                    });
                }
            }
            for (order_id, price) in ladder.cache() {
                let resident = ladder
                    .levels
                    .get(price)
                    .is_some_and(|level| level.contains(*order_id));
                if !resident {
                    return Err(BookIntegrityError::OrphanedOrderId {
                        order_id: *order_id,
                        price: *price,
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns a string representation of the top `num_levels` of the book,
    /// rendered as a table.
    #[must_use]
    pub fn pprint(&self, num_levels: usize) -> String {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        pprint_book(&state.bids, &state.asks, num_levels)
    }
}

/// Cloning produces an independent book with its own lock; the source book
/// is locked once while its state is copied.
impl Clone for OrderBook {
    fn clone(&self) -> Self {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        Self {
            instrument_id: self.instrument_id,
            inner: Mutex::new(state.clone()),
        }
    }
}

/// Weak structural equality: two books are equal when their bid and ask
/// ladders match under weak level equality and their sequence numbers match.
/// Instrument ids, timestamps, and update counts do not participate.
impl PartialEq for OrderBook {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // Lock in address order so comparing A with B and B with A concurrently
        // cannot deadlock.
        let (first, second) = if std::ptr::from_ref(self) < std::ptr::from_ref(other) {
            (self, other)
        } else {
            (other, self)
        };
        let lhs = first.inner.lock().expect(MUTEX_POISONED);
        let rhs = second.inner.lock().expect(MUTEX_POISONED);
        lhs.bids == rhs.bids && lhs.asks == rhs.asks && lhs.sequence == rhs.sequence
    }
}

impl Debug for OrderBook {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        f.debug_struct(stringify!(OrderBook))
            .field("instrument_id", &self.instrument_id)
            .field("bids", &state.bids)
            .field("asks", &state.asks)
            .field("sequence", &state.sequence)
            .field("ts_last", &state.ts_last)
            .field("update_count", &state.update_count)
            .finish()
    }
}

impl Display for OrderBook {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock().expect(MUTEX_POISONED);
        write!(
            f,
            "{}(instrument_id={}, update_count={})",
            stringify!(OrderBook),
            self.instrument_id,
            state.update_count,
        )
    }
}

fn specified(side: OrderSide) -> Result<OrderSideSpecified, BookError> {
    side.as_specified().ok_or(BookError::InvalidSide(side))
}

fn snapshot_levels(ladder: &BookLadder, depth: Option<usize>) -> Vec<BookLevel> {
    let depth = depth.unwrap_or(usize::MAX);
    ladder.levels.values().take(depth).cloned().collect()
}

fn snapshot_map(ladder: &BookLadder, depth: Option<usize>) -> IndexMap<Decimal, Decimal> {
    let depth = depth.unwrap_or(usize::MAX);
    ladder
        .levels
        .values()
        .take(depth)
        .map(|level| (level.price.value.as_decimal(), level.size_decimal()))
        .collect()
}
