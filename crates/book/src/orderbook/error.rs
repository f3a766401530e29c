// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Errors associated with order book operations and integrity.

use crate::{
    data::OrderId,
    enums::OrderSide,
    orderbook::ladder::BookPrice,
    types::Price,
};

/// Errors returned by order book operations.
///
/// Absent ids and prices are deliberately *not* represented here: updates and
/// deletes of unknown orders are defined no-ops, since feed replays and races
/// between decode and apply are expected in normal operation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    /// A side-dispatch operation received a side outside {BUY, SELL}.
    #[error("Invalid book operation: side must be BUY or SELL, was {0}")]
    InvalidSide(OrderSide),
    /// An add was attempted with an order id already resting in the ladder.
    #[error("Invalid book operation: order_id={order_id} already resting at {price}")]
    DuplicateOrderId {
        /// The rejected order id.
        order_id: OrderId,
        /// The price at which the id is already resting.
        price: Price,
    },
}

/// Errors detected by order book integrity checks.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum BookIntegrityError {
    /// The best bid price is strictly greater than the best ask price.
    #[error("Integrity error: orders in cross [{0} {1}]")]
    OrdersCrossed(BookPrice, BookPrice),
    /// A level's running aggregate does not equal the sum of its member orders.
    #[error(
        "Integrity error: aggregate size {aggregate} != sum of orders {computed} at {price}"
    )]
    SizeMismatch {
        /// The price of the inconsistent level.
        price: BookPrice,
        /// The running aggregate recorded by the level.
        aggregate: u64,
        /// The recomputed sum of member order sizes.
        computed: u64,
    },
    /// A cached order id points at a price with no resident level.
    #[error("Integrity error: order_id={order_id} cached for missing level at {price}")]
    OrphanedOrderId {
        /// The cached order id.
        order_id: OrderId,
        /// The price the cache routes the id to.
        price: BookPrice,
    },
}
