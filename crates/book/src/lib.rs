// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! An in-memory limit order book with price-ordered ladders and FIFO time priority.
//!
//! The `ladderbook` crate is the book-keeping core beneath a market-data or matching
//! pipeline. It maintains a pair of price-ordered ladders (bids descending, asks
//! ascending) which aggregate resting orders by price level, preserve per-level FIFO
//! order queues, and support O(log L) price-level access plus O(1) per-order
//! mutation by identifier.
//!
//! The crate provides:
//!
//! - Fixed-point [`Price`](types::Price) and [`Quantity`](types::Quantity) value types.
//! - [`BookOrder`](data::BookOrder) and order book delta types for feed application.
//! - The [`OrderBook`](orderbook::OrderBook) with thread-safe best-quote queries.
//!
//! Order matching, execution, and network ingestion are out of scope; collaborators
//! decode venue messages into the book's mutation entry points and query the read
//! surface for best prices and per-level quantities.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod data;
pub mod enums;
pub mod orderbook;
pub mod types;

// Re-exports
pub use crate::{
    data::{BookOrder, OrderBookDelta, OrderBookDeltas, OrderId},
    enums::{BookAction, OrderSide, OrderSideSpecified},
    orderbook::{BookError, BookIntegrityError, BookLevel, BookPrice, OrderBook},
    types::{Price, Quantity},
};
