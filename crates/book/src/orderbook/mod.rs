// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Order book components: price levels, side ladders, and the locked book.

pub mod analysis;
pub mod book;
pub mod display;
pub mod error;
pub mod ladder;
pub mod level;


// Re-exports
pub use crate::orderbook::{
    analysis::{BookDifference, book_differences},
    book::OrderBook,
    error::{BookError, BookIntegrityError},
    ladder::BookPrice,
    level::BookLevel,
};
