// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Functions for comparing and diagnosing order book state.

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use crate::{
    enums::OrderSideSpecified,
    orderbook::{book::OrderBook, level::BookLevel},
    types::{Price, Quantity},
};

/// A single observed difference between two order books.
///
/// Differences are reported from the perspective of the left book: a
/// `MissingLevel` is present on the left and absent on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookDifference {
    /// A level present in the left book is absent from the right book.
    MissingLevel {
        /// The side of the level.
        side: OrderSideSpecified,
        /// The price of the level.
        price: Price,
        /// The aggregate size at the level in the left book.
        size: Quantity,
    },
    /// A level present in the right book is absent from the left book.
    ExtraLevel {
        /// The side of the level.
        side: OrderSideSpecified,
        /// The price of the level.
        price: Price,
        /// The aggregate size at the level in the right book.
        size: Quantity,
    },
    /// A level exists in both books with different aggregate sizes.
    SizeMismatch {
        /// The side of the level.
        side: OrderSideSpecified,
        /// The price of the level.
        price: Price,
        /// The aggregate size in the left book.
        lhs: Quantity,
        /// The aggregate size in the right book.
        rhs: Quantity,
    },
    /// The books have applied different last sequence numbers.
    SequenceMismatch {
        /// The left book's sequence number.
        lhs: u64,
        /// The right book's sequence number.
        rhs: u64,
    },
}

impl Display for BookDifference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLevel { side, price, size } => {
                write!(f, "missing {side} level at {price} (size {size})")
            }
            Self::ExtraLevel { side, price, size } => {
                write!(f, "extra {side} level at {price} (size {size})")
            }
            Self::SizeMismatch {
                side,
                price,
                lhs,
                rhs,
            } => {
                write!(f, "{side} size at {price}: {lhs} vs {rhs}")
            }
            Self::SequenceMismatch { lhs, rhs } => {
                write!(f, "sequence: {lhs} vs {rhs}")
            }
        }
    }
}

/// Compares two order books level by level and returns every difference found.
///
/// Levels are compared on aggregate size only (order ids and FIFO composition
/// do not participate), matching the books' weak equality. An empty result
/// means the books would compare equal apart from timestamps and update
/// counts.
#[must_use]
pub fn book_differences(lhs: &OrderBook, rhs: &OrderBook) -> Vec<BookDifference> {
    let mut differences = Vec::new();

    diff_side(
        OrderSideSpecified::Buy,
        &lhs.bids(None),
        &rhs.bids(None),
        &mut differences,
    );
    diff_side(
        OrderSideSpecified::Sell,
        &lhs.asks(None),
        &rhs.asks(None),
        &mut differences,
    );

    let lhs_sequence = lhs.sequence();
    let rhs_sequence = rhs.sequence();
    if lhs_sequence != rhs_sequence {
        differences.push(BookDifference::SequenceMismatch {
            lhs: lhs_sequence,
            rhs: rhs_sequence,
        });
    }

    for difference in &differences {
        log::debug!("Book difference: {difference}");
    }

    differences
}

fn diff_side(
    side: OrderSideSpecified,
    lhs_levels: &[BookLevel],
    rhs_levels: &[BookLevel],
    differences: &mut Vec<BookDifference>,
) {
    let rhs_by_price: HashMap<Price, &BookLevel> = rhs_levels
        .iter()
        .map(|level| (level.price.value, level))
        .collect();

    for level in lhs_levels {
        let price = level.price.value;
        match rhs_by_price.get(&price) {
            Some(other) if other.size_raw() == level.size_raw() => {}
            Some(other) => differences.push(BookDifference::SizeMismatch {
                side,
                price,
                lhs: level.total_size(),
                rhs: other.total_size(),
            }),
            None => differences.push(BookDifference::MissingLevel {
                side,
                price,
                size: level.total_size(),
            }),
        }
    }

    for level in rhs_levels {
        let price = level.price.value;
        if !lhs_levels.iter().any(|lhs| lhs.price.value == price) {
            differences.push(BookDifference::ExtraLevel {
                side,
                price,
                size: level.total_size(),
            });
        }
    }
}
