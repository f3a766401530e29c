// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Functions related to order book display.

use tabled::{Table, Tabled, settings::Style};

use crate::{
    orderbook::{ladder::BookLadder, level::BookLevel},
    types::Price,
};

#[derive(Tabled)]
struct BookLevelRow {
    bids: String,
    price: String,
    asks: String,
}

fn format_level(level: &BookLevel) -> String {
    let sizes: Vec<String> = level.iter().map(|order| order.size.to_string()).collect();
    format!("[{}]", sizes.join(", "))
}

/// Renders the top `num_levels` of each ladder as a three-column table with
/// asks above bids, prices descending.
pub(crate) fn pprint_book(bids: &BookLadder, asks: &BookLadder, num_levels: usize) -> String {
    let ask_levels: Vec<&BookLevel> = asks.levels.values().take(num_levels).collect();
    let bid_levels: Vec<&BookLevel> = bids.levels.values().take(num_levels).collect();

    let mut prices: Vec<Price> = ask_levels
        .iter()
        .chain(bid_levels.iter())
        .map(|level| level.price.value)
        .collect();
    prices.sort_unstable();
    prices.dedup();
    prices.reverse();

    let rows: Vec<BookLevelRow> = prices
        .iter()
        .map(|price| {
            let bid = bid_levels.iter().find(|level| level.price.value == *price);
            let ask = ask_levels.iter().find(|level| level.price.value == *price);
            BookLevelRow {
                bids: bid.map(|level| format_level(level)).unwrap_or_default(),
                price: price.to_string(),
                asks: ask.map(|level| format_level(level)).unwrap_or_default(),
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
