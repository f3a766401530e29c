// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Value types for the order book domain, such as `Price` and `Quantity`.

pub mod fixed;
pub mod price;
pub mod quantity;

// Re-exports
pub use crate::types::{
    price::{PRICE_MAX, PRICE_MIN, Price},
    quantity::{QUANTITY_MAX, QUANTITY_MIN, Quantity},
};
