// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Foundational types and utilities for the ladderbook order book.
//!
//! The `ladderbook-core` crate is designed to be lightweight and to provide zero-cost
//! abstractions wherever possible. It supplies the building blocks used across the
//! ladderbook workspace, including:
//!
//! - Timestamp handling as nanoseconds since the UNIX epoch.
//! - Correctness validation functions.
//! - Decimal precision parsing.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod correctness;
pub mod nanos;
pub mod parsing;

// Re-exports
pub use crate::nanos::UnixNanos;

/// Message for when a mutex guard cannot be acquired due to poisoning.
///
/// Mutex guards should use `expect` rather than handle poison errors.
/// A poisoned mutex indicates a thread panicked while holding the lock,
/// meaning protected data may be in an inconsistent state. Propagating
/// the panic is the idiomatic and safe approach, as continuing with
/// potentially corrupted data would violate safety invariants.
pub const MUTEX_POISONED: &str = "Mutex poisoned";
