// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Core parsing functions.

/// Returns the decimal precision inferred from the given string.
///
/// For scientific notation with large negative exponents the precision is clamped
/// to `u8::MAX`, which is beyond the representable precision of any fixed-point
/// type in this system.
///
/// # Panics
///
/// Panics if the input string uses scientific notation with a missing or
/// non-numeric exponent (e.g. `"1e-"` or `"1e-abc"`).
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn precision_from_str(s: &str) -> u8 {
    let s = s.trim().to_ascii_lowercase();

    if s.contains("e-") {
        let exponent_str = s
            .split("e-")
            .nth(1)
            .expect("Invalid scientific notation format: missing exponent after 'e-'");

        return match exponent_str.parse::<u64>() {
            Ok(exp) => exp.min(u64::from(u8::MAX)) as u8,
            Err(_) => {
                assert!(
                    !exponent_str.is_empty(),
                    "Invalid scientific notation format: missing exponent after 'e-'"
                );
                if exponent_str.chars().all(|c| c.is_ascii_digit()) {
                    // Numeric but larger than u64::MAX, clamp
                    u8::MAX
                } else {
                    panic!(
                        "Invalid scientific notation exponent '{exponent_str}': must be a valid number"
                    )
                }
            }
        };
    }

    if let Some((_, decimal_part)) = s.split_once('.') {
        decimal_part.len().min(usize::from(u8::MAX)) as u8
    } else {
        0
    }
}
