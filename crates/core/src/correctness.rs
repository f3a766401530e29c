// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2024-2026 ladderbook contributors.
//
//  Licensed under the MIT License; you may not use this file except in compliance
//  with the License. You may obtain a copy of the License at
//  https://opensource.org/license/mit
// -------------------------------------------------------------------------------------------------

//! Functions for condition and predicate checking.
//!
//! These functions validate assumptions at runtime and return an error with a
//! descriptive message when the condition does not hold. They are intended for
//! constructor and input validation, where failing fast with a clear message is
//! preferable to propagating invalid state.

/// Standard message appended when a correctness check is expected to have passed.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error with `fail_msg` if the predicate is false.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the `f64` `value` is in range [`l`, `r`] (inclusive) and not NaN.
///
/// # Errors
///
/// Returns an error if `value` is NaN, infinite, or outside the inclusive range.
pub fn check_in_range_inclusive_f64(value: f64, l: f64, r: f64, param: &str) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() {
        anyhow::bail!("invalid f64 for '{param}', was {value}")
    }
    if value < l || value > r {
        anyhow::bail!("invalid f64 for '{param}' not in range [{l}, {r}], was {value}")
    }
    Ok(())
}

/// Checks the string `s` is not empty.
///
/// # Errors
///
/// Returns an error if `s` is empty.
pub fn check_valid_string(s: &str, param: &str) -> anyhow::Result<()> {
    if s.is_empty() {
        anyhow::bail!("invalid string for '{param}', was empty")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn test_check_predicate_true(#[case] predicate: bool, #[case] expected: bool) {
        let result = check_predicate_true(predicate, "the predicate was false");
        assert_eq!(result.is_ok(), expected);
    }

    #[rstest]
    #[case(0.0, 0.0, 1.0, true)]
    #[case(1.0, 0.0, 1.0, true)]
    #[case(-0.1, 0.0, 1.0, false)]
    #[case(1.1, 0.0, 1.0, false)]
    #[case(f64::NAN, 0.0, 1.0, false)]
    #[case(f64::INFINITY, 0.0, 1.0, false)]
    fn test_check_in_range_inclusive_f64(
        #[case] value: f64,
        #[case] l: f64,
        #[case] r: f64,
        #[case] expected: bool,
    ) {
        let result = check_in_range_inclusive_f64(value, l, r, "value");
        assert_eq!(result.is_ok(), expected);
    }

    #[rstest]
    #[case("abc", true)]
    #[case("", false)]
    fn test_check_valid_string(#[case] s: &str, #[case] expected: bool) {
        let result = check_valid_string(s, "s");
        assert_eq!(result.is_ok(), expected);
    }
}
