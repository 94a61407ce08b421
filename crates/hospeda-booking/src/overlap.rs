// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interval overlap predicate shared by every availability check.
//!
//! Two ranges overlap iff `a_start < b_end && a_end > b_start`, strict on
//! both sides: a stay ending on day X and one starting on day X share only
//! the checkout/checkin moment and do not conflict. The SQL overlap counts
//! in `hospeda-storage` encode the same comparison; this module is the
//! predicate's canonical form and what the in-memory store double uses.

use chrono::NaiveDate;

use hospeda_core::HospedaError;

/// Whether two date ranges conflict under the checkout/checkin-same-day
/// convention.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Reject inverted ranges before any persistence attempt.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), HospedaError> {
    if start > end {
        return Err(HospedaError::Validation(format!(
            "date_start {start} is after date_end {end}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn overlapping_ranges_conflict() {
        // Partial overlap on either side.
        assert!(ranges_overlap(day(15), day(18), day(16), day(20)));
        assert!(ranges_overlap(day(16), day(20), day(15), day(18)));
        // Containment.
        assert!(ranges_overlap(day(10), day(20), day(12), day(14)));
        assert!(ranges_overlap(day(12), day(14), day(10), day(20)));
        // Identical ranges.
        assert!(ranges_overlap(day(15), day(18), day(15), day(18)));
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        // Checkout on the 18th, checkin on the 18th.
        assert!(!ranges_overlap(day(15), day(18), day(18), day(21)));
        assert!(!ranges_overlap(day(18), day(21), day(15), day(18)));
    }

    #[test]
    fn disjoint_ranges_do_not_conflict() {
        assert!(!ranges_overlap(day(1), day(5), day(10), day(14)));
        assert!(!ranges_overlap(day(10), day(14), day(1), day(5)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(validate_range(day(18), day(15)).is_err());
        assert!(validate_range(day(15), day(18)).is_ok());
        // A zero-night range is legal input.
        assert!(validate_range(day(15), day(15)).is_ok());
    }
}
