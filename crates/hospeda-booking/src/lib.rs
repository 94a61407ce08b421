// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking domain services for the Hospeda rental platform.
//!
//! The services here own the business rules and stay persistence-agnostic
//! behind the [`BookingStore`] port:
//! - [`ReservationService`] creates or updates reservations from inbound
//!   booking payloads, enforcing availability
//! - [`BlockService`] manages manual date blocks with the same overlap rules
//! - [`GuestService`] reconciles submitted guest lists against stored guests
//! - [`ReportService`] aggregates reservation financials

pub mod block;
pub mod guest;
pub mod overlap;
pub mod report;
pub mod reservation;
pub mod testing;

pub use block::BlockService;
pub use guest::{GuestService, GuestSubmission};
pub use overlap::{ranges_overlap, validate_range};
pub use report::ReportService;
pub use reservation::{BookingRequest, ReservationService};

use hospeda_config::BookingConfig;
use hospeda_core::types::ActivePolicy;

/// Derive the overlap policy the services share from configuration.
pub fn active_policy(config: &BookingConfig) -> ActivePolicy {
    if config.cancelled_reservations_block {
        ActivePolicy::AllStatuses
    } else {
        ActivePolicy::ExcludeCancelled
    }
}
