// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hospeda booking platform.
//!
//! This crate provides the entity types, the error taxonomy, and the
//! storage port trait shared by every crate in the workspace. Nothing in
//! here talks to a database; the concrete backend lives in
//! `hospeda-storage` and the business rules in `hospeda-booking`.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HospedaError;
pub use traits::BookingStore;
pub use types::{
    ActivePolicy, Block, BlockChanges, BlockFilter, BlockKind, DateWindow, Guest, NewBlock,
    NewGuest, NewReservation, Reservation, ReservationChanges, ReservationStatus,
    RevenueSummary,
};
