// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage port for reservations, blocks, and guests.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::HospedaError;
use crate::types::{
    ActivePolicy, Block, BlockChanges, BlockFilter, DateWindow, Guest, NewBlock, NewGuest,
    NewReservation, Reservation, ReservationChanges, RevenueSummary,
};

/// Port over the relational persistence layer.
///
/// The backend must provide positional parameter binding, retrieval of
/// inserted/updated rows, and affected-row counts for deletes. Consecutive
/// calls are independent units of work; a backend that wants to close the
/// check-then-write race between concurrent callers must do so with its
/// own transaction or constraint machinery.
#[async_trait]
pub trait BookingStore: Send + Sync {
    // --- Overlap counting ---

    /// Count reservations for `property_id` whose range overlaps
    /// `[start, end)` under strict comparison (touching endpoints do not
    /// overlap). `exclude_id` lets an update ignore its own row. Only
    /// statuses admitted by `policy` are counted.
    async fn count_reservation_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
        policy: ActivePolicy,
    ) -> Result<u32, HospedaError>;

    /// Count blocks for `property_id` whose range overlaps `[start, end)`
    /// under the same strict comparison.
    async fn count_block_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<u32, HospedaError>;

    // --- Reservations ---

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, HospedaError>;

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, HospedaError>;

    async fn update_reservation(
        &self,
        id: i64,
        changes: ReservationChanges,
    ) -> Result<Reservation, HospedaError>;

    /// Allocate the next human-readable reservation code with the given
    /// prefix. Codes are sequential and collision-free under the backend's
    /// write serialization.
    async fn next_reservation_code(&self, prefix: &str) -> Result<String, HospedaError>;

    // --- Blocks ---

    async fn get_block(&self, id: i64) -> Result<Option<Block>, HospedaError>;

    async fn insert_block(&self, block: NewBlock) -> Result<Block, HospedaError>;

    async fn update_block(&self, id: i64, changes: BlockChanges)
    -> Result<Block, HospedaError>;

    /// Remove a block. Returns whether a row was actually deleted, letting
    /// the caller distinguish "deleted" from "already absent".
    async fn delete_block(&self, id: i64) -> Result<bool, HospedaError>;

    /// List blocks matching the filter, ordered by start date ascending.
    async fn list_blocks(&self, filter: BlockFilter) -> Result<Vec<Block>, HospedaError>;

    // --- Guests ---

    /// Find guests whose canonical document number, or legacy identity
    /// document, matches any of the supplied numbers. Implementations must
    /// issue a single parameterized query binding one value per
    /// placeholder.
    async fn find_guests_by_documents(
        &self,
        documents: &[String],
    ) -> Result<Vec<Guest>, HospedaError>;

    async fn insert_guest(&self, guest: NewGuest) -> Result<Guest, HospedaError>;

    /// Associate a guest with a reservation. Linking an already-linked
    /// pair is a no-op, not an error.
    async fn link_guest(
        &self,
        reservation_id: i64,
        guest_id: i64,
        is_primary: bool,
    ) -> Result<(), HospedaError>;

    // --- Reporting ---

    /// Aggregate non-cancelled reservation financials for a property over
    /// a date window.
    async fn revenue_summary(
        &self,
        property_id: i64,
        window: DateWindow,
    ) -> Result<RevenueSummary, HospedaError>;
}
