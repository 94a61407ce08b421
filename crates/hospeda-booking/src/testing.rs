// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `BookingStore` double for exercising the services without
//! SQLite. Mirrors the store contract, including strict overlap
//! comparison, the active-status policy, and idempotent guest linking.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use hospeda_core::types::{
    ActivePolicy, Block, BlockChanges, BlockFilter, DateWindow, Guest, NewBlock, NewGuest,
    NewReservation, Reservation, ReservationChanges, ReservationStatus, RevenueSummary,
};
use hospeda_core::{BookingStore, HospedaError};

use crate::overlap::ranges_overlap;

const FIXED_TIMESTAMP: &str = "2026-01-01T00:00:00.000Z";

#[derive(Default)]
struct State {
    reservations: Vec<Reservation>,
    blocks: Vec<Block>,
    guests: Vec<Guest>,
    links: Vec<(i64, i64, bool)>,
    next_id: i64,
    next_code: i64,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Heap-backed booking store for service tests.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a guest row carrying only the legacy identity column, the way
    /// imported rows look.
    pub fn seed_legacy_guest(&self, name: &str, legacy_document: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state.guests.push(Guest {
            id,
            name: name.to_string(),
            last_name: None,
            email: None,
            phone: None,
            document_type: None,
            document_number: None,
            legacy_identity_document: Some(legacy_document.to_string()),
            birth_date: None,
            created_at: FIXED_TIMESTAMP.to_string(),
            updated_at: FIXED_TIMESTAMP.to_string(),
        });
        id
    }

    /// Number of guest rows currently stored.
    pub fn guest_count(&self) -> usize {
        self.state.lock().unwrap().guests.len()
    }

    /// Number of links for one reservation.
    pub fn link_count(&self, reservation_id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|(r, _, _)| *r == reservation_id)
            .count()
    }

    /// Fetch a stored guest by id.
    pub fn guest(&self, id: i64) -> Option<Guest> {
        self.state
            .lock()
            .unwrap()
            .guests
            .iter()
            .find(|g| g.id == id)
            .cloned()
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn count_reservation_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
        policy: ActivePolicy,
    ) -> Result<u32, HospedaError> {
        let state = self.state.lock().unwrap();
        let count = state
            .reservations
            .iter()
            .filter(|r| r.property_id == property_id)
            .filter(|r| Some(r.id) != exclude_id)
            .filter(|r| policy.blocks(r.status))
            .filter(|r| ranges_overlap(r.date_start, r.date_end, start, end))
            .count();
        Ok(count as u32)
    }

    async fn count_block_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<u32, HospedaError> {
        let state = self.state.lock().unwrap();
        let count = state
            .blocks
            .iter()
            .filter(|b| b.property_id == property_id)
            .filter(|b| Some(b.id) != exclude_id)
            .filter(|b| ranges_overlap(b.date_start, b.date_end, start, end))
            .count();
        Ok(count as u32)
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, HospedaError> {
        let state = self.state.lock().unwrap();
        Ok(state.reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let stored = Reservation {
            id,
            code: reservation.code,
            property_id: reservation.property_id,
            date_start: reservation.date_start,
            date_end: reservation.date_end,
            status: reservation.status,
            total_price: reservation.total_price,
            total_reserved: reservation.total_reserved,
            total_paid: reservation.total_paid,
            total_due: reservation.total_due,
            guest_count: reservation.guest_count,
            notes: reservation.notes,
            origin_platform: reservation.origin_platform,
            created_at: FIXED_TIMESTAMP.to_string(),
            updated_at: FIXED_TIMESTAMP.to_string(),
        };
        state.reservations.push(stored.clone());
        Ok(stored)
    }

    async fn update_reservation(
        &self,
        id: i64,
        changes: ReservationChanges,
    ) -> Result<Reservation, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let reservation = state
            .reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(HospedaError::NotFound {
                entity: "reservation",
                id,
            })?;
        if let Some(date_start) = changes.date_start {
            reservation.date_start = date_start;
        }
        if let Some(date_end) = changes.date_end {
            reservation.date_end = date_end;
        }
        if let Some(guest_count) = changes.guest_count {
            reservation.guest_count = guest_count;
        }
        if let Some(total_price) = changes.total_price {
            reservation.total_price = total_price;
        }
        if let Some(status) = changes.status {
            reservation.status = status;
        }
        if let Some(notes) = changes.notes {
            reservation.notes = Some(notes);
        }
        if let Some(origin_platform) = changes.origin_platform {
            reservation.origin_platform = origin_platform;
        }
        Ok(reservation.clone())
    }

    async fn next_reservation_code(&self, prefix: &str) -> Result<String, HospedaError> {
        let mut state = self.state.lock().unwrap();
        state.next_code += 1;
        Ok(format!("{prefix}-{:06}", state.next_code))
    }

    async fn get_block(&self, id: i64) -> Result<Option<Block>, HospedaError> {
        let state = self.state.lock().unwrap();
        Ok(state.blocks.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_block(&self, block: NewBlock) -> Result<Block, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let stored = Block {
            id,
            property_id: block.property_id,
            date_start: block.date_start,
            date_end: block.date_end,
            kind: block.kind,
            description: block.description,
            created_at: FIXED_TIMESTAMP.to_string(),
            updated_at: FIXED_TIMESTAMP.to_string(),
        };
        state.blocks.push(stored.clone());
        Ok(stored)
    }

    async fn update_block(
        &self,
        id: i64,
        changes: BlockChanges,
    ) -> Result<Block, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let block = state
            .blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(HospedaError::NotFound { entity: "block", id })?;
        if let Some(date_start) = changes.date_start {
            block.date_start = date_start;
        }
        if let Some(date_end) = changes.date_end {
            block.date_end = date_end;
        }
        if let Some(kind) = changes.kind {
            block.kind = kind;
        }
        if let Some(description) = changes.description {
            block.description = Some(description);
        }
        Ok(block.clone())
    }

    async fn delete_block(&self, id: i64) -> Result<bool, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let before = state.blocks.len();
        state.blocks.retain(|b| b.id != id);
        Ok(state.blocks.len() < before)
    }

    async fn list_blocks(&self, filter: BlockFilter) -> Result<Vec<Block>, HospedaError> {
        let state = self.state.lock().unwrap();
        let mut blocks: Vec<Block> = state
            .blocks
            .iter()
            .filter(|b| filter.property_id.is_none_or(|p| b.property_id == p))
            .filter(|b| filter.kind.is_none_or(|k| b.kind == k))
            .filter(|b| {
                filter
                    .window
                    .is_none_or(|w| b.date_end >= w.from && b.date_start <= w.to)
            })
            .cloned()
            .collect();
        blocks.sort_by_key(|b| b.date_start);
        Ok(blocks)
    }

    async fn find_guests_by_documents(
        &self,
        documents: &[String],
    ) -> Result<Vec<Guest>, HospedaError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .guests
            .iter()
            .filter(|g| {
                g.document_number
                    .as_ref()
                    .is_some_and(|d| documents.contains(d))
                    || g.legacy_identity_document
                        .as_ref()
                        .is_some_and(|d| documents.contains(d))
            })
            .cloned()
            .collect())
    }

    async fn insert_guest(&self, guest: NewGuest) -> Result<Guest, HospedaError> {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let stored = Guest {
            id,
            name: guest.name,
            last_name: guest.last_name,
            email: guest.email,
            phone: guest.phone,
            document_type: guest.document_type,
            document_number: guest.document_number,
            legacy_identity_document: None,
            birth_date: guest.birth_date,
            created_at: FIXED_TIMESTAMP.to_string(),
            updated_at: FIXED_TIMESTAMP.to_string(),
        };
        state.guests.push(stored.clone());
        Ok(stored)
    }

    async fn link_guest(
        &self,
        reservation_id: i64,
        guest_id: i64,
        is_primary: bool,
    ) -> Result<(), HospedaError> {
        let mut state = self.state.lock().unwrap();
        let already = state
            .links
            .iter()
            .any(|(r, g, _)| *r == reservation_id && *g == guest_id);
        if !already {
            state.links.push((reservation_id, guest_id, is_primary));
        }
        Ok(())
    }

    async fn revenue_summary(
        &self,
        property_id: i64,
        window: DateWindow,
    ) -> Result<RevenueSummary, HospedaError> {
        let state = self.state.lock().unwrap();
        let mut summary = RevenueSummary {
            property_id,
            reservation_count: 0,
            gross_total: 0.0,
            total_paid: 0.0,
            total_due: 0.0,
        };
        for r in state
            .reservations
            .iter()
            .filter(|r| r.property_id == property_id)
            .filter(|r| r.status != ReservationStatus::Cancelled)
            .filter(|r| r.date_end >= window.from && r.date_start <= window.to)
        {
            summary.reservation_count += 1;
            summary.gross_total += r.total_price;
            summary.total_paid += r.total_paid;
            summary.total_due += r.total_due;
        }
        Ok(summary)
    }
}
