// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation upsert engine: create-or-update with availability checks
//! and guest list handoff.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use hospeda_config::BookingConfig;
use hospeda_core::types::{
    ActivePolicy, NewReservation, Reservation, ReservationChanges, ReservationStatus,
};
use hospeda_core::{BookingStore, HospedaError};

use crate::guest::{GuestService, GuestSubmission};
use crate::overlap::validate_range;

/// An inbound booking payload, possibly referencing an existing
/// reservation and carrying the full guest list for it.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// When set and resolving, the reservation is updated in place. An id
    /// that does not resolve falls through to creation; that tolerance is
    /// deliberate, not a bug.
    pub reservation_id: Option<i64>,
    pub property_id: i64,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Status string, validated against the closed vocabulary.
    pub status: Option<String>,
    pub total_price: Option<f64>,
    pub total_reserved: Option<f64>,
    pub total_paid: Option<f64>,
    pub total_due: Option<f64>,
    pub guest_count: Option<i64>,
    pub notes: Option<String>,
    pub origin_platform: Option<String>,
    #[serde(default)]
    pub guests: Vec<GuestSubmission>,
}

/// Creates or updates reservations from booking payloads.
///
/// Availability is re-validated whenever the effective date range is new
/// or changed, or when a status change makes a non-blocking reservation
/// block again; a failed check prevents the write it was guarding.
pub struct ReservationService {
    store: Arc<dyn BookingStore>,
    guests: GuestService,
    policy: ActivePolicy,
    code_prefix: String,
    default_origin: String,
}

impl ReservationService {
    pub fn new(store: Arc<dyn BookingStore>, config: &BookingConfig) -> Self {
        let policy = crate::active_policy(config);
        Self {
            guests: GuestService::new(store.clone()),
            store,
            policy,
            code_prefix: config.code_prefix.clone(),
            default_origin: config.default_origin.clone(),
        }
    }

    /// Create a new reservation or update the one the payload references,
    /// then synchronize its guest list.
    pub async fn upsert(&self, mut request: BookingRequest) -> Result<Reservation, HospedaError> {
        validate_range(request.date_start, request.date_end)?;
        let status = request.status.as_deref().map(parse_status).transpose()?;
        let guests = std::mem::take(&mut request.guests);

        let updated = match request.reservation_id {
            Some(id) => match self.store.get_reservation(id).await? {
                Some(existing) => Some(self.apply_update(&existing, &request, status).await?),
                None => {
                    debug!(
                        reservation_id = id,
                        "supplied reservation id did not resolve; creating instead"
                    );
                    None
                }
            },
            None => None,
        };

        let reservation = match updated {
            Some(reservation) => reservation,
            None => self.create(&request, status).await?,
        };

        if guests.is_empty() {
            debug!(
                reservation_id = reservation.id,
                "no guests supplied; skipping guest processing"
            );
        } else {
            self.guests.reconcile(reservation.id, guests).await?;
        }

        Ok(reservation)
    }

    async fn apply_update(
        &self,
        existing: &Reservation,
        request: &BookingRequest,
        status: Option<ReservationStatus>,
    ) -> Result<Reservation, HospedaError> {
        let range_changed = request.date_start != existing.date_start
            || request.date_end != existing.date_end;
        // A status moving from non-blocking to blocking re-occupies the
        // range, so it needs the same check as a date change.
        let reactivated = status.is_some_and(|new_status| {
            !self.policy.blocks(existing.status) && self.policy.blocks(new_status)
        });
        if range_changed || reactivated {
            self.check_availability(
                existing.property_id,
                request.date_start,
                request.date_end,
                Some(existing.id),
            )
            .await?;
        }

        let changes = ReservationChanges {
            date_start: Some(request.date_start),
            date_end: Some(request.date_end),
            guest_count: request.guest_count,
            total_price: request.total_price,
            status,
            notes: request.notes.clone(),
            origin_platform: request.origin_platform.clone(),
        };
        let updated = self.store.update_reservation(existing.id, changes).await?;
        info!(
            reservation_id = updated.id,
            code = %updated.code,
            range_changed,
            "reservation updated"
        );
        Ok(updated)
    }

    async fn create(
        &self,
        request: &BookingRequest,
        status: Option<ReservationStatus>,
    ) -> Result<Reservation, HospedaError> {
        self.check_availability(request.property_id, request.date_start, request.date_end, None)
            .await?;

        let code = self.store.next_reservation_code(&self.code_prefix).await?;
        let created = self
            .store
            .insert_reservation(NewReservation {
                code,
                property_id: request.property_id,
                date_start: request.date_start,
                date_end: request.date_end,
                status: status.unwrap_or(ReservationStatus::Pending),
                total_price: request.total_price.unwrap_or(0.0),
                total_reserved: request.total_reserved.unwrap_or(0.0),
                total_paid: request.total_paid.unwrap_or(0.0),
                total_due: request.total_due.unwrap_or(0.0),
                guest_count: request.guest_count.unwrap_or(1),
                notes: request.notes.clone(),
                origin_platform: request
                    .origin_platform
                    .clone()
                    .unwrap_or_else(|| self.default_origin.clone()),
            })
            .await?;
        info!(
            reservation_id = created.id,
            code = %created.code,
            property_id = created.property_id,
            "reservation created"
        );
        Ok(created)
    }

    async fn check_availability(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation_id: Option<i64>,
    ) -> Result<(), HospedaError> {
        let reservations = self
            .store
            .count_reservation_overlaps(property_id, start, end, exclude_reservation_id, self.policy)
            .await?;
        if reservations > 0 {
            return Err(HospedaError::conflict("occupied by reservation"));
        }

        let blocks = self
            .store
            .count_block_overlaps(property_id, start, end, None)
            .await?;
        if blocks > 0 {
            return Err(HospedaError::conflict("occupied by a block"));
        }
        Ok(())
    }
}

fn parse_status(value: &str) -> Result<ReservationStatus, HospedaError> {
    value.parse().map_err(|_| {
        HospedaError::Validation(format!("unknown reservation status `{value}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospeda_core::types::{BlockKind, NewBlock};

    use crate::testing::InMemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn request(start: NaiveDate, end: NaiveDate) -> BookingRequest {
        BookingRequest {
            reservation_id: None,
            property_id: 1,
            date_start: start,
            date_end: end,
            status: None,
            total_price: None,
            total_reserved: None,
            total_paid: None,
            total_due: None,
            guest_count: None,
            notes: None,
            origin_platform: None,
            guests: Vec::new(),
        }
    }

    fn service(store: Arc<InMemoryStore>) -> ReservationService {
        ReservationService::new(store, &BookingConfig::default())
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let created = service.upsert(request(day(15), day(18))).await.unwrap();
        assert_eq!(created.code, "RES-000001");
        assert_eq!(created.status, ReservationStatus::Pending);
        assert_eq!(created.origin_platform, "direct");
        assert_eq!(created.total_price, 0.0);
        assert_eq!(created.total_due, 0.0);
        assert_eq!(created.guest_count, 1);
    }

    #[tokio::test]
    async fn overlapping_create_conflicts() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        service.upsert(request(day(15), day(18))).await.unwrap();
        let result = service.upsert(request(day(16), day(20))).await;
        match result {
            Err(HospedaError::Conflict { message }) => {
                assert_eq!(message, "occupied by reservation");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn back_to_back_stays_are_allowed() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        service.upsert(request(day(15), day(18))).await.unwrap();
        // New checkin on the previous checkout day.
        service.upsert(request(day(18), day(21))).await.unwrap();
    }

    #[tokio::test]
    async fn create_over_block_conflicts() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert_block(NewBlock {
                property_id: 1,
                date_start: day(16),
                date_end: day(19),
                kind: BlockKind::Maintenance,
                description: None,
            })
            .await
            .unwrap();
        let service = service(store);

        let result = service.upsert(request(day(15), day(18))).await;
        match result {
            Err(HospedaError::Conflict { message }) => {
                assert_eq!(message, "occupied by a block");
            }
            other => panic!("expected block conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolving_id_updates_in_place() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone());

        let created = service.upsert(request(day(15), day(18))).await.unwrap();
        let mut second = request(day(15), day(18));
        second.reservation_id = Some(created.id);
        second.status = Some("confirmed".to_string());
        second.total_price = Some(720.0);

        let updated = service.upsert(second).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.code, created.code, "code is immutable");
        assert_eq!(updated.status, ReservationStatus::Confirmed);
        assert_eq!(updated.total_price, 720.0);
    }

    #[tokio::test]
    async fn date_change_revalidates_availability() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let first = service.upsert(request(day(10), day(13))).await.unwrap();
        service.upsert(request(day(20), day(24))).await.unwrap();

        // Moving the first stay onto the second must fail.
        let mut moved = request(day(21), day(23));
        moved.reservation_id = Some(first.id);
        let result = service.upsert(moved).await;
        assert!(matches!(result, Err(HospedaError::Conflict { .. })));
    }

    #[tokio::test]
    async fn date_change_excludes_own_row() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let created = service.upsert(request(day(10), day(13))).await.unwrap();
        // Extending overlaps its own stored range; that must not count.
        let mut extended = request(day(10), day(14));
        extended.reservation_id = Some(created.id);
        let updated = service.upsert(extended).await.unwrap();
        assert_eq!(updated.date_end, day(14));
    }

    #[tokio::test]
    async fn unchanged_dates_skip_the_availability_check() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone());

        let created = service.upsert(request(day(10), day(13))).await.unwrap();
        // Force an overlapping row in behind the service's back; if the
        // update below re-checked availability it would now conflict.
        store
            .insert_reservation(NewReservation {
                code: "RES-RAW".to_string(),
                property_id: 1,
                date_start: day(11),
                date_end: day(12),
                status: ReservationStatus::Confirmed,
                total_price: 0.0,
                total_reserved: 0.0,
                total_paid: 0.0,
                total_due: 0.0,
                guest_count: 1,
                notes: None,
                origin_platform: "direct".to_string(),
            })
            .await
            .unwrap();

        let mut notes_only = request(day(10), day(13));
        notes_only.reservation_id = Some(created.id);
        notes_only.notes = Some("late checkin".to_string());
        let updated = service.upsert(notes_only).await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("late checkin"));
    }

    #[tokio::test]
    async fn reactivating_a_cancelled_stay_revalidates_availability() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let first = service.upsert(request(day(10), day(14))).await.unwrap();
        let mut cancel = request(day(10), day(14));
        cancel.reservation_id = Some(first.id);
        cancel.status = Some("cancelled".to_string());
        service.upsert(cancel).await.unwrap();

        // The freed window gets rebooked.
        let mut second = request(day(10), day(14));
        second.status = Some("confirmed".to_string());
        service.upsert(second).await.unwrap();

        // Confirming the cancelled stay again, dates unchanged, must now
        // conflict with the rebooking instead of double-occupying it.
        let mut revive = request(day(10), day(14));
        revive.reservation_id = Some(first.id);
        revive.status = Some("confirmed".to_string());
        let result = service.upsert(revive).await;
        match result {
            Err(HospedaError::Conflict { message }) => {
                assert_eq!(message, "occupied by reservation");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reactivating_into_a_free_window_succeeds() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let first = service.upsert(request(day(10), day(14))).await.unwrap();
        let mut cancel = request(day(10), day(14));
        cancel.reservation_id = Some(first.id);
        cancel.status = Some("cancelled".to_string());
        service.upsert(cancel).await.unwrap();

        let mut revive = request(day(10), day(14));
        revive.reservation_id = Some(first.id);
        revive.status = Some("confirmed".to_string());
        let revived = service.upsert(revive).await.unwrap();
        assert_eq!(revived.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn unresolved_id_falls_through_to_create() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let mut tolerant = request(day(15), day(18));
        tolerant.reservation_id = Some(424242);
        let created = service.upsert(tolerant).await.unwrap();
        assert_ne!(created.id, 424242);
        assert_eq!(created.code, "RES-000001", "a fresh code was allocated");
    }

    #[tokio::test]
    async fn unknown_status_is_a_validation_error() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store);

        let mut bad = request(day(15), day(18));
        bad.status = Some("tentative".to_string());
        let result = service.upsert(bad).await;
        assert!(matches!(result, Err(HospedaError::Validation(_))));
    }

    #[tokio::test]
    async fn inverted_range_is_rejected_before_any_write() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone());

        let result = service.upsert(request(day(18), day(15))).await;
        assert!(matches!(result, Err(HospedaError::Validation(_))));
        assert!(
            store.get_reservation(1).await.unwrap().is_none(),
            "nothing was persisted"
        );
    }

    #[tokio::test]
    async fn guest_list_is_reconciled_after_persisting() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone());

        let mut with_guests = request(day(15), day(18));
        with_guests.guests = vec![
            GuestSubmission {
                name: "Ana".to_string(),
                document_number: Some("D-1".to_string()),
                is_primary: true,
                ..Default::default()
            },
            GuestSubmission {
                name: "Bruno".to_string(),
                ..Default::default()
            },
        ];
        let created = service.upsert(with_guests).await.unwrap();

        assert_eq!(store.guest_count(), 2);
        assert_eq!(store.link_count(created.id), 2);
    }

    #[tokio::test]
    async fn empty_guest_list_is_skipped_not_failed() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(store.clone());

        let created = service.upsert(request(day(15), day(18))).await.unwrap();
        assert_eq!(store.guest_count(), 0);
        assert_eq!(store.link_count(created.id), 0);
    }

    #[tokio::test]
    async fn booking_request_deserializes_from_json() {
        let json = r#"{
            "property_id": 3,
            "date_start": "2024-12-15",
            "date_end": "2024-12-18",
            "status": "confirmed",
            "total_price": 450.0,
            "guests": [
                {"name": "Ana", "document_number": "D-1", "is_primary": true}
            ]
        }"#;
        let request: BookingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.property_id, 3);
        assert_eq!(request.reservation_id, None);
        assert_eq!(request.guests.len(), 1);
        assert!(request.guests[0].is_primary);
    }
}
