// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `BookingStore` port.

use async_trait::async_trait;
use chrono::NaiveDate;

use hospeda_config::StorageConfig;
use hospeda_core::types::{
    ActivePolicy, Block, BlockChanges, BlockFilter, DateWindow, Guest, NewBlock, NewGuest,
    NewReservation, Reservation, ReservationChanges, RevenueSummary,
};
use hospeda_core::{BookingStore, HospedaError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed booking store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. One instance owns the single writer connection;
/// clone-free sharing goes through `Arc<SqliteStore>`.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store described by the storage config, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, HospedaError> {
        let db = Database::open_with_options(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Wrap an already opened database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Checkpoint and release the underlying connection.
    pub async fn close(&self) -> Result<(), HospedaError> {
        self.db.close().await
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn count_reservation_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
        policy: ActivePolicy,
    ) -> Result<u32, HospedaError> {
        queries::reservations::count_overlaps(&self.db, property_id, start, end, exclude_id, policy)
            .await
    }

    async fn count_block_overlaps(
        &self,
        property_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<u32, HospedaError> {
        queries::blocks::count_overlaps(&self.db, property_id, start, end, exclude_id).await
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, HospedaError> {
        queries::reservations::get(&self.db, id).await
    }

    async fn insert_reservation(
        &self,
        reservation: NewReservation,
    ) -> Result<Reservation, HospedaError> {
        queries::reservations::insert(&self.db, reservation).await
    }

    async fn update_reservation(
        &self,
        id: i64,
        changes: ReservationChanges,
    ) -> Result<Reservation, HospedaError> {
        queries::reservations::update(&self.db, id, changes)
            .await?
            .ok_or(HospedaError::NotFound {
                entity: "reservation",
                id,
            })
    }

    async fn next_reservation_code(&self, prefix: &str) -> Result<String, HospedaError> {
        queries::reservations::next_code(&self.db, prefix).await
    }

    async fn get_block(&self, id: i64) -> Result<Option<Block>, HospedaError> {
        queries::blocks::get(&self.db, id).await
    }

    async fn insert_block(&self, block: NewBlock) -> Result<Block, HospedaError> {
        queries::blocks::insert(&self.db, block).await
    }

    async fn update_block(
        &self,
        id: i64,
        changes: BlockChanges,
    ) -> Result<Block, HospedaError> {
        queries::blocks::update(&self.db, id, changes)
            .await?
            .ok_or(HospedaError::NotFound { entity: "block", id })
    }

    async fn delete_block(&self, id: i64) -> Result<bool, HospedaError> {
        queries::blocks::delete(&self.db, id).await
    }

    async fn list_blocks(&self, filter: BlockFilter) -> Result<Vec<Block>, HospedaError> {
        queries::blocks::list(&self.db, filter).await
    }

    async fn find_guests_by_documents(
        &self,
        documents: &[String],
    ) -> Result<Vec<Guest>, HospedaError> {
        queries::guests::find_by_documents(&self.db, documents).await
    }

    async fn insert_guest(&self, guest: NewGuest) -> Result<Guest, HospedaError> {
        queries::guests::insert(&self.db, guest).await
    }

    async fn link_guest(
        &self,
        reservation_id: i64,
        guest_id: i64,
        is_primary: bool,
    ) -> Result<(), HospedaError> {
        queries::guests::link(&self.db, reservation_id, guest_id, is_primary).await
    }

    async fn revenue_summary(
        &self,
        property_id: i64,
        window: DateWindow,
    ) -> Result<RevenueSummary, HospedaError> {
        queries::reports::revenue_summary(&self.db, property_id, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hospeda_core::ReservationStatus;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn open_creates_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        assert!(db_path.exists(), "database file should be created");
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_block_is_not_found() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&make_config(
            dir.path().join("nf.db").to_str().unwrap(),
        ))
        .await
        .unwrap();

        let result = store
            .update_block(
                9000,
                BlockChanges {
                    description: Some("painting".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(HospedaError::NotFound { entity: "block", id: 9000 })
        ));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn full_reservation_lifecycle_through_the_port() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&make_config(
            dir.path().join("lifecycle.db").to_str().unwrap(),
        ))
        .await
        .unwrap();

        let code = store.next_reservation_code("RES").await.unwrap();
        assert_eq!(code, "RES-000001");

        let created = store
            .insert_reservation(NewReservation {
                code,
                property_id: 7,
                date_start: day(2025, 4, 1),
                date_end: day(2025, 4, 5),
                status: ReservationStatus::Pending,
                total_price: 640.0,
                total_reserved: 0.0,
                total_paid: 0.0,
                total_due: 640.0,
                guest_count: 2,
                notes: None,
                origin_platform: "direct".to_string(),
            })
            .await
            .unwrap();

        let overlaps = store
            .count_reservation_overlaps(
                7,
                day(2025, 4, 3),
                day(2025, 4, 8),
                None,
                ActivePolicy::ExcludeCancelled,
            )
            .await
            .unwrap();
        assert_eq!(overlaps, 1);

        let updated = store
            .update_reservation(
                created.id,
                ReservationChanges {
                    status: Some(ReservationStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ReservationStatus::Confirmed);

        let guest = store
            .insert_guest(NewGuest {
                name: "Ana".to_string(),
                document_number: Some("D-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        store.link_guest(created.id, guest.id, true).await.unwrap();

        let summary = store
            .revenue_summary(
                7,
                DateWindow {
                    from: day(2025, 4, 1),
                    to: day(2025, 4, 30),
                },
            )
            .await
            .unwrap();
        assert_eq!(summary.reservation_count, 1);
        assert_eq!(summary.gross_total, 640.0);

        store.close().await.unwrap();
    }
}
