// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest queries: batch document lookup, insertion, and reservation links.

use hospeda_core::HospedaError;
use hospeda_core::types::{Guest, NewGuest};
use rusqlite::params;

use super::{date_to_sql, opt_date_column};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, name, last_name, email, phone, document_type, document_number, \
                       legacy_identity_document, birth_date, created_at, updated_at";

fn read_guest(row: &rusqlite::Row<'_>) -> rusqlite::Result<Guest> {
    Ok(Guest {
        id: row.get(0)?,
        name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        document_type: row.get(5)?,
        document_number: row.get(6)?,
        legacy_identity_document: row.get(7)?,
        birth_date: opt_date_column(row, 8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Find guests whose canonical document number, or legacy identity
/// document, matches any of the supplied numbers.
///
/// One parameterized query; the two `IN` lists get separate placeholder
/// ranges and the bind list carries one value per placeholder.
pub async fn find_by_documents(
    db: &Database,
    documents: &[String],
) -> Result<Vec<Guest>, HospedaError> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }
    let documents: Vec<String> = documents.to_vec();
    db.connection()
        .call(move |conn| -> Result<Vec<Guest>, rusqlite::Error> {
            let n = documents.len();
            let canonical: Vec<String> = (1..=n).map(|i| format!("?{i}")).collect();
            let legacy: Vec<String> = (n + 1..=2 * n).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "SELECT {COLUMNS} FROM guests \
                 WHERE document_number IN ({}) OR legacy_identity_document IN ({}) \
                 ORDER BY id ASC",
                canonical.join(", "),
                legacy.join(", ")
            );

            let bound: Vec<&String> = documents.iter().chain(documents.iter()).collect();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(bound), read_guest)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a guest row and return it as stored.
pub async fn insert(db: &Database, guest: NewGuest) -> Result<Guest, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Guest, rusqlite::Error> {
            conn.execute(
                "INSERT INTO guests (name, last_name, email, phone, document_type, \
                 document_number, birth_date) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    guest.name,
                    guest.last_name,
                    guest.email,
                    guest.phone,
                    guest.document_type,
                    guest.document_number,
                    guest.birth_date.map(date_to_sql),
                ],
            )?;
            let id = conn.last_insert_rowid();
            let sql = format!("SELECT {COLUMNS} FROM guests WHERE id = ?1");
            conn.query_row(&sql, params![id], read_guest)
        })
        .await
        .map_err(map_tr_err)
}

/// Link a guest to a reservation. Re-linking an already-linked pair is a
/// no-op thanks to the UNIQUE join key and `INSERT OR IGNORE`.
pub async fn link(
    db: &Database,
    reservation_id: i64,
    guest_id: i64,
    is_primary: bool,
) -> Result<(), HospedaError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO reservation_guests (reservation_id, guest_id, is_primary) \
                 VALUES (?1, ?2, ?3)",
                params![reservation_id, guest_id, is_primary],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Count links for a reservation.
pub async fn count_links(db: &Database, reservation_id: i64) -> Result<u32, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM reservation_guests WHERE reservation_id = ?1",
                params![reservation_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hospeda_core::ReservationStatus;
    use hospeda_core::types::NewReservation;
    use tempfile::tempdir;

    use crate::queries::reservations;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_guest(name: &str, document: Option<&str>) -> NewGuest {
        NewGuest {
            name: name.to_string(),
            document_number: document.map(str::to_string),
            ..Default::default()
        }
    }

    async fn make_linked_reservation(db: &Database) -> i64 {
        reservations::insert(
            db,
            NewReservation {
                code: "RES-000001".to_string(),
                property_id: 1,
                date_start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                date_end: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                status: ReservationStatus::Pending,
                total_price: 0.0,
                total_reserved: 0.0,
                total_paid: 0.0,
                total_due: 0.0,
                guest_count: 1,
                notes: None,
                origin_platform: "direct".to_string(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn find_matches_canonical_document() {
        let (db, _dir) = setup_db().await;
        insert(&db, make_guest("Ana", Some("X-111"))).await.unwrap();
        insert(&db, make_guest("Bruno", Some("X-222"))).await.unwrap();
        insert(&db, make_guest("Carla", None)).await.unwrap();

        let found = find_by_documents(&db, &["X-111".to_string(), "X-999".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ana");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_matches_legacy_identity_column() {
        let (db, _dir) = setup_db().await;
        // Simulate an imported row that only carries the legacy column.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO guests (name, legacy_identity_document) VALUES (?1, ?2)",
                    params!["Dora", "OLD-77"],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let found = find_by_documents(&db, &["OLD-77".to_string()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dora");
        assert_eq!(found[0].legacy_identity_document.as_deref(), Some("OLD-77"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_with_empty_list_skips_the_query() {
        let (db, _dir) = setup_db().await;
        let found = find_by_documents(&db, &[]).await.unwrap();
        assert!(found.is_empty());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn relink_is_a_no_op() {
        let (db, _dir) = setup_db().await;
        let reservation_id = make_linked_reservation(&db).await;
        let guest = insert(&db, make_guest("Ana", Some("X-111"))).await.unwrap();

        link(&db, reservation_id, guest.id, true).await.unwrap();
        link(&db, reservation_id, guest.id, true).await.unwrap();

        assert_eq!(count_links(&db, reservation_id).await.unwrap(), 1);
        db.close().await.unwrap();
    }
}
