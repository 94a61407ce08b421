// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation queries: overlap counting, CRUD, and code allocation.

use chrono::NaiveDate;
use hospeda_core::types::{ActivePolicy, NewReservation, Reservation, ReservationChanges};
use hospeda_core::{HospedaError, ReservationStatus};
use rusqlite::params;

use super::{date_column, date_to_sql, enum_column};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, code, property_id, date_start, date_end, status, total_price, \
                       total_reserved, total_paid, total_due, guest_count, notes, \
                       origin_platform, created_at, updated_at";

fn read_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        code: row.get(1)?,
        property_id: row.get(2)?,
        date_start: date_column(row, 3)?,
        date_end: date_column(row, 4)?,
        status: enum_column(row, 5)?,
        total_price: row.get(6)?,
        total_reserved: row.get(7)?,
        total_paid: row.get(8)?,
        total_due: row.get(9)?,
        guest_count: row.get(10)?,
        notes: row.get(11)?,
        origin_platform: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Count reservations for a property whose range overlaps `[start, end)`.
///
/// Strict comparison on both sides: a reservation ending on day X does not
/// conflict with one starting on day X. `exclude_id` lets an update ignore
/// its own row; `policy` decides whether cancelled rows count.
pub async fn count_overlaps(
    db: &Database,
    property_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<i64>,
    policy: ActivePolicy,
) -> Result<u32, HospedaError> {
    let mut sql = String::from(
        "SELECT COUNT(*) FROM reservations \
         WHERE property_id = ?1 AND date_start < ?2 AND date_end > ?3 \
         AND id != COALESCE(?4, -1)",
    );
    if policy == ActivePolicy::ExcludeCancelled {
        sql.push_str(&format!(" AND status != '{}'", ReservationStatus::Cancelled));
    }
    let start = date_to_sql(start);
    let end = date_to_sql(end);
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            conn.query_row(&sql, params![property_id, end, start, exclude_id], |row| {
                row.get(0)
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Get a reservation by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<Reservation>, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Option<Reservation>, rusqlite::Error> {
            let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = ?1");
            let result = conn.query_row(&sql, params![id], read_reservation);
            match result {
                Ok(reservation) => Ok(Some(reservation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a reservation row and return it as stored.
pub async fn insert(
    db: &Database,
    reservation: NewReservation,
) -> Result<Reservation, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Reservation, rusqlite::Error> {
            conn.execute(
                "INSERT INTO reservations (code, property_id, date_start, date_end, status, \
                 total_price, total_reserved, total_paid, total_due, guest_count, notes, \
                 origin_platform) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    reservation.code,
                    reservation.property_id,
                    date_to_sql(reservation.date_start),
                    date_to_sql(reservation.date_end),
                    reservation.status.to_string(),
                    reservation.total_price,
                    reservation.total_reserved,
                    reservation.total_paid,
                    reservation.total_due,
                    reservation.guest_count,
                    reservation.notes,
                    reservation.origin_platform,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = ?1");
            conn.query_row(&sql, params![id], read_reservation)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update to a reservation. Returns the updated row, or
/// `None` when the id does not resolve. Only supplied fields are written;
/// `updated_at` is always bumped.
pub async fn update(
    db: &Database,
    id: i64,
    changes: ReservationChanges,
) -> Result<Option<Reservation>, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Option<Reservation>, rusqlite::Error> {
            let mut sets: Vec<String> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

            let push = |sets: &mut Vec<String>,
                            values: &mut Vec<Box<dyn rusqlite::ToSql + Send>>,
                            column: &str,
                            value: Box<dyn rusqlite::ToSql + Send>| {
                values.push(value);
                sets.push(format!("{column} = ?{}", values.len()));
            };

            if let Some(date_start) = changes.date_start {
                push(&mut sets, &mut values, "date_start", Box::new(date_to_sql(date_start)));
            }
            if let Some(date_end) = changes.date_end {
                push(&mut sets, &mut values, "date_end", Box::new(date_to_sql(date_end)));
            }
            if let Some(guest_count) = changes.guest_count {
                push(&mut sets, &mut values, "guest_count", Box::new(guest_count));
            }
            if let Some(total_price) = changes.total_price {
                push(&mut sets, &mut values, "total_price", Box::new(total_price));
            }
            if let Some(status) = changes.status {
                push(&mut sets, &mut values, "status", Box::new(status.to_string()));
            }
            if let Some(notes) = changes.notes {
                push(&mut sets, &mut values, "notes", Box::new(notes));
            }
            if let Some(origin_platform) = changes.origin_platform {
                push(&mut sets, &mut values, "origin_platform", Box::new(origin_platform));
            }

            if !sets.is_empty() {
                sets.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')".to_string());
                values.push(Box::new(id));
                let sql = format!(
                    "UPDATE reservations SET {} WHERE id = ?{}",
                    sets.join(", "),
                    values.len()
                );
                let affected = conn.execute(&sql, rusqlite::params_from_iter(values))?;
                if affected == 0 {
                    return Ok(None);
                }
            }

            let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = ?1");
            let result = conn.query_row(&sql, params![id], read_reservation);
            match result {
                Ok(reservation) => Ok(Some(reservation)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Allocate the next sequential reservation code, e.g. "RES-000042".
///
/// The counter read and bump run in one transaction on the single writer
/// thread, so two concurrent allocations can never observe the same value.
pub async fn next_code(db: &Database, prefix: &str) -> Result<String, HospedaError> {
    let prefix = prefix.to_string();
    db.connection()
        .call(move |conn| -> Result<String, rusqlite::Error> {
            let tx = conn.transaction()?;
            let value: i64 = tx.query_row(
                "SELECT next_value FROM reservation_code_sequence WHERE id = 1",
                [],
                |row| row.get(0),
            )?;
            tx.execute(
                "UPDATE reservation_code_sequence SET next_value = next_value + 1 WHERE id = 1",
                [],
            )?;
            tx.commit()?;
            Ok(format!("{prefix}-{value:06}"))
        })
        .await
        .map_err(map_tr_err)
}
