// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting aggregates over reservations.

use hospeda_core::types::{DateWindow, RevenueSummary};
use hospeda_core::{HospedaError, ReservationStatus};
use rusqlite::params;

use super::date_to_sql;
use crate::database::{Database, map_tr_err};

/// Aggregate reservation financials for a property over a date window.
///
/// Counts reservations intersecting the window; cancelled reservations are
/// excluded from every total.
pub async fn revenue_summary(
    db: &Database,
    property_id: i64,
    window: DateWindow,
) -> Result<RevenueSummary, HospedaError> {
    let from = date_to_sql(window.from);
    let to = date_to_sql(window.to);
    let sql = format!(
        "SELECT COUNT(*), COALESCE(SUM(total_price), 0), COALESCE(SUM(total_paid), 0), \
         COALESCE(SUM(total_due), 0) \
         FROM reservations \
         WHERE property_id = ?1 AND status != '{}' \
         AND date_end >= ?2 AND date_start <= ?3",
        ReservationStatus::Cancelled
    );
    db.connection()
        .call(move |conn| -> Result<RevenueSummary, rusqlite::Error> {
            conn.query_row(&sql, params![property_id, from, to], |row| {
                Ok(RevenueSummary {
                    property_id,
                    reservation_count: row.get(0)?,
                    gross_total: row.get(1)?,
                    total_paid: row.get(2)?,
                    total_due: row.get(3)?,
                })
            })
        })
        .await
        .map_err(map_tr_err)
}
