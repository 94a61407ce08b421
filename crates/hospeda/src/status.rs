// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hospeda status` command implementation.
//!
//! Opens the configured database, reports row counts for the core tables,
//! and optionally a revenue summary for one property over the current year.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use hospeda_booking::ReportService;
use hospeda_config::model::HospedaConfig;
use hospeda_core::types::DateWindow;
use hospeda_core::HospedaError;
use hospeda_storage::SqliteStore;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub database_path: String,
    pub reservations: i64,
    pub blocks: i64,
    pub guests: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<RevenueLine>,
}

#[derive(Debug, Serialize)]
pub struct RevenueLine {
    pub property_id: i64,
    pub year: i32,
    pub reservation_count: i64,
    pub gross_total: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

/// Run the `hospeda status` command.
///
/// With `--property`, appends a revenue summary for that property over the
/// current calendar year. With `--json`, emits structured JSON for scripting.
pub async fn run_status(
    config: &HospedaConfig,
    property: Option<i64>,
    json: bool,
) -> Result<(), HospedaError> {
    let db_path = &config.storage.database_path;
    if !std::path::Path::new(db_path).exists() {
        eprintln!("hospeda: database not found at {db_path} (created on first booking)");
        std::process::exit(1);
    }

    let store = std::sync::Arc::new(SqliteStore::open(&config.storage).await?);
    debug!(path = %db_path, "store opened for status inspection");

    let (reservations, blocks, guests) = store
        .database()
        .connection()
        .call(|conn| -> Result<(i64, i64, i64), rusqlite::Error> {
            let count = |conn: &rusqlite::Connection, table: &str| -> Result<i64, rusqlite::Error> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            };
            Ok((
                count(conn, "reservations")?,
                count(conn, "blocks")?,
                count(conn, "guests")?,
            ))
        })
        .await
        .map_err(HospedaError::storage)?;

    let revenue = match property {
        Some(property_id) => {
            let year = Utc::now().year();
            let window = DateWindow {
                from: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            };
            let reports = ReportService::new(store.clone());
            let summary = reports.revenue(property_id, window).await?;
            Some(RevenueLine {
                property_id,
                year,
                reservation_count: summary.reservation_count,
                gross_total: summary.gross_total,
                total_paid: summary.total_paid,
                total_due: summary.total_due,
            })
        }
        None => None,
    };

    // Checkpoint the WAL before exiting, whichever branch ran.
    store.close().await?;

    let response = StatusResponse {
        database_path: db_path.clone(),
        reservations,
        blocks,
        guests,
        revenue,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response)
                .map_err(|e| HospedaError::Validation(e.to_string()))?
        );
        return Ok(());
    }

    println!("database:     {}", response.database_path);
    println!("reservations: {}", response.reservations);
    println!("blocks:       {}", response.blocks);
    println!("guests:       {}", response.guests);
    if let Some(line) = &response.revenue {
        println!(
            "revenue {}:  property {} | {} stays | gross {:.2} | paid {:.2} | due {:.2}",
            line.year,
            line.property_id,
            line.reservation_count,
            line.gross_total,
            line.total_paid,
            line.total_due
        );
    }
    Ok(())
}
