// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block queries: overlap counting, CRUD, and window-filtered listing.

use chrono::NaiveDate;
use hospeda_core::HospedaError;
use hospeda_core::types::{Block, BlockChanges, BlockFilter, NewBlock};
use rusqlite::params;

use super::{date_column, date_to_sql, enum_column};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, property_id, date_start, date_end, kind, description, \
                       created_at, updated_at";

fn read_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    Ok(Block {
        id: row.get(0)?,
        property_id: row.get(1)?,
        date_start: date_column(row, 2)?,
        date_end: date_column(row, 3)?,
        kind: enum_column(row, 4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Count blocks for a property whose range overlaps `[start, end)` under
/// strict comparison. `exclude_id` lets an update ignore its own row.
pub async fn count_overlaps(
    db: &Database,
    property_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<u32, HospedaError> {
    let start = date_to_sql(start);
    let end = date_to_sql(end);
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM blocks \
                 WHERE property_id = ?1 AND date_start < ?2 AND date_end > ?3 \
                 AND id != COALESCE(?4, -1)",
                params![property_id, end, start, exclude_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Get a block by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<Block>, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Option<Block>, rusqlite::Error> {
            let sql = format!("SELECT {COLUMNS} FROM blocks WHERE id = ?1");
            let result = conn.query_row(&sql, params![id], read_block);
            match result {
                Ok(block) => Ok(Some(block)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a block row and return it as stored.
pub async fn insert(db: &Database, block: NewBlock) -> Result<Block, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Block, rusqlite::Error> {
            conn.execute(
                "INSERT INTO blocks (property_id, date_start, date_end, kind, description) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    block.property_id,
                    date_to_sql(block.date_start),
                    date_to_sql(block.date_end),
                    block.kind.to_string(),
                    block.description,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let sql = format!("SELECT {COLUMNS} FROM blocks WHERE id = ?1");
            conn.query_row(&sql, params![id], read_block)
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update to a block. Returns the updated row, or `None`
/// when the id does not resolve. Only supplied fields are written.
pub async fn update(
    db: &Database,
    id: i64,
    changes: BlockChanges,
) -> Result<Option<Block>, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Option<Block>, rusqlite::Error> {
            let mut sets: Vec<String> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

            if let Some(date_start) = changes.date_start {
                values.push(Box::new(date_to_sql(date_start)));
                sets.push(format!("date_start = ?{}", values.len()));
            }
            if let Some(date_end) = changes.date_end {
                values.push(Box::new(date_to_sql(date_end)));
                sets.push(format!("date_end = ?{}", values.len()));
            }
            if let Some(kind) = changes.kind {
                values.push(Box::new(kind.to_string()));
                sets.push(format!("kind = ?{}", values.len()));
            }
            if let Some(description) = changes.description {
                values.push(Box::new(description));
                sets.push(format!("description = ?{}", values.len()));
            }

            if !sets.is_empty() {
                sets.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')".to_string());
                values.push(Box::new(id));
                let sql = format!(
                    "UPDATE blocks SET {} WHERE id = ?{}",
                    sets.join(", "),
                    values.len()
                );
                let affected = conn.execute(&sql, rusqlite::params_from_iter(values))?;
                if affected == 0 {
                    return Ok(None);
                }
            }

            let sql = format!("SELECT {COLUMNS} FROM blocks WHERE id = ?1");
            let result = conn.query_row(&sql, params![id], read_block);
            match result {
                Ok(block) => Ok(Some(block)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a block. Returns whether a row was actually removed.
pub async fn delete(db: &Database, id: i64) -> Result<bool, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let affected = conn.execute("DELETE FROM blocks WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// List blocks matching the filter, ordered by start date ascending.
///
/// The window filter keeps blocks intersecting the requested window:
/// `date_end >= from AND date_start <= to`.
pub async fn list(db: &Database, filter: BlockFilter) -> Result<Vec<Block>, HospedaError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Block>, rusqlite::Error> {
            let mut clauses: Vec<String> = Vec::new();
            let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

            if let Some(property_id) = filter.property_id {
                values.push(Box::new(property_id));
                clauses.push(format!("property_id = ?{}", values.len()));
            }
            if let Some(kind) = filter.kind {
                values.push(Box::new(kind.to_string()));
                clauses.push(format!("kind = ?{}", values.len()));
            }
            if let Some(window) = filter.window {
                values.push(Box::new(date_to_sql(window.from)));
                clauses.push(format!("date_end >= ?{}", values.len()));
                values.push(Box::new(date_to_sql(window.to)));
                clauses.push(format!("date_start <= ?{}", values.len()));
            }

            let where_clause = if clauses.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", clauses.join(" AND "))
            };
            let sql = format!(
                "SELECT {COLUMNS} FROM blocks{where_clause} ORDER BY date_start ASC"
            );

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values), read_block)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
