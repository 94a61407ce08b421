// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the storage port and the booking services.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a reservation.
///
/// This is a closed vocabulary: inbound payloads carrying any other string
/// are rejected at the boundary with a validation error rather than stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

/// What a calendar block is holding the dates for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Maintenance,
    Cleaning,
    OwnerUse,
    Administrative,
    Other,
}

/// Which reservation statuses count as occupying their date range.
///
/// The treatment of cancelled reservations is an explicit configuration
/// point rather than a baked-in assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePolicy {
    /// Cancelled reservations release their dates (the default).
    #[default]
    ExcludeCancelled,
    /// Every reservation row blocks, regardless of status.
    AllStatuses,
}

impl ActivePolicy {
    /// Whether a reservation with the given status occupies its range.
    pub fn blocks(&self, status: ReservationStatus) -> bool {
        match self {
            ActivePolicy::ExcludeCancelled => status != ReservationStatus::Cancelled,
            ActivePolicy::AllStatuses => true,
        }
    }
}

/// A date-range hold with guests and financials attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    /// Human-readable booking reference, assigned at creation, immutable.
    pub code: String,
    pub property_id: i64,
    /// Check-in day.
    pub date_start: NaiveDate,
    /// Check-out day. May equal another reservation's check-in day.
    pub date_end: NaiveDate,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub total_reserved: f64,
    pub total_paid: f64,
    pub total_due: f64,
    pub guest_count: i64,
    pub notes: Option<String>,
    pub origin_platform: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to insert a reservation row.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub code: String,
    pub property_id: i64,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub total_reserved: f64,
    pub total_paid: f64,
    pub total_due: f64,
    pub guest_count: i64,
    pub notes: Option<String>,
    pub origin_platform: String,
}

/// Mutable reservation fields for an in-place update. `None` means
/// "leave the stored value unchanged".
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub guest_count: Option<i64>,
    pub total_price: Option<f64>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
    pub origin_platform: Option<String>,
}

impl ReservationChanges {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.date_start.is_none()
            && self.date_end.is_none()
            && self.guest_count.is_none()
            && self.total_price.is_none()
            && self.status.is_none()
            && self.notes.is_none()
            && self.origin_platform.is_none()
    }
}

/// A guest-less calendar hold (maintenance, owner use, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: i64,
    pub property_id: i64,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub kind: BlockKind,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to insert a block row.
#[derive(Debug, Clone)]
pub struct NewBlock {
    pub property_id: i64,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub kind: BlockKind,
    pub description: Option<String>,
}

/// Partial block update. `None` means "leave the stored value unchanged".
#[derive(Debug, Clone, Default)]
pub struct BlockChanges {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub kind: Option<BlockKind>,
    pub description: Option<String>,
}

impl BlockChanges {
    /// Whether either endpoint of the range was supplied.
    pub fn touches_dates(&self) -> bool {
        self.date_start.is_some() || self.date_end.is_some()
    }
}

/// An inclusive date window for list filters and reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Filters for listing blocks. All filters are optional and conjunctive.
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    pub property_id: Option<i64>,
    pub kind: Option<BlockKind>,
    /// Returns blocks intersecting this window
    /// (`date_end >= from AND date_start <= to`).
    pub window: Option<DateWindow>,
}

/// A person associated with one or more reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_type: Option<String>,
    /// Canonical dedup key across booking submissions.
    pub document_number: Option<String>,
    /// Second identity column carried by rows imported from the legacy
    /// system. Never written by new code, but still matched against.
    pub legacy_identity_document: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for inserting a guest row. The legacy identity column is not
/// writable through this type.
#[derive(Debug, Clone, Default)]
pub struct NewGuest {
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Per-property financial totals over a date window. Cancelled
/// reservations are excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub property_id: i64,
    pub reservation_count: i64,
    pub gross_total: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn reservation_status_round_trips_through_strings() {
        let variants = [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
            ReservationStatus::NoShow,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = ReservationStatus::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
        assert_eq!(ReservationStatus::NoShow.to_string(), "no_show");
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!(ReservationStatus::from_str("definitely-not-a-status").is_err());
        assert!(ReservationStatus::from_str("").is_err());
    }

    #[test]
    fn block_kind_serializes_snake_case() {
        let json = serde_json::to_string(&BlockKind::OwnerUse).unwrap();
        assert_eq!(json, "\"owner_use\"");
        let parsed: BlockKind = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(parsed, BlockKind::Maintenance);
    }

    #[test]
    fn active_policy_default_excludes_cancelled() {
        let policy = ActivePolicy::default();
        assert!(policy.blocks(ReservationStatus::Pending));
        assert!(policy.blocks(ReservationStatus::Confirmed));
        assert!(!policy.blocks(ReservationStatus::Cancelled));
    }

    #[test]
    fn active_policy_all_statuses_blocks_cancelled() {
        let policy = ActivePolicy::AllStatuses;
        assert!(policy.blocks(ReservationStatus::Cancelled));
    }

    #[test]
    fn empty_changes_report_empty() {
        assert!(ReservationChanges::default().is_empty());
        let changes = ReservationChanges {
            guest_count: Some(3),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn block_changes_date_detection() {
        assert!(!BlockChanges::default().touches_dates());
        let changes = BlockChanges {
            date_end: NaiveDate::from_ymd_opt(2024, 12, 20),
            ..Default::default()
        };
        assert!(changes.touches_dates());
    }
}
