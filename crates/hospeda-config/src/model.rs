// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hospeda booking platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so unrecognized config
//! keys are rejected at startup with an actionable error message.

use serde::{Deserialize, Serialize};

/// Top-level Hospeda configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HospedaConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Booking rules settings.
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "hospeda".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "hospeda.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Booking rules configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Prefix for generated reservation codes (e.g. "RES" -> "RES-000042").
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,

    /// Origin platform recorded for bookings that do not declare one.
    #[serde(default = "default_origin")]
    pub default_origin: String,

    /// Whether cancelled reservations still occupy their date range for
    /// overlap purposes. Off by default: cancelling releases the dates.
    #[serde(default)]
    pub cancelled_reservations_block: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            code_prefix: default_code_prefix(),
            default_origin: default_origin(),
            cancelled_reservations_block: false,
        }
    }
}

fn default_code_prefix() -> String {
    "RES".to_string()
}

fn default_origin() -> String {
    "direct".to_string()
}
