// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express,
//! such as non-empty paths and a known log level.

use crate::diagnostic::ConfigError;
use crate::model::HospedaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HospedaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "service.name must not be empty".to_string(),
        });
    }

    let level = config.service.log_level.trim();
    if !LOG_LEVELS.contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level `{level}` is not one of: {}",
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.booking.code_prefix.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "booking.code_prefix must not be empty".to_string(),
        });
    }

    if config.booking.default_origin.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "booking.default_origin must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
