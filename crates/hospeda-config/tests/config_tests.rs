// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Hospeda configuration system.

use hospeda_config::diagnostic::{ConfigError, suggest_key};
use hospeda_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_hospeda_config() {
    let toml = r#"
[service]
name = "hospeda-test"
log_level = "debug"

[storage]
database_path = "/tmp/bookings.db"
wal_mode = false

[booking]
code_prefix = "BKG"
default_origin = "airbnb"
cancelled_reservations_block = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "hospeda-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/bookings.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.booking.code_prefix, "BKG");
    assert_eq!(config.booking.default_origin, "airbnb");
    assert!(config.booking.cancelled_reservations_block);
}

/// Unknown field in a section produces an unknown-field error.
#[test]
fn unknown_field_in_booking_produces_error() {
    let toml = r#"
[booking]
code_prefx = "BKG"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("code_prefx"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing sections fall back to defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[service]\nname = \"x\"\n").unwrap();
    assert_eq!(config.storage.database_path, "hospeda.db");
    assert_eq!(config.booking.default_origin, "direct");
}

/// The high-level entry point surfaces validation errors as diagnostics.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[service]
log_level = "loud"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad log level should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level")))
    );
}

/// The unknown-key path produces a typo suggestion.
#[test]
fn unknown_key_gets_a_suggestion() {
    let errors = load_and_validate_str("[storage]\ndatabse_path = \"x.db\"\n")
        .expect_err("unknown key should fail");
    let has_suggestion = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "database_path"
        )
    });
    assert!(has_suggestion, "expected a database_path suggestion: {errors:?}");
}

/// The suggestion helper is usable directly for tooling.
#[test]
fn suggest_key_is_reexported_and_works() {
    assert_eq!(
        suggest_key("wal_mod", &["database_path", "wal_mode"]),
        Some("wal_mode".to_string())
    );
}
