// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hospeda.toml` > `~/.config/hospeda/hospeda.toml`
//! > `/etc/hospeda/hospeda.toml` with environment variable overrides via the
//! `HOSPEDA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::HospedaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hospeda/hospeda.toml` (system-wide)
/// 3. `~/.config/hospeda/hospeda.toml` (user XDG config)
/// 4. `./hospeda.toml` (local directory)
/// 5. `HOSPEDA_*` environment variables
pub fn load_config() -> Result<HospedaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HospedaConfig::default()))
        .merge(Toml::file("/etc/hospeda/hospeda.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hospeda/hospeda.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hospeda.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HospedaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HospedaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HospedaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HospedaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay intact: `HOSPEDA_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("HOSPEDA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped,
        // e.g. HOSPEDA_BOOKING_CODE_PREFIX -> "booking_code_prefix".
        let mapped = key
            .as_str()
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("booking_", "booking.", 1);
        mapped.into()
    })
}
