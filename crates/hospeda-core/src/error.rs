// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hospeda booking core.

use thiserror::Error;

/// The primary error type used across the storage port and all booking services.
#[derive(Debug, Error)]
pub enum HospedaError {
    /// Malformed input (inverted date range, unknown status string, blank
    /// required field). Always raised before any persistence attempt.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested date range overlaps an existing reservation or block.
    /// Surfaced to the caller as a rejection; never retried automatically.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// A referenced id did not resolve for an operation that requires it.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Storage backend errors (connection, query failure, unexpected
    /// constraint violation). Logged and surfaced as an opaque server error.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),
}

impl HospedaError {
    /// Wrap an arbitrary backend error as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HospedaError::Storage {
            source: Box::new(source),
        }
    }

    /// Build a conflict error with the given client-facing message.
    pub fn conflict(message: impl Into<String>) -> Self {
        HospedaError::Conflict {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hospeda_error_has_all_variants() {
        let _validation = HospedaError::Validation("date_start after date_end".into());
        let _conflict = HospedaError::conflict("occupied by reservation");
        let _not_found = HospedaError::NotFound {
            entity: "block",
            id: 42,
        };
        let _storage = HospedaError::storage(std::io::Error::other("disk full"));
        let _config = HospedaError::Config("bad toml".into());
    }

    #[test]
    fn conflict_message_renders() {
        let err = HospedaError::conflict("occupied by another block");
        assert_eq!(err.to_string(), "conflict: occupied by another block");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = HospedaError::NotFound {
            entity: "reservation",
            id: 7,
        };
        assert_eq!(err.to_string(), "reservation not found: 7");
    }
}
