// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guest reconciliation: dedupe submitted guests by document number, create
//! the rest, and link everyone to the reservation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use hospeda_core::types::NewGuest;
use hospeda_core::{BookingStore, HospedaError};

/// One guest entry as submitted with a booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestSubmission {
    pub name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Synchronizes a reservation's guest list against stored guests.
///
/// Running it twice with the same list converges: matched guests keep
/// their stored fields, and the UNIQUE join key makes re-linking a no-op.
pub struct GuestService {
    store: Arc<dyn BookingStore>,
}

impl GuestService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Reconcile the submitted guest list for one reservation.
    ///
    /// Guests carrying a document number are looked up in one batch query;
    /// matches reuse the stored guest untouched, misses become new rows.
    /// Guests without a document number are always created.
    pub async fn reconcile(
        &self,
        reservation_id: i64,
        submissions: Vec<GuestSubmission>,
    ) -> Result<(), HospedaError> {
        let sanitized: Vec<GuestSubmission> = submissions
            .into_iter()
            .map(sanitize)
            .collect::<Result<_, _>>()?;

        let documents: Vec<String> = sanitized
            .iter()
            .filter_map(|g| g.document_number.clone())
            .collect();
        let existing = if documents.is_empty() {
            Vec::new()
        } else {
            self.store.find_guests_by_documents(&documents).await?
        };
        debug!(
            reservation_id,
            submitted = sanitized.len(),
            matched = existing.len(),
            "reconciling guest list"
        );

        // Guests created in this batch, so a document repeated within one
        // submission still maps to a single row.
        let mut created: HashMap<String, i64> = HashMap::new();

        for submission in sanitized {
            let matched = submission.document_number.as_deref().and_then(|doc| {
                existing
                    .iter()
                    .find(|g| {
                        g.document_number.as_deref() == Some(doc)
                            || g.legacy_identity_document.as_deref() == Some(doc)
                    })
                    .map(|g| g.id)
                    .or_else(|| created.get(doc).copied())
            });

            let guest_id = match matched {
                // Existing identity wins: stored fields are never
                // overwritten by a later booking with the same document.
                Some(id) => id,
                None => {
                    let document = submission.document_number.clone();
                    let guest = self
                        .store
                        .insert_guest(NewGuest {
                            name: submission.name.clone(),
                            last_name: submission.last_name.clone(),
                            email: submission.email.clone(),
                            phone: submission.phone.clone(),
                            document_type: submission.document_type.clone(),
                            document_number: document.clone(),
                            birth_date: submission.birth_date,
                        })
                        .await?;
                    if let Some(doc) = document {
                        created.insert(doc, guest.id);
                    }
                    guest.id
                }
            };

            self.store
                .link_guest(reservation_id, guest_id, submission.is_primary)
                .await?;
        }
        Ok(())
    }
}

/// Trim every string field; blank strings become `None`, never empty
/// strings. A blank name is rejected outright.
fn sanitize(submission: GuestSubmission) -> Result<GuestSubmission, HospedaError> {
    let name = submission.name.trim().to_string();
    if name.is_empty() {
        return Err(HospedaError::Validation(
            "guest name must not be empty".to_string(),
        ));
    }
    Ok(GuestSubmission {
        name,
        last_name: clean(submission.last_name),
        email: clean(submission.email),
        phone: clean(submission.phone),
        document_type: clean(submission.document_type),
        document_number: clean(submission.document_number),
        birth_date: submission.birth_date,
        is_primary: submission.is_primary,
    })
}

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
