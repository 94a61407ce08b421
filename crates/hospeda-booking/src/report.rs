// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Financial reporting over stored reservations.

use std::sync::Arc;

use hospeda_core::types::{DateWindow, RevenueSummary};
use hospeda_core::{BookingStore, HospedaError};

pub struct ReportService {
    store: Arc<dyn BookingStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Aggregate revenue for a property over an inclusive date window.
    /// Cancelled reservations never contribute.
    pub async fn revenue(
        &self,
        property_id: i64,
        window: DateWindow,
    ) -> Result<RevenueSummary, HospedaError> {
        if window.to < window.from {
            return Err(HospedaError::Validation(format!(
                "report window end {} precedes start {}",
                window.to, window.from
            )));
        }
        self.store.revenue_summary(property_id, window).await
    }
}
