// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar block management with conflict checks against both
//! reservations and other blocks.

use std::sync::Arc;

use tracing::{debug, info};

use hospeda_core::types::{ActivePolicy, Block, BlockChanges, BlockFilter, NewBlock};
use hospeda_core::{BookingStore, HospedaError};

use crate::overlap::validate_range;

/// Creates, updates, deletes, and lists calendar blocks.
///
/// Every mutation is guarded by two overlap counts: against active
/// reservations and against other blocks. Any conflict or validation
/// failure aborts the whole operation before a write happens.
pub struct BlockService {
    store: Arc<dyn BookingStore>,
    policy: ActivePolicy,
}

impl BlockService {
    pub fn new(store: Arc<dyn BookingStore>, policy: ActivePolicy) -> Self {
        Self { store, policy }
    }

    /// Create a block in a free window.
    pub async fn create(&self, block: NewBlock) -> Result<Block, HospedaError> {
        validate_range(block.date_start, block.date_end)?;
        self.check_availability(block.property_id, &block, None).await?;

        let created = self.store.insert_block(block).await?;
        info!(
            block_id = created.id,
            property_id = created.property_id,
            kind = %created.kind,
            "block created"
        );
        Ok(created)
    }

    /// Apply a partial update, re-checking overlaps only when the range
    /// may have changed.
    pub async fn update(&self, id: i64, changes: BlockChanges) -> Result<Block, HospedaError> {
        let current = self
            .store
            .get_block(id)
            .await?
            .ok_or(HospedaError::NotFound { entity: "block", id })?;

        // Unsupplied endpoints fall back to the stored values.
        let start = changes.date_start.unwrap_or(current.date_start);
        let end = changes.date_end.unwrap_or(current.date_end);
        validate_range(start, end)?;

        if changes.touches_dates() {
            let probe = NewBlock {
                property_id: current.property_id,
                date_start: start,
                date_end: end,
                kind: current.kind,
                description: None,
            };
            self.check_availability(current.property_id, &probe, Some(id))
                .await?;
        } else {
            debug!(block_id = id, "dates untouched; skipping overlap checks");
        }

        let updated = self.store.update_block(id, changes).await?;
        info!(block_id = id, "block updated");
        Ok(updated)
    }

    /// Delete a block. Returns whether a row was actually removed, so the
    /// caller can answer 404 versus 200.
    pub async fn delete(&self, id: i64) -> Result<bool, HospedaError> {
        let removed = self.store.delete_block(id).await?;
        if removed {
            info!(block_id = id, "block deleted");
        } else {
            debug!(block_id = id, "delete requested for absent block");
        }
        Ok(removed)
    }

    /// List blocks, filtered and ordered by start date ascending.
    pub async fn list(&self, filter: BlockFilter) -> Result<Vec<Block>, HospedaError> {
        self.store.list_blocks(filter).await
    }

    async fn check_availability(
        &self,
        property_id: i64,
        block: &NewBlock,
        exclude_block_id: Option<i64>,
    ) -> Result<(), HospedaError> {
        let reservations = self
            .store
            .count_reservation_overlaps(
                property_id,
                block.date_start,
                block.date_end,
                None,
                self.policy,
            )
            .await?;
        if reservations > 0 {
            return Err(HospedaError::conflict("occupied by reservation"));
        }

        let blocks = self
            .store
            .count_block_overlaps(property_id, block.date_start, block.date_end, exclude_block_id)
            .await?;
        if blocks > 0 {
            return Err(HospedaError::conflict("occupied by another block"));
        }
        Ok(())
    }
}
