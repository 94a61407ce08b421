// SPDX-FileCopyrightText: 2026 Hospeda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for the Hospeda booking core.
//!
//! Services depend on these traits, never on a concrete backend, so tests
//! can inject in-memory doubles. Traits use `#[async_trait]` for dynamic
//! dispatch compatibility.

pub mod store;

pub use store::BookingStore;
