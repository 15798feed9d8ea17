// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the wallcal-core crate.
//!
//! These tests drive the `Calendar` facade through multi-step workflows that
//! touch the JSON store, the recurrence engine and the range listings.

mod config_driven;
mod event_lifecycle;
mod listing;
mod series_lifecycle;
