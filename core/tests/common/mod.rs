// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Test data factories (fixtures)
//! - Custom assertion helpers
//! - Temporary directory management with auto-cleanup

mod assertions;
mod temp_dir;

#[allow(unused_imports)]
pub use assertions::{assert_file_exists, assert_sorted_by_start, ids_of, starts_of};
#[allow(unused_imports)]
pub use fixtures::{single_draft, test_calendar, test_config, weekly_series_draft};
pub use temp_dir::setup_temp_dirs;
