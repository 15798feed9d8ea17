// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.

use std::path::Path;

use wallcal_core::{Occurrence, parse_timestamp};

/// Asserts that a file exists at the given path.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "expected file at {}", path.display());
}

/// Asserts that occurrences are in ascending order of their start instant.
pub fn assert_sorted_by_start(items: &[Occurrence]) {
    let starts: Vec<_> = items
        .iter()
        .map(|o| parse_timestamp(&o.start).expect("start should parse"))
        .collect();
    assert!(
        starts.windows(2).all(|w| w[0] <= w[1]),
        "occurrences are not sorted: {:?}",
        items.iter().map(|o| &o.start).collect::<Vec<_>>()
    );
}

/// The identifiers of a listing.
pub fn ids_of(items: &[Occurrence]) -> Vec<&str> {
    items.iter().map(|o| o.id.as_str()).collect()
}

/// The start instants of a listing.
pub fn starts_of(items: &[Occurrence]) -> Vec<&str> {
    items.iter().map(|o| o.start.as_str()).collect()
}
