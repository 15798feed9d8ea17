// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod stamp;
mod zone;

pub use stamp::{OffsetDateTime, parse_timestamp};
pub use zone::{ZoneResolver, ZonedParts};
