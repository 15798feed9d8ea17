// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! wallcal - a local, file-backed calendar with wall-clock stable recurrence

use std::process::ExitCode;

use wallcal_cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
