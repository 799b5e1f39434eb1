// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    daymark_cli::run().await
}
