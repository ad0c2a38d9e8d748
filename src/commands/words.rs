// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::parse_decimal;
use crate::words::to_vietnamese_words;
use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let raw = m.get_one::<String>("AMOUNT").unwrap();
    let amount = parse_decimal(raw)?
        .trunc()
        .to_i64()
        .with_context(|| format!("Amount '{}' is out of range", raw.trim()))?;
    println!("{}", to_vietnamese_words(amount));
    Ok(())
}
