// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::CategoryIndex;
use crate::db::KvStore;
use crate::store::FinanceStore;
use anyhow::{Context, Result, anyhow};
use chrono::Utc;

pub const CSV_HEADER: [&str; 6] = ["date", "type", "amount", "category", "source", "note"];

pub fn handle<K: KvStore>(store: &FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();

    match fmt.as_str() {
        "csv" => {
            let categories = store.categories();
            let index = CategoryIndex::new(&categories);
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create CSV {}", out))?;
            wtr.write_record(CSV_HEADER)?;
            for t in store.transactions() {
                wtr.write_record([
                    t.date.format("%Y-%m-%d").to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    index.name(&t.category_id).to_string(),
                    t.source.as_str().to_string(),
                    t.note.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let bundle = store.export_bundle(Utc::now());
            std::fs::write(out, serde_json::to_string_pretty(&bundle)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => return Err(anyhow!("Unknown format: {} (use csv|json)", fmt)),
    }
    println!(
        "Exported {} transaction(s) to {}",
        store.transactions().len(),
        out
    );
    Ok(())
}
