// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::FALLBACK_CATEGORY_NAME;
use crate::db::KvStore;
use crate::models::{PaymentSource, Transaction, TxKind};
use crate::store::{FinanceStore, ImportMode};
use crate::utils::{parse_datetime, parse_decimal};
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use csv::ReaderBuilder;
use std::path::Path;
use uuid::Uuid;

pub fn handle<K: KvStore>(store: &mut FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(store, sub),
        _ => Ok(()),
    }
}

fn import_transactions<K: KvStore>(
    store: &mut FinanceStore<K>,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mode = if sub.get_flag("merge") {
        ImportMode::Merge
    } else {
        ImportMode::Replace
    };

    let is_csv = Path::new(path)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let count = if is_csv {
        let incoming = read_csv(store, path)?;
        store.import_transactions(incoming, mode)?
    } else {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
        store
            .import_bundle(&raw, mode)
            .with_context(|| format!("Import {}", path))?
    };
    println!("Imported {} transaction(s) from {}", count, path);
    Ok(())
}

/// Rows in the export layout: `date,type,amount,category,source,note`.
/// Unknown category names land in the same-type "Khác".
fn read_csv<K: KvStore>(store: &FinanceStore<K>, path: &str) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let created_at = Utc::now().timestamp_millis();
    let mut out = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let kind: TxKind = rec.get(1).context("type missing")?.parse()?;
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let category = rec.get(3).unwrap_or("").trim();
        let source = match rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<PaymentSource>()?,
            None => PaymentSource::default(),
        };
        let note = rec.get(5).unwrap_or("").trim().to_string();

        let date = parse_datetime(date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' on row {}", amount_raw, line + 1))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(anyhow!("Negative amount '{}' on row {}", amount_raw, line + 1));
        }
        let category_id = store
            .resolve_category(kind, category)
            .or_else(|| store.resolve_category(kind, FALLBACK_CATEGORY_NAME))
            .map(|c| c.id.clone())
            .unwrap_or_default();

        out.push(Transaction {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            category_id,
            date,
            source,
            note,
            created_at,
            is_locked: None,
        });
    }
    Ok(out)
}
