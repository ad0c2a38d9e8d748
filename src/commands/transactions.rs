// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::CategoryIndex;
use crate::cycle::cycle_range;
use crate::db::KvStore;
use crate::models::{PaymentSource, Transaction, TxKind};
use crate::store::{FinanceStore, TransactionDraft};
use crate::utils::{
    fmt_amount, maybe_print_json, parse_datetime, parse_decimal, parse_month, pretty_table,
    today_from,
};
use crate::words::to_vietnamese_words;
use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub fn handle<K: KvStore>(store: &mut FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("ID").unwrap().trim();
            let removed = store.delete_transaction(id)?;
            println!(
                "Deleted {} {} ({})",
                removed.kind,
                fmt_amount(&removed.amount),
                removed.id
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn category_id_for<K: KvStore>(
    store: &FinanceStore<K>,
    kind: TxKind,
    key: &str,
) -> Result<String> {
    store
        .resolve_category(kind, key)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("{} category '{}' not found", kind, key.trim()))
}

fn add<K: KvStore>(store: &mut FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_id = category_id_for(store, kind, sub.get_one::<String>("category").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => Utc::now(),
    };
    let source = match sub.get_one::<String>("source") {
        Some(s) => s.parse::<PaymentSource>()?,
        None => PaymentSource::default(),
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let tx = store.add_transaction(
        TransactionDraft {
            kind,
            amount,
            category_id,
            date,
            source,
            note,
        },
        Utc::now(),
    )?;
    println!(
        "Recorded {} {} on {} ({})",
        tx.kind,
        fmt_amount(&tx.amount),
        tx.date.format("%Y-%m-%d"),
        tx.id
    );
    if let Some(whole) = tx.amount.trunc().to_i64() {
        println!("  {}", to_vietnamese_words(whole));
    }
    Ok(())
}

/// Unspecified flags keep the stored values.
fn edit<K: KvStore>(store: &mut FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("ID").unwrap().trim().to_string();
    let current = store
        .find_transaction(&id)
        .cloned()
        .with_context(|| format!("Transaction '{}' not found", id))?;

    let kind = match sub.get_one::<String>("type") {
        Some(s) => s.parse::<TxKind>()?,
        None => current.kind,
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(s) => parse_decimal(s)?,
        None => current.amount,
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(s) => category_id_for(store, kind, s)?,
        None => current.category_id.clone(),
    };
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => current.date,
    };
    let source = match sub.get_one::<String>("source") {
        Some(s) => s.parse::<PaymentSource>()?,
        None => current.source,
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .unwrap_or(current.note);

    let tx = store.update_transaction(
        &id,
        TransactionDraft {
            kind,
            amount,
            category_id,
            date,
            source,
            note,
        },
    )?;
    println!("Updated {} ({} {})", tx.id, tx.kind, fmt_amount(&tx.amount));
    Ok(())
}

fn list<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.source.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Amount", "Category", "Source", "Note", "Id"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub source: String,
    pub note: String,
}

fn matches_filters<K: KvStore>(
    store: &FinanceStore<K>,
    sub: &clap::ArgMatches,
    t: &Transaction,
) -> Result<bool> {
    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        let d = t.date.date_naive();
        if d.year() != y || d.month() != m {
            return Ok(false);
        }
    }
    if let Some(kind) = sub.get_one::<String>("type") {
        if t.kind != kind.parse::<TxKind>()? {
            return Ok(false);
        }
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        let wanted = store.resolve_category(t.kind, cat).map(|c| c.id.as_str());
        if wanted != Some(t.category_id.as_str()) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Rows newest first (by date, then creation time), after filters and limit.
pub fn query_rows<K: KvStore>(
    store: &FinanceStore<K>,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let range = if sub.get_flag("cycle") {
        Some(cycle_range(today_from(sub)?, store.cycle_start_day()))
    } else {
        None
    };

    let mut picked: Vec<&Transaction> = Vec::new();
    for t in store.transactions() {
        if let Some(r) = &range {
            if !r.contains(&t.date) {
                continue;
            }
        }
        if matches_filters(store, sub, t)? {
            picked.push(t);
        }
    }
    picked.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        picked.truncate(*limit);
    }

    let categories = store.categories();
    let index = CategoryIndex::new(&categories);
    Ok(picked
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d").to_string(),
            kind: t.kind.to_string(),
            amount: fmt_amount(&t.amount),
            category: index.name(&t.category_id).to_string(),
            source: t.source.as_str().to_string(),
            note: t.note.clone(),
        })
        .collect())
}
