// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::is_valid_cycle_day;
use crate::db::KvStore;
use crate::insights::jar_allocation_total;
use crate::store::FinanceStore;
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashSet;

/// `(issue, detail)` pairs for everything that looks off in the stored data.
pub fn diagnose<K: KvStore>(store: &FinanceStore<K>) -> Vec<(String, String)> {
    let mut issues = Vec::new();

    let total = jar_allocation_total(store.jars());
    if total != 100 {
        issues.push(("jar_total_not_100".into(), format!("{}%", total)));
    }

    let day = store.cycle_start_day();
    if !is_valid_cycle_day(day) {
        issues.push(("invalid_cycle_start_day".into(), day.to_string()));
    }

    let mut seen = HashSet::new();
    for t in store.transactions() {
        if !seen.insert(t.id.as_str()) {
            issues.push(("duplicate_transaction_id".into(), t.id.clone()));
        }
        let same_kind = store.categories_of(t.kind);
        if !same_kind.iter().any(|c| c.id == t.category_id) {
            let in_other = store.categories().iter().any(|c| c.id == t.category_id);
            let issue = if in_other {
                "category_type_mismatch"
            } else {
                "unknown_category"
            };
            issues.push((issue.into(), format!("{} -> {}", t.id, t.category_id)));
        }
    }
    issues
}

pub fn handle<K: KvStore>(store: &FinanceStore<K>) -> Result<()> {
    let rows: Vec<Vec<String>> = diagnose(store)
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
