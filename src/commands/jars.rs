// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KvStore;
use crate::insights::{jar_allocation_total, suggest_rebalance};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<K: KvStore>(store: &mut FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("set", sub)) => {
            let jar = sub.get_one::<String>("JAR").unwrap().trim();
            let pct = *sub.get_one::<u32>("PERCENT").unwrap();
            store.update_jar_percentage(jar, pct)?;
            println!("Jar {} set to {}%", jar, pct);
            warn_if_unbalanced(store);
        }
        Some(("rebalance", sub)) => {
            let plan = suggest_rebalance(store.jars())?;
            println!(
                "PLAY {}% -> FFA {}%",
                plan.from_percentage, plan.to_percentage
            );
            if sub.get_flag("apply") {
                store.update_jar_percentage(&plan.from_id, plan.from_percentage)?;
                store.update_jar_percentage(&plan.to_id, plan.to_percentage)?;
                println!("Moved 5% from PLAY to FFA");
            }
        }
        _ => {}
    }
    Ok(())
}

fn warn_if_unbalanced<K: KvStore>(store: &FinanceStore<K>) {
    let total = jar_allocation_total(store.jars());
    if total != 100 {
        println!("Note: jars add up to {}%, not 100%", total);
    }
}

fn list<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if maybe_print_json(json_flag, jsonl_flag, &store.jars())? {
        return Ok(());
    }
    let rows = store
        .jars()
        .iter()
        .map(|j| {
            vec![
                j.id.clone(),
                j.label.to_string(),
                j.name.clone(),
                format!("{}%", j.percentage),
                j.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Label", "Jar", "Share", "Description"], rows)
    );
    warn_if_unbalanced(store);
    Ok(())
}
