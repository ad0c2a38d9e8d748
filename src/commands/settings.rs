// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::current_cycle;
use crate::db::KvStore;
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle<K: KvStore>(store: &mut FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let settings = store.settings();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
                let cycle = current_cycle(settings.cycle_start_day);
                let rows = vec![
                    vec![
                        "cycle_start_day".to_string(),
                        settings.cycle_start_day.to_string(),
                    ],
                    vec!["auto_lock".to_string(), settings.is_auto_lock.to_string()],
                    vec!["current_cycle".to_string(), cycle.label()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let current = store.settings();
            let day = sub
                .get_one::<u32>("cycle-start-day")
                .copied()
                .unwrap_or(current.cycle_start_day);
            let lock = sub
                .get_one::<bool>("auto-lock")
                .copied()
                .unwrap_or(current.is_auto_lock);
            store.save_settings(day, lock)?;
            println!("Cycle starts on day {}, auto-lock {}", day, lock);
        }
        _ => {}
    }
    Ok(())
}
