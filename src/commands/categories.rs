// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::jar_label_for_name;
use crate::db::KvStore;
use crate::models::{Category, TxKind};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<K: KvStore>(store: &mut FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                return Err(anyhow!("Category name must not be empty"));
            }
            let icon = sub.get_one::<String>("icon").unwrap();
            let color = sub.get_one::<String>("color").unwrap();
            let cat = store.add_category(name, icon, color, kind)?;
            println!(
                "Added {} category '{}' ({}, jar {})",
                kind,
                cat.name,
                cat.id,
                jar_label_for_name(&cat.name)
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let cats: Vec<Category> = match sub.get_one::<String>("type") {
                Some(t) => store.categories_of(t.parse()?).to_vec(),
                None => store.categories(),
            };
            if !maybe_print_json(json_flag, jsonl_flag, &cats)? {
                let data = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.kind.to_string(),
                            jar_label_for_name(&c.name).to_string(),
                            if c.is_default { "yes".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Category", "Type", "Jar", "Default"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let kind: TxKind = sub.get_one::<String>("type").unwrap().parse()?;
            let key = sub.get_one::<String>("CATEGORY").unwrap();
            let cat = store
                .resolve_category(kind, key)
                .cloned()
                .ok_or_else(|| anyhow!("{} category '{}' not found", kind, key.trim()))?;
            let moved = store.delete_category(&cat.id, kind)?;
            println!(
                "Removed category '{}'; {} transaction(s) reassigned",
                cat.name, moved
            );
        }
        _ => {}
    }
    Ok(())
}
