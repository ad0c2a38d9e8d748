// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use moneymind::db::SqliteKv;
use moneymind::store::FinanceStore;
use moneymind::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    if let Some(("words", sub)) = matches.subcommand() {
        return commands::words::handle(sub);
    }

    let mut store = FinanceStore::load(SqliteKv::open_default()?)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("jar", sub)) => commands::jars::handle(&mut store, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        Some(("reset", _)) => {
            store.clear_data()?;
            println!("All data erased");
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
