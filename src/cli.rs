// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn today_arg() -> Arg {
    arg!(--today <DATE> "Evaluate as of this date (YYYY-MM-DD) instead of today").required(false)
}

fn type_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("TYPE")
        .required(required)
        .help("income or expense")
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(type_arg(required))
        .arg(arg!(--amount <AMOUNT> "Amount in đồng").required(required))
        .arg(arg!(--category <CATEGORY> "Category id or name").required(required))
        .arg(arg!(--date <DATE> "YYYY-MM-DD or RFC 3339 timestamp").required(false))
        .arg(arg!(--source <SOURCE> "cash, e-wallet or bank").required(false))
        .arg(arg!(--note <NOTE> "Free-text note").required(false))
}

pub fn build_cli() -> Command {
    Command::new("moneymind")
        .about("Cycle-based personal finance with jar budgeting and analytics")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(tx_fields(Command::new("add").about("Record a transaction"), true))
                .subcommand(
                    tx_fields(
                        Command::new("edit")
                            .about("Replace fields of a transaction")
                            .arg(arg!(<ID> "Transaction id")),
                        false,
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(arg!(<ID> "Transaction id")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(arg!(--month <MONTH> "Only this calendar month (YYYY-MM)").required(false))
                        .arg(
                            Arg::new("cycle")
                                .long("cycle")
                                .action(ArgAction::SetTrue)
                                .help("Only the current budget cycle"),
                        )
                        .arg(type_arg(false))
                        .arg(arg!(--category <CATEGORY> "Category id or name").required(false))
                        .arg(
                            arg!(--limit <N> "Maximum rows")
                                .required(false)
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(today_arg()),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(type_arg(true))
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--icon <ICON>).required(false).default_value("MoreHorizontal"))
                        .arg(arg!(--color <COLOR>).required(false).default_value("#94A3B8")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(type_arg(false)),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(type_arg(true))
                        .arg(arg!(<CATEGORY> "Category id or name")),
                ),
        )
        .subcommand(
            Command::new("jar")
                .about("Six-jar allocation")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("set")
                        .arg(arg!(<JAR> "Jar id or label (NEC, EDU, ...)"))
                        .arg(arg!(<PERCENT>).value_parser(value_parser!(u32))),
                )
                .subcommand(
                    Command::new("rebalance")
                        .about("Move 5% from PLAY to FFA")
                        .arg(
                            Arg::new("apply")
                                .long("apply")
                                .action(ArgAction::SetTrue)
                                .help("Save the new split instead of only showing it"),
                        ),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Cycle start day and auto-lock")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(
                            arg!(--"cycle-start-day" <DAY> "Day of month the cycle starts (1-28)")
                                .required(false)
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--"auto-lock" <BOOL> "true or false")
                                .required(false)
                                .value_parser(value_parser!(bool)),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Cycle analytics")
                .subcommand(json_flags(Command::new("summary").arg(today_arg())))
                .subcommand(json_flags(
                    Command::new("analyze")
                        .arg(today_arg())
                        .arg(
                            Arg::new("deep")
                                .long("deep")
                                .action(ArgAction::SetTrue)
                                .help("Add personalized tips"),
                        )
                        .arg(
                            arg!(--"delay-ms" <MS> "Pause before the deep analysis")
                                .required(false)
                                .value_parser(value_parser!(u64)),
                        ),
                ))
                .subcommand(json_flags(Command::new("insights").arg(today_arg())))
                .subcommand(json_flags(
                    Command::new("month").arg(arg!(<MONTH> "Calendar month (YYYY-MM)")),
                ))
                .subcommand(json_flags(Command::new("roi").arg(today_arg())))
                .subcommand(json_flags(
                    Command::new("economics")
                        .about("Opportunity cost, inflation and marginal utility of a spend")
                        .arg(arg!(<AMOUNT> "Amount in đồng"))
                        .arg(
                            arg!(--years <N> "Horizon in years")
                                .required(false)
                                .default_value("10")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            arg!(--category <CATEGORY> "Expense category id or name")
                                .required(false),
                        )
                        .arg(today_arg()),
                )),
        )
        .subcommand(
            Command::new("words")
                .about("Spell an amount in Vietnamese")
                .arg(arg!(<AMOUNT>).allow_hyphen_values(true)),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        arg!(--format <FORMAT> "json or csv")
                            .required(false)
                            .default_value("json"),
                    )
                    .arg(arg!(--out <PATH>).required(true)),
            ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .arg(arg!(--path <PATH>).required(true))
                    .arg(
                        Arg::new("merge")
                            .long("merge")
                            .action(ArgAction::SetTrue)
                            .help("Merge by id instead of replacing"),
                    ),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
        .subcommand(
            Command::new("reset")
                .about("Erase all data")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .required(true),
                ),
        )
}
