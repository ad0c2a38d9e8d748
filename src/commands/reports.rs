// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::jar_label_for_name;
use crate::cycle::{calculate_summary, cycle_range};
use crate::db::KvStore;
use crate::insights::{
    self, JarEfficiency, JarUsage, LeakReport, MarginalUtility, daily_burn_rate, financial_score,
    inflation_impact, jar_efficiency, jar_usage, marginal_utility, opportunity_cost,
    predict_exhaustion_date, spending_leaks,
};
use crate::models::{Summary, TxKind};
use crate::report::{AnalyticReport, deep_analysis, generate_report};
use crate::store::FinanceStore;
use crate::utils::{
    fmt_amount, maybe_print_json, parse_decimal, parse_month, pretty_table, today_from,
};
use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

pub fn handle<K: KvStore>(store: &FinanceStore<K>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub)?,
        Some(("analyze", sub)) => analyze(store, sub)?,
        Some(("insights", sub)) => insights_cmd(store, sub)?,
        Some(("month", sub)) => month(store, sub)?,
        Some(("roi", sub)) => roi(store, sub)?,
        Some(("economics", sub)) => economics(store, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct CycleSummary {
    start: String,
    end: String,
    #[serde(flatten)]
    summary: Summary,
}

fn summary_rows(s: &Summary) -> Vec<Vec<String>> {
    vec![
        vec!["Income".into(), fmt_amount(&s.income)],
        vec!["Expense".into(), fmt_amount(&s.expense)],
        vec!["Balance".into(), fmt_amount(&s.balance)],
    ]
}

fn summary<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let range = cycle_range(today_from(sub)?, store.cycle_start_day());
    let s = calculate_summary(store.transactions(), &range);
    let out = CycleSummary {
        start: range.start_date().to_string(),
        end: range.end_date().to_string(),
        summary: s,
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        println!("Cycle {}", range.label());
        println!("{}", pretty_table(&["", "Amount"], summary_rows(&s)));
    }
    Ok(())
}

/// Builds the cycle report for the CLI; `--deep` adds personalized tips.
pub fn build_report<K: KvStore>(
    store: &FinanceStore<K>,
    sub: &clap::ArgMatches,
) -> Result<AnalyticReport> {
    let today = today_from(sub)?;
    let categories = store.categories();
    let report = if sub.get_flag("deep") {
        let delay = sub
            .get_one::<u64>("delay-ms")
            .map(|ms| Duration::from_millis(*ms));
        deep_analysis(
            store.transactions(),
            &categories,
            store.cycle_start_day(),
            today,
            delay,
        )
    } else {
        generate_report(
            store.transactions(),
            &categories,
            store.cycle_start_day(),
            today,
        )
    };
    Ok(report)
}

fn analyze<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_report(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let o = &report.overview;
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance", "Expense/Income"],
            vec![vec![
                fmt_amount(&o.total_income),
                fmt_amount(&o.total_expense),
                fmt_amount(&o.net_balance),
                format!("{}%", o.expense_to_income_ratio_percent),
            ]],
        )
    );

    let top: Vec<Vec<String>> = report
        .spending_analysis
        .top_3_categories
        .iter()
        .map(|c| vec![c.name.clone(), fmt_amount(&c.amount), format!("{}%", c.percentage)])
        .collect();
    println!("{}", pretty_table(&["Top category", "Spent", "Share"], top));

    let st = &report.spending_analysis.structure;
    let cf = &report.cash_flow;
    println!(
        "Fixed {} / flexible {} ({}% fixed)",
        fmt_amount(&st.fixed_expenses),
        fmt_amount(&st.flexible_expenses),
        st.fixed_ratio_percent
    );
    println!(
        "Peak expense day {}, peak income day {}, trend {}",
        cf.peak_expense_day,
        cf.peak_income_day,
        cf.flow_trend.as_str()
    );

    for a in &report.alerts {
        println!("[{:?}] {}", a.level, a.message);
    }
    let behavior = report
        .behavior
        .habits
        .iter()
        .chain(report.behavior.anomalies.iter());
    for line in behavior {
        println!("- {}", line);
    }
    if !report.behavior.recurring_spending.is_empty() {
        println!(
            "Recurring: {}",
            report.behavior.recurring_spending.join(", ")
        );
    }
    for (i, r) in report.recommendations.iter().enumerate() {
        println!("{}. {}", i + 1, r);
    }
    Ok(())
}

#[derive(Serialize)]
struct InsightsOut {
    score: u8,
    daily_burn_rate: Decimal,
    exhaustion_date: Option<NaiveDate>,
    leaks: LeakReport,
    jar_usage: Vec<JarUsage>,
    jar_efficiency: Vec<JarEfficiency>,
}

fn insights_cmd<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let today = today_from(sub)?;
    let day = store.cycle_start_day();
    let txs = store.transactions();
    let categories = store.categories();
    let range = cycle_range(today, day);
    let s = calculate_summary(txs, &range);
    let in_cycle: Vec<_> = txs
        .iter()
        .filter(|t| range.contains(&t.date))
        .cloned()
        .collect();

    // A past --today is evaluated at its last second.
    let now = if today == Utc::now().date_naive() {
        Utc::now()
    } else {
        today
            .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
            .and_utc()
    };
    let burn = daily_burn_rate(txs, day, now);

    let out = InsightsOut {
        score: financial_score(txs, day, today),
        daily_burn_rate: burn,
        exhaustion_date: predict_exhaustion_date(s.balance, burn, today),
        leaks: spending_leaks(txs, day, today),
        jar_usage: jar_usage(&in_cycle, &categories, store.jars(), s.income),
        jar_efficiency: jar_efficiency(&in_cycle, &categories, store.jars(), s.income),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        return Ok(());
    }

    println!("Financial score: {}/100", out.score);
    println!("Daily burn rate: {}", fmt_amount(&out.daily_burn_rate));
    match out.exhaustion_date {
        Some(d) => println!("Money runs out around {}", d),
        None => println!("No exhaustion date at the current pace"),
    }
    println!(
        "Leaks: {} transaction(s), {} total",
        out.leaks.count,
        fmt_amount(&out.leaks.total)
    );
    let rows = out
        .jar_usage
        .iter()
        .map(|u| {
            vec![
                u.label.to_string(),
                u.name.clone(),
                format!("{}%", u.target_percent),
                format!("{}%", u.spent_percent),
                if u.over { "OVER".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Jar", "Name", "Target", "Spent", ""], rows)
    );
    let rows = out
        .jar_efficiency
        .iter()
        .map(|j| {
            vec![
                j.label.to_string(),
                j.name.clone(),
                fmt_amount(&j.spent),
                fmt_amount(&j.budget),
                format!("{:?}", j.status).to_uppercase(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Jar", "Name", "Spent", "Budget", "Status"], rows)
    );
    Ok(())
}

fn month<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let (y, m) = parse_month(sub.get_one::<String>("MONTH").unwrap())?;
    let s = insights::month_summary(store.transactions(), y, m);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        println!("{:04}-{:02}", y, m);
        println!("{}", pretty_table(&["", "Amount"], summary_rows(&s)));
    }
    Ok(())
}

fn roi<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let today = today_from(sub)?;
    let categories = store.categories();
    let points = insights::roi_chart(store.transactions(), &categories, today);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let rows = points
            .iter()
            .map(|p| vec![p.month.clone(), fmt_amount(&p.income), fmt_amount(&p.investment)])
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Investment"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Economics {
    pub amount: Decimal,
    pub years: u32,
    /// `None` when the grown amount does not fit in a `Decimal`.
    pub opportunity_cost: Option<Decimal>,
    pub inflation_adjusted: Decimal,
    pub marginal_utility: Option<CategoryUtility>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUtility {
    pub category: String,
    pub cycle_spend: Decimal,
    pub jar_percentage: u32,
    #[serde(flatten)]
    pub utility: MarginalUtility,
}

pub fn build_economics<K: KvStore>(
    store: &FinanceStore<K>,
    sub: &clap::ArgMatches,
) -> Result<Economics> {
    let amount = parse_decimal(sub.get_one::<String>("AMOUNT").unwrap())?;
    if amount < Decimal::ZERO {
        return Err(anyhow!("Amount must not be negative"));
    }
    let years = *sub.get_one::<u32>("years").unwrap_or(&10);

    let marginal_utility = match sub.get_one::<String>("category") {
        Some(key) => {
            let category = store
                .resolve_category(TxKind::Expense, key)
                .ok_or_else(|| anyhow!("Unknown expense category: {}", key))?;
            let range = cycle_range(today_from(sub)?, store.cycle_start_day());
            let s = calculate_summary(store.transactions(), &range);
            let cycle_spend: Decimal = store
                .transactions()
                .iter()
                .filter(|t| {
                    t.is_expense() && t.category_id == category.id && range.contains(&t.date)
                })
                .map(|t| t.amount)
                .sum();
            let label = jar_label_for_name(&category.name);
            let jar_percentage = store
                .jars()
                .iter()
                .find(|j| j.label == label)
                .map(|j| j.percentage)
                .unwrap_or(0);
            Some(CategoryUtility {
                category: category.name.clone(),
                cycle_spend,
                jar_percentage,
                utility: marginal_utility(&category.name, cycle_spend, s.income, jar_percentage),
            })
        }
        None => None,
    };

    Ok(Economics {
        amount,
        years,
        opportunity_cost: opportunity_cost(amount, years),
        inflation_adjusted: inflation_impact(amount, years),
        marginal_utility,
    })
}

fn economics<K: KvStore>(store: &FinanceStore<K>, sub: &clap::ArgMatches) -> Result<()> {
    let out = build_economics(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        return Ok(());
    }
    let grown = match &out.opportunity_cost {
        Some(v) => fmt_amount(v),
        None => "out of range".to_string(),
    };
    let mut rows = vec![
        vec!["Amount".into(), fmt_amount(&out.amount)],
        vec![format!("Invested for {} years at 6%", out.years), grown],
        vec![
            format!("Worth after {} years of 4% inflation", out.years),
            fmt_amount(&out.inflation_adjusted),
        ],
    ];
    if let Some(u) = &out.marginal_utility {
        rows.push(vec![
            format!("{} this cycle", u.category),
            fmt_amount(&u.cycle_spend),
        ]);
        rows.push(vec![
            "Marginal utility".into(),
            format!("{:?}", u.utility.status).to_uppercase(),
        ]);
    }
    println!("{}", pretty_table(&["", "Value"], rows));
    if let Some(u) = &out.marginal_utility {
        println!("{}", u.utility.message);
    }
    Ok(())
}
