// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use moneymind::models::{
    Category, PaymentSource, Transaction, TxKind, default_expense_categories,
    default_income_categories,
};
use moneymind::report::{
    AlertLevel, FlowTrend, deep_analysis, generate_report, personalize,
};
use rust_decimal::Decimal;
use std::time::Duration;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

fn categories() -> Vec<Category> {
    let mut v = default_income_categories();
    v.extend(default_expense_categories());
    v
}

fn tx(kind: TxKind, amount: i64, category: &str, day: u32, note: &str) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", category, day, amount),
        kind,
        amount: Decimal::from(amount),
        category_id: category.to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
        source: PaymentSource::Cash,
        note: note.to_string(),
        created_at: 0,
        is_locked: None,
    }
}

#[test]
fn empty_input_gives_zero_report_with_default_advice() {
    for day in [1, 15, 28] {
        let r = generate_report(&[], &[], day, today());
        assert!(r.overview.total_income.is_zero());
        assert!(r.overview.total_expense.is_zero());
        assert!(r.overview.net_balance.is_zero());
        assert_eq!(r.overview.expense_to_income_ratio_percent, 0);
        assert!(r.spending_analysis.top_3_categories.is_empty());
        assert!(r.alerts.is_empty());
        assert!(!r.recommendations.is_empty());
        assert!(r.recommendations.len() <= 4);
        assert_eq!(r.cash_flow.peak_expense_day, "N/A");
        assert_eq!(r.cash_flow.peak_income_day, "N/A");
        assert_eq!(r.cash_flow.flow_trend, FlowTrend::EfficientSaving);
    }
}

#[test]
fn category_share_rounds_half_away_from_zero() {
    let txs = vec![
        tx(TxKind::Expense, 150, "ex_2", 5, ""),
        tx(TxKind::Expense, 250, "ex_1", 6, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let top = &r.spending_analysis.top_3_categories;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Ăn uống");
    assert_eq!(top[0].percentage, 63);
    assert_eq!(top[1].name, "Mua sắm");
    assert_eq!(top[1].percentage, 38);
}

#[test]
fn high_ratio_raises_one_critical_alert() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", 1, ""),
        tx(TxKind::Expense, 850, "ex_1", 2, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let critical: Vec<_> = r
        .alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Critical)
        .collect();
    assert_eq!(critical.len(), 1);
    assert!(critical[0].message.contains("85"));
    assert_eq!(r.overview.expense_to_income_ratio_percent, 85);
    assert_eq!(r.cash_flow.flow_trend, FlowTrend::Stable);
}

#[test]
fn overspending_adds_negative_balance_alert() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", 1, ""),
        tx(TxKind::Expense, 1100, "ex_1", 2, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let critical: Vec<&str> = r
        .alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Critical)
        .map(|a| a.message.as_str())
        .collect();
    assert_eq!(critical.len(), 2);
    assert!(critical[0].contains("110"));
    assert!(critical[1].contains("âm quỹ"));
    assert_eq!(r.cash_flow.flow_trend, FlowTrend::UpwardExpense);
}

#[test]
fn dominant_category_is_flagged() {
    let txs = vec![
        tx(TxKind::Income, 10_000, "in_1", 1, ""),
        tx(TxKind::Expense, 700, "ex_4", 3, ""),
        tx(TxKind::Expense, 300, "ex_1", 4, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let warnings: Vec<_> = r
        .alerts
        .iter()
        .filter(|a| a.level == AlertLevel::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Giải trí"));
    assert_eq!(r.spending_analysis.abnormal_high_spending.len(), 1);
    assert_eq!(r.spending_analysis.abnormal_high_spending[0].category, "Giải trí");
}

#[test]
fn fixed_and_flexible_split() {
    let txs = vec![
        tx(TxKind::Expense, 600, "ex_3", 3, ""), // Hóa đơn
        tx(TxKind::Expense, 400, "ex_1", 4, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let s = &r.spending_analysis.structure;
    assert_eq!(s.fixed_expenses, Decimal::from(600));
    assert_eq!(s.flexible_expenses, Decimal::from(400));
    assert_eq!(s.fixed_ratio_percent, 60);
    assert!(r.behavior.habits.iter().any(|h| h.contains("ổn định")));
}

#[test]
fn peak_day_ties_pick_earliest() {
    let txs = vec![
        tx(TxKind::Expense, 100, "ex_1", 7, ""),
        tx(TxKind::Expense, 100, "ex_1", 3, ""),
        tx(TxKind::Income, 50, "in_1", 9, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    assert_eq!(r.cash_flow.peak_expense_day, "2024-03-03");
    assert_eq!(r.cash_flow.peak_income_day, "2024-03-09");
}

#[test]
fn recurring_notes_are_normalized_and_deduplicated() {
    let txs = vec![
        tx(TxKind::Expense, 100, "ex_4", 1, "Netflix"),
        tx(TxKind::Expense, 100, "ex_4", 2, " netflix "),
        tx(TxKind::Expense, 20, "ex_1", 3, "ab"),
        tx(TxKind::Expense, 20, "ex_1", 4, "ab"),
        tx(TxKind::Expense, 20, "ex_1", 5, "phở"),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    assert_eq!(r.behavior.recurring_spending, vec!["netflix".to_string()]);
}

#[test]
fn anomalies_list_large_transactions() {
    let txs = vec![
        tx(TxKind::Income, 1_000_000, "in_1", 1, ""),
        tx(TxKind::Expense, 300_000, "ex_2", 5, ""),
        tx(TxKind::Expense, 100_000, "ex_1", 6, ""),
        tx(TxKind::Expense, 400_000, "ex_2", 7, ""),
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    assert_eq!(
        r.behavior.anomalies,
        vec![
            "Giao dịch đột biến: 1,000,000đ vào ngày 01/03".to_string(),
            "Giao dịch đột biến: 300,000đ vào ngày 05/03".to_string(),
        ]
    );
}

#[test]
fn transactions_outside_cycle_are_ignored() {
    let mut old = tx(TxKind::Expense, 9_999, "ex_1", 1, "");
    old.date = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
    let r = generate_report(&[old], &categories(), 1, today());
    assert!(r.overview.total_expense.is_zero());
}

#[test]
fn deep_analysis_prepends_tips() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", 1, ""),
        tx(TxKind::Expense, 950, "ex_4", 2, ""),
    ];
    let plain = generate_report(&txs, &categories(), 1, today());
    let deep = deep_analysis(
        &txs,
        &categories(),
        1,
        today(),
        Some(Duration::from_millis(1)),
    );
    assert_eq!(deep.recommendations.len(), 4);
    assert!(deep.recommendations[0].contains("báo động đỏ"));
    assert!(deep.recommendations[1].contains("Impulse"));
    assert_eq!(deep.recommendations[2], plain.recommendations[0]);
    assert_eq!(deep, personalize(plain));
}

#[test]
fn deep_analysis_without_delay_matches_delayed() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", 1, ""),
        tx(TxKind::Expense, 750, "ex_3", 2, ""),
    ];
    let a = deep_analysis(&txs, &categories(), 1, today(), None);
    let b = deep_analysis(&txs, &categories(), 1, today(), Some(Duration::ZERO));
    assert_eq!(a, b);
    assert!(a.recommendations[0].contains("24h"));
    assert!(a.recommendations.len() <= 4);
}

/// 21 in-cycle expenses over five category ids, one of them unknown.
fn busy_cycle() -> Vec<Transaction> {
    let spread: [(&str, &[i64]); 5] = [
        ("ex_1", &[20, 20, 20, 20, 20]),
        ("ghost", &[20, 20, 20, 26]),
        ("ex_4", &[20, 20, 20, 22]),
        ("ex_2", &[20, 20, 20, 20]),
        ("ex_3", &[18, 18, 18, 18]),
    ];
    let mut txs = Vec::new();
    for (category, amounts) in spread {
        for amount in amounts {
            let day = (txs.len() % 19) as u32 + 1;
            let mut t = tx(TxKind::Expense, *amount, category, day, "");
            t.id = format!("busy-{}", txs.len());
            txs.push(t);
        }
    }
    txs
}

#[test]
fn more_than_twenty_expenses_is_a_habit() {
    let txs = busy_cycle();
    assert_eq!(txs.len(), 21);
    let r = generate_report(&txs, &categories(), 1, today());
    assert!(
        r.behavior
            .habits
            .iter()
            .any(|h| h.starts_with("Tần suất chi tiêu cao"))
    );

    let twenty = &txs[1..];
    let r = generate_report(twenty, &categories(), 1, today());
    assert!(
        !r.behavior
            .habits
            .iter()
            .any(|h| h.starts_with("Tần suất chi tiêu cao"))
    );
}

#[test]
fn only_three_categories_are_ranked() {
    let r = generate_report(&busy_cycle(), &categories(), 1, today());
    let top: Vec<(&str, Decimal, i64)> = r
        .spending_analysis
        .top_3_categories
        .iter()
        .map(|c| (c.name.as_str(), c.amount, c.percentage))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Ăn uống", Decimal::from(100), 24),
            ("Khác", Decimal::from(86), 20),
            ("Giải trí", Decimal::from(82), 20),
        ]
    );
    assert_eq!(r.overview.total_expense, Decimal::from(420));
}

#[test]
fn unknown_category_reads_as_other_and_counts_as_flexible() {
    let txs = vec![
        tx(TxKind::Expense, 300, "ghost", 3, ""),
        tx(TxKind::Expense, 100, "ex_3", 4, ""), // Hóa đơn
    ];
    let r = generate_report(&txs, &categories(), 1, today());
    let top = &r.spending_analysis.top_3_categories;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Khác");
    assert_eq!(top[0].amount, Decimal::from(300));
    assert_eq!(top[0].percentage, 75);
    let s = &r.spending_analysis.structure;
    assert_eq!(s.fixed_expenses, Decimal::from(100));
    assert_eq!(s.flexible_expenses, Decimal::from(300));

    let busy = generate_report(&busy_cycle(), &categories(), 1, today());
    let s = &busy.spending_analysis.structure;
    assert_eq!(s.fixed_expenses, Decimal::from(72));
    assert_eq!(s.flexible_expenses, Decimal::from(348));
}
