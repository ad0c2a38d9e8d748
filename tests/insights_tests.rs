// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use moneymind::insights::{
    JarStatus, UtilityStatus, daily_burn_rate, financial_score, inflation_impact,
    jar_allocation_total, jar_efficiency, jar_usage, marginal_utility, month_summary,
    opportunity_cost, predict_exhaustion_date, roi_chart, spending_leaks, suggest_rebalance,
};
use moneymind::models::{
    Category, JarLabel, PaymentSource, Transaction, TxKind, default_expense_categories,
    default_income_categories, default_jars,
};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn categories() -> Vec<Category> {
    let mut v = default_income_categories();
    v.extend(default_expense_categories());
    v
}

fn tx(kind: TxKind, amount: i64, category: &str, date: NaiveDate, note: &str) -> Transaction {
    Transaction {
        id: format!("{}-{}", category, amount),
        kind,
        amount: Decimal::from(amount),
        category_id: category.to_string(),
        date: date.and_hms_opt(9, 0, 0).unwrap().and_utc(),
        source: PaymentSource::Bank,
        note: note.to_string(),
        created_at: 0,
        is_locked: None,
    }
}

#[test]
fn score_without_income() {
    assert_eq!(financial_score(&[], 1, d(2024, 3, 10)), 50);
    let txs = vec![tx(TxKind::Expense, 10, "ex_1", d(2024, 3, 2), "")];
    assert_eq!(financial_score(&txs, 1, d(2024, 3, 10)), 20);
}

#[test]
fn score_rewards_savings_and_activity() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", d(2024, 3, 1), ""),
        tx(TxKind::Expense, 500, "ex_1", d(2024, 3, 2), ""),
    ];
    // 60 base + 30 for a 50 % savings rate + 2 transactions
    assert_eq!(financial_score(&txs, 1, d(2024, 3, 10)), 92);

    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", d(2024, 3, 1), ""),
        tx(TxKind::Expense, 1500, "ex_1", d(2024, 3, 2), ""),
    ];
    assert_eq!(financial_score(&txs, 1, d(2024, 3, 10)), 32);
}

#[test]
fn burn_rate_averages_over_elapsed_days() {
    let txs = vec![
        tx(TxKind::Expense, 100_000, "ex_1", d(2024, 3, 2), ""),
        tx(TxKind::Expense, 100_000, "ex_1", d(2024, 3, 5), ""),
        tx(TxKind::Expense, 999_000, "ex_1", d(2024, 3, 25), ""),
        tx(TxKind::Income, 5_000_000, "in_1", d(2024, 3, 3), ""),
    ];
    let now = Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap();
    assert_eq!(daily_burn_rate(&txs, 1, now), Decimal::from(20_000));

    let first_day = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
    assert_eq!(daily_burn_rate(&txs, 1, first_day), Decimal::ZERO);
}

#[test]
fn exhaustion_date_projection() {
    let today = d(2024, 3, 11);
    assert_eq!(
        predict_exhaustion_date(Decimal::from(100_000), Decimal::from(20_000), today),
        Some(d(2024, 3, 16))
    );
    assert_eq!(
        predict_exhaustion_date(Decimal::from(100_000), Decimal::ZERO, today),
        None
    );
    assert_eq!(
        predict_exhaustion_date(Decimal::from(-1), Decimal::from(20_000), today),
        None
    );
}

#[test]
fn leaks_catch_small_and_keyword_expenses() {
    let txs = vec![
        tx(TxKind::Expense, 30_000, "ex_1", d(2024, 3, 2), "lunch"),
        tx(TxKind::Expense, 200_000, "ex_2", d(2024, 3, 3), "Grab ride"),
        tx(TxKind::Expense, 500_000, "ex_3", d(2024, 3, 4), "rent"),
        tx(TxKind::Income, 10_000, "in_3", d(2024, 3, 5), "tip"),
    ];
    let leaks = spending_leaks(&txs, 1, d(2024, 3, 20));
    assert_eq!(leaks.count, 2);
    assert_eq!(leaks.total, Decimal::from(230_000));
    assert_eq!(leaks.transactions.len(), 2);
}

#[test]
fn jar_efficiency_statuses() {
    let txs = vec![
        tx(TxKind::Expense, 600_000, "ex_1", d(2024, 3, 2), ""),
        tx(TxKind::Expense, 90_000, "ex_4", d(2024, 3, 3), ""),
    ];
    let eff = jar_efficiency(&txs, &categories(), &default_jars(), Decimal::from(1_000_000));
    assert_eq!(eff.len(), 6);
    let by = |label: JarLabel| eff.iter().find(|e| e.label == label).unwrap();
    assert_eq!(by(JarLabel::NEC).status, JarStatus::Over);
    assert_eq!(by(JarLabel::NEC).budget, Decimal::from(550_000));
    assert_eq!(by(JarLabel::PLAY).status, JarStatus::Warning);
    assert_eq!(by(JarLabel::EDU).status, JarStatus::Good);

    assert!(jar_efficiency(&txs, &categories(), &default_jars(), Decimal::ZERO).is_empty());
}

#[test]
fn jar_views_share_one_classifier() {
    let mut cats = categories();
    cats.push(Category {
        id: "ex_cafe".to_string(),
        name: "Cafe sáng".to_string(),
        icon_name: String::new(),
        color: String::new(),
        kind: TxKind::Expense,
        is_default: false,
    });
    let txs = vec![tx(TxKind::Expense, 150_000, "ex_cafe", d(2024, 3, 2), "")];
    let income = Decimal::from(1_000_000);

    let eff = jar_efficiency(&txs, &cats, &default_jars(), income);
    let play = eff.iter().find(|e| e.label == JarLabel::PLAY).unwrap();
    assert_eq!(play.spent, Decimal::from(150_000));
    assert_eq!(play.status, JarStatus::Over);
    let nec = eff.iter().find(|e| e.label == JarLabel::NEC).unwrap();
    assert!(nec.spent.is_zero());

    let usage = jar_usage(&txs, &cats, &default_jars(), income);
    let play = usage.iter().find(|u| u.label == JarLabel::PLAY).unwrap();
    assert_eq!(play.spent_percent, 15);
    assert!(play.over);
}

#[test]
fn jar_usage_percentages() {
    let txs = vec![tx(TxKind::Expense, 600_000, "ex_1", d(2024, 3, 2), "")];
    let usage = jar_usage(&txs, &categories(), &default_jars(), Decimal::from(1_000_000));
    let nec = usage.iter().find(|u| u.label == JarLabel::NEC).unwrap();
    assert_eq!(nec.spent_percent, 60);
    assert!(nec.over);

    let none = jar_usage(&txs, &categories(), &default_jars(), Decimal::ZERO);
    assert_eq!(none.len(), 6);
    assert!(none.iter().all(|u| u.spent_percent == 0 && !u.over));
}

#[test]
fn rebalance_moves_five_points() {
    let jars = default_jars();
    assert_eq!(jar_allocation_total(&jars), 100);
    let plan = suggest_rebalance(&jars).unwrap();
    assert_eq!(plan.from_id, "4");
    assert_eq!(plan.to_id, "5");
    assert_eq!(plan.from_percentage, 5);
    assert_eq!(plan.to_percentage, 15);

    let mut drained = default_jars();
    for j in drained.iter_mut().filter(|j| j.label == JarLabel::PLAY) {
        j.percentage = 3;
    }
    assert!(suggest_rebalance(&drained).is_err());
}

#[test]
fn roi_chart_covers_six_months() {
    let txs = vec![
        tx(TxKind::Income, 5_000_000, "in_1", d(2024, 3, 2), ""),
        tx(TxKind::Income, 2_000_000, "in_2", d(2024, 3, 9), ""),
        tx(TxKind::Income, 4_000_000, "in_1", d(2023, 12, 5), ""),
        tx(TxKind::Income, 9_000_000, "in_1", d(2023, 9, 5), ""),
    ];
    let points = roi_chart(&txs, &categories(), d(2024, 3, 15));
    let months: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["10/23", "11/23", "12/23", "01/24", "02/24", "03/24"]);
    assert_eq!(points[5].income, Decimal::from(7_000_000));
    assert_eq!(points[5].investment, Decimal::from(2_000_000));
    assert_eq!(points[2].income, Decimal::from(4_000_000));
    assert!(points[0].income.is_zero());
}

#[test]
fn calendar_month_summary() {
    let txs = vec![
        tx(TxKind::Income, 1000, "in_1", d(2024, 2, 1), ""),
        tx(TxKind::Expense, 400, "ex_1", d(2024, 2, 29), ""),
        tx(TxKind::Expense, 50, "ex_1", d(2024, 3, 1), ""),
    ];
    let s = month_summary(&txs, 2024, 2);
    assert_eq!(s.income, Decimal::from(1000));
    assert_eq!(s.expense, Decimal::from(400));
    assert_eq!(s.balance, Decimal::from(600));
}

#[test]
fn growth_and_inflation() {
    let million = Decimal::from(1_000_000);
    assert_eq!(opportunity_cost(million, 0), Some(million));
    assert_eq!(opportunity_cost(million, 1), Some(Decimal::from(1_060_000)));
    assert_eq!(opportunity_cost(million, 2), Some(Decimal::from(1_123_600)));
    assert_eq!(opportunity_cost(million, 10), Some(Decimal::from(1_790_848)));
    assert_eq!(inflation_impact(Decimal::from(1_040_000), 1), million);
    assert_eq!(inflation_impact(Decimal::from(1_081_600), 2), million);
}

#[test]
fn growth_over_many_years_reports_overflow() {
    let million = Decimal::from(1_000_000);
    assert_eq!(opportunity_cost(million, 1000), None);
    assert_eq!(opportunity_cost(million, 2000), None);
    assert_eq!(opportunity_cost(million, u32::MAX), None);
    assert_eq!(opportunity_cost(Decimal::ZERO, 1000), Some(Decimal::ZERO));
}

#[test]
fn inflation_over_many_years_saturates_at_zero() {
    let million = Decimal::from(1_000_000);
    assert_eq!(inflation_impact(million, 1000), Decimal::ZERO);
    assert_eq!(inflation_impact(million, u32::MAX), Decimal::ZERO);
    assert!(inflation_impact(million, 50) < million);
}

#[test]
fn marginal_utility_bands() {
    let income = Decimal::from(10_000_000);
    assert_eq!(
        marginal_utility("Giải trí", Decimal::from(1_600_000), income, 10).status,
        UtilityStatus::Critical
    );
    assert_eq!(
        marginal_utility("Giải trí", Decimal::from(1_200_000), income, 10).status,
        UtilityStatus::Diminishing
    );
    assert_eq!(
        marginal_utility("Giải trí", Decimal::from(1_000_000), income, 10).status,
        UtilityStatus::Optimal
    );
    let no_income = marginal_utility("Giải trí", Decimal::from(1), Decimal::ZERO, 10);
    assert_eq!(no_income.status, UtilityStatus::Optimal);
    assert!(
        marginal_utility("Mua sắm", Decimal::from(1_600_000), income, 10)
            .message
            .contains("Mua sắm")
    );
}
