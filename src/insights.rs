// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::{CategoryIndex, is_investment_name};
use crate::cycle::{calculate_summary, cycle_range, summarize};
use crate::models::{Category, FinancialJar, JarLabel, Summary, Transaction};
use crate::utils::{percent_of, round_half_away};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::HashMap;

const LEAK_KEYWORDS: [&str; 8] = [
    "cafe", "trà sữa", "snack", "ăn vặt", "shopee", "grab", "be", "gojek",
];
const LEAK_LIST_CAP: usize = 5;
const REBALANCE_STEP: u32 = 5;

/// 0..=100 health score for the cycle containing `today`.
pub fn financial_score(transactions: &[Transaction], cycle_start_day: u32, today: NaiveDate) -> u8 {
    let range = cycle_range(today, cycle_start_day);
    let summary = calculate_summary(transactions, &range);

    if summary.income.is_zero() {
        return if summary.expense > Decimal::ZERO { 20 } else { 50 };
    }

    let savings_rate = summary.balance / summary.income;
    let mut score: i64 = 60;
    if savings_rate > Decimal::new(4, 1) {
        score += 30;
    } else if savings_rate > Decimal::new(2, 1) {
        score += 20;
    } else if savings_rate > Decimal::ZERO {
        score += 10;
    } else {
        score -= 30;
    }

    let tx_count = transactions
        .iter()
        .filter(|t| range.contains(&t.date))
        .count() as i64;
    score += tx_count.min(10);

    score.clamp(0, 100) as u8
}

/// Average daily spend since the cycle began, counting expenses up to `now`.
pub fn daily_burn_rate(
    transactions: &[Transaction],
    cycle_start_day: u32,
    now: DateTime<Utc>,
) -> Decimal {
    let range = cycle_range(now.date_naive(), cycle_start_day);
    let elapsed = (now.date_naive() - range.start_date()).num_days().max(1);
    let spent: Decimal = transactions
        .iter()
        .filter(|t| t.is_expense() && t.date >= range.start && t.date <= now)
        .map(|t| t.amount)
        .sum();
    round_half_away(spent / Decimal::from(elapsed))
}

/// Day the balance runs out at the current burn rate, if it ever does.
pub fn predict_exhaustion_date(
    balance: Decimal,
    daily_burn_rate: Decimal,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if daily_burn_rate <= Decimal::ZERO || balance <= Decimal::ZERO {
        return None;
    }
    let days_left = (balance / daily_burn_rate).floor().to_u64()?;
    today.checked_add_days(Days::new(days_left))
}

#[derive(Debug, Clone, Serialize)]
pub struct LeakReport {
    pub total: Decimal,
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

/// Small or keyword-flagged expenses in the cycle. Anything under 50 000 counts.
pub fn spending_leaks(
    transactions: &[Transaction],
    cycle_start_day: u32,
    today: NaiveDate,
) -> LeakReport {
    let range = cycle_range(today, cycle_start_day);
    let small = Decimal::from(50_000);
    let leaks: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && range.contains(&t.date))
        .filter(|t| {
            let note = t.note.to_lowercase();
            LEAK_KEYWORDS.iter().any(|kw| note.contains(kw)) || t.amount < small
        })
        .collect();

    LeakReport {
        total: leaks.iter().map(|t| t.amount).sum(),
        count: leaks.len(),
        transactions: leaks.into_iter().take(LEAK_LIST_CAP).cloned().collect(),
    }
}

fn expense_by_jar(
    transactions: &[Transaction],
    categories: &[Category],
) -> HashMap<JarLabel, Decimal> {
    let index = CategoryIndex::new(categories);
    let mut totals = HashMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *totals
            .entry(index.jar_label(&t.category_id))
            .or_insert(Decimal::ZERO) += t.amount;
    }
    totals
}

#[derive(Debug, Clone, Serialize)]
pub struct JarUsage {
    pub label: JarLabel,
    pub name: String,
    pub target_percent: u32,
    pub spent_percent: i64,
    pub over: bool,
}

/// Share of income spent per active jar, against the jar's target.
pub fn jar_usage(
    transactions: &[Transaction],
    categories: &[Category],
    jars: &[FinancialJar],
    income: Decimal,
) -> Vec<JarUsage> {
    let totals = if income > Decimal::ZERO {
        expense_by_jar(transactions, categories)
    } else {
        HashMap::new()
    };
    jars.iter()
        .filter(|j| j.percentage > 0)
        .map(|j| {
            let spent = totals.get(&j.label).copied().unwrap_or(Decimal::ZERO);
            let spent_percent = percent_of(spent, income.max(Decimal::ZERO));
            JarUsage {
                label: j.label,
                name: j.name.clone(),
                target_percent: j.percentage,
                spent_percent,
                over: spent_percent > j.percentage as i64,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JarStatus {
    Good,
    Warning,
    Over,
}

#[derive(Debug, Clone, Serialize)]
pub struct JarEfficiency {
    pub label: JarLabel,
    pub name: String,
    pub spent: Decimal,
    pub budget: Decimal,
    pub ratio: Decimal,
    pub status: JarStatus,
}

pub fn jar_efficiency(
    transactions: &[Transaction],
    categories: &[Category],
    jars: &[FinancialJar],
    income: Decimal,
) -> Vec<JarEfficiency> {
    if income <= Decimal::ZERO {
        return Vec::new();
    }
    let totals = expense_by_jar(transactions, categories);
    jars.iter()
        .map(|j| {
            let spent = totals.get(&j.label).copied().unwrap_or(Decimal::ZERO);
            let budget = income * Decimal::from(j.percentage) / Decimal::ONE_HUNDRED;
            let ratio = if budget > Decimal::ZERO {
                spent / budget
            } else {
                Decimal::ZERO
            };
            let status = if ratio > Decimal::ONE {
                JarStatus::Over
            } else if ratio > Decimal::new(8, 1) {
                JarStatus::Warning
            } else {
                JarStatus::Good
            };
            JarEfficiency {
                label: j.label,
                name: j.name.clone(),
                spent,
                budget,
                ratio,
                status,
            }
        })
        .collect()
}

pub fn jar_allocation_total(jars: &[FinancialJar]) -> u32 {
    jars.iter().map(|j| j.percentage).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rebalance {
    pub from_id: String,
    pub to_id: String,
    pub from_percentage: u32,
    pub to_percentage: u32,
}

/// Moves five points from PLAY into FFA.
pub fn suggest_rebalance(jars: &[FinancialJar]) -> Result<Rebalance> {
    let play = jars
        .iter()
        .find(|j| j.label == JarLabel::PLAY)
        .ok_or_else(|| anyhow!("No PLAY jar configured"))?;
    let ffa = jars
        .iter()
        .find(|j| j.label == JarLabel::FFA)
        .ok_or_else(|| anyhow!("No FFA jar configured"))?;
    if play.percentage < REBALANCE_STEP {
        return Err(anyhow!(
            "PLAY jar holds {}%, not enough to move {}%",
            play.percentage,
            REBALANCE_STEP
        ));
    }
    Ok(Rebalance {
        from_id: play.id.clone(),
        to_id: ffa.id.clone(),
        from_percentage: play.percentage - REBALANCE_STEP,
        to_percentage: ffa.percentage + REBALANCE_STEP,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiPoint {
    pub month: String,
    pub income: Decimal,
    pub investment: Decimal,
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

fn in_month(t: &Transaction, first: NaiveDate, last: NaiveDate) -> bool {
    let d = t.date.date_naive();
    d >= first && d <= last
}

/// Income against money routed to investment-like categories, six months back.
pub fn roi_chart(
    transactions: &[Transaction],
    categories: &[Category],
    today: NaiveDate,
) -> Vec<RoiPoint> {
    let index = CategoryIndex::new(categories);
    let mut points = Vec::with_capacity(6);
    for back in (0..6u32).rev() {
        let Some(month_date) = today.checked_sub_months(Months::new(back)) else {
            continue;
        };
        let Some((first, last)) = month_bounds(month_date.year(), month_date.month()) else {
            continue;
        };
        let mut income = Decimal::ZERO;
        let mut investment = Decimal::ZERO;
        for t in transactions.iter().filter(|t| in_month(t, first, last)) {
            if t.is_income() {
                income += t.amount;
            }
            if is_investment_name(index.raw_name(&t.category_id)) {
                investment += t.amount;
            }
        }
        points.push(RoiPoint {
            month: month_date.format("%m/%y").to_string(),
            income,
            investment,
        });
    }
    points
}

/// Calendar-month totals for the month view.
pub fn month_summary(transactions: &[Transaction], year: i32, month: u32) -> Summary {
    match month_bounds(year, month) {
        Some((first, last)) => summarize(transactions.iter().filter(|t| in_month(t, first, last))),
        None => Summary::default(),
    }
}

/// `(1 + rate)^years` by square-and-multiply. `None` once the factor leaves
/// the `Decimal` range.
fn growth_factor(rate: Decimal, years: u32) -> Option<Decimal> {
    let mut factor = Decimal::ONE;
    let mut base = Decimal::ONE + rate;
    let mut n = years;
    while n > 0 {
        if n & 1 == 1 {
            factor = factor.checked_mul(base)?;
        }
        n >>= 1;
        // base >= 1, so a square that overflows would overflow the factor too
        if n > 0 {
            base = base.checked_mul(base)?;
        }
    }
    Some(factor)
}

/// What `amount` grows to at 6 % a year. `None` when the result does not fit
/// in a `Decimal`.
pub fn opportunity_cost(amount: Decimal, years: u32) -> Option<Decimal> {
    let factor = growth_factor(Decimal::new(6, 2), years)?;
    amount.checked_mul(factor).map(round_half_away)
}

/// What `amount` is worth after `years` of 4 % inflation.
///
/// Saturates at zero: once the discount factor leaves the `Decimal` range the
/// remaining value is below half a unit of any representable amount.
pub fn inflation_impact(amount: Decimal, years: u32) -> Decimal {
    match growth_factor(Decimal::new(4, 2), years) {
        Some(factor) => round_half_away(amount / factor),
        None => Decimal::ZERO,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilityStatus {
    Optimal,
    Diminishing,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarginalUtility {
    pub status: UtilityStatus,
    pub message: String,
}

pub fn marginal_utility(
    category_name: &str,
    current_spend: Decimal,
    total_income: Decimal,
    jar_percentage: u32,
) -> MarginalUtility {
    if total_income <= Decimal::ZERO {
        return MarginalUtility {
            status: UtilityStatus::Optimal,
            message: "Chưa đủ dữ liệu thu nhập để phân tích.".to_string(),
        };
    }
    let ideal = total_income * Decimal::from(jar_percentage) / Decimal::ONE_HUNDRED;
    let ratio = if ideal > Decimal::ZERO {
        current_spend / ideal
    } else {
        Decimal::ZERO
    };

    if ratio > Decimal::new(15, 1) {
        MarginalUtility {
            status: UtilityStatus::Critical,
            message: format!(
                "Hữu dụng biên của mục {} đang giảm mạnh. Mỗi đồng chi thêm đang làm hại kế hoạch tự do tài chính của bạn.",
                category_name
            ),
        }
    } else if ratio > Decimal::new(11, 1) {
        MarginalUtility {
            status: UtilityStatus::Diminishing,
            message: format!(
                "Chi tiêu cho {} đang chạm ngưỡng bão hòa. Hãy cân nhắc lợi ích thực sự của lần mua sắm tiếp theo.",
                category_name
            ),
        }
    } else {
        MarginalUtility {
            status: UtilityStatus::Optimal,
            message: "Mức chi tiêu hiện tại đang nằm trong vùng tối ưu hóa lợi ích.".to_string(),
        }
    }
}
