// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based analytics over the current budget cycle.
//!
//! Everything here is a pure function of the transaction list, the category
//! list, the cycle start day and "today". Nothing is cached.

use crate::classify::{CategoryIndex, is_fixed_expense_name};
use crate::cycle::{calculate_summary, cycle_range};
use crate::models::{Category, Transaction, TxKind};
use crate::utils::{fmt_amount, percent_of, round_half_away};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use tracing::debug;

const TOP_CATEGORY_COUNT: usize = 3;
const HIGH_FREQUENCY_EXPENSES: usize = 20;
const RECURRING_CAP: usize = 3;
const ANOMALY_CAP: usize = 2;
const RECOMMENDATION_CAP: usize = 4;
const NO_DAY: &str = "N/A";

const MSG_RATIO_ALERT: &str = "Cảnh báo: Tỷ lệ chi tiêu đã chiếm {}% thu nhập, vượt ngưỡng an toàn (80%).";
const MSG_NEGATIVE_BALANCE: &str =
    "Cảnh báo âm quỹ: Tổng chi tiêu đang vượt quá tổng thu nhập trong chu kỳ này.";
const MSG_HIGH_FREQUENCY: &str =
    "Tần suất chi tiêu cao: Bạn có hơn 20 giao dịch trong chu kỳ, dễ dẫn đến rò rỉ tài chính.";
const MSG_STABLE_LIFESTYLE: &str = "Lối sống ổn định: Chi phí cố định chiếm ưu thế.";
const MSG_FLEXIBLE_LIFESTYLE: &str =
    "Lối sống linh hoạt: Các khoản chi ngẫu hứng và dịch vụ chiếm tỷ trọng cao.";
const MSG_CONCENTRATED: &str = "Chi tiêu tập trung quá lớn vào một mục duy nhất.";
const REC_CUT_COSTS: &str =
    "Cắt giảm ngay 15% chi phí linh hoạt để đưa tỷ lệ chi về mức an toàn.";
const REC_SAVE_MORE: &str =
    "Bạn đang quản lý tốt, hãy trích thêm 5% thu nhập vào quỹ dự phòng.";
const REC_REVIEW_RECURRING: &str = "Kiểm tra lại các giao dịch lặp lại để xem có dịch vụ nào không còn sử dụng nhưng vẫn trả phí không.";
const REC_CAP_TOP: &str = "Đặt giới hạn chi tiêu cho danh mục đứng đầu để tối ưu hóa dòng tiền.";
const TIP_RED_ALERT: &str = "Mức chi tiêu đang ở ngưỡng báo động đỏ (trên 90%). Hãy tạm dừng mọi khoản mua sắm không thiết yếu ngay lập tức.";
const TIP_24H_RULE: &str = "Dòng tiền đang bắt đầu thắt chặt. Hãy áp dụng quy tắc 24h: Đợi 1 ngày trước khi mua bất kỳ món đồ nào trên 200k.";
const TIP_IMPULSE: &str = "Chi phí linh hoạt của bạn quá cao. Đây là dấu hiệu của việc chi tiêu ngẫu hứng (Impulse buying).";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticReport {
    pub overview: Overview,
    pub spending_analysis: SpendingAnalysis,
    pub cash_flow: CashFlow,
    pub behavior: Behavior,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_balance: Decimal,
    pub expense_to_income_ratio_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub amount: Decimal,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighSpending {
    pub category: String,
    pub amount: Decimal,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStructure {
    pub fixed_expenses: Decimal,
    pub flexible_expenses: Decimal,
    pub fixed_ratio_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    pub top_3_categories: Vec<CategoryShare>,
    pub abnormal_high_spending: Vec<HighSpending>,
    pub structure: ExpenseStructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowTrend {
    Stable,
    UpwardExpense,
    EfficientSaving,
}

impl FlowTrend {
    /// Classifies an expense/income ratio.
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio > Decimal::new(9, 1) {
            FlowTrend::UpwardExpense
        } else if ratio < Decimal::new(6, 1) {
            FlowTrend::EfficientSaving
        } else {
            FlowTrend::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowTrend::Stable => "STABLE",
            FlowTrend::UpwardExpense => "UPWARD_EXPENSE",
            FlowTrend::EfficientSaving => "EFFICIENT_SAVING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub peak_expense_day: String,
    pub peak_income_day: String,
    pub flow_trend: FlowTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub habits: Vec<String>,
    pub recurring_spending: Vec<String>,
    pub anomalies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    fn critical(message: String) -> Self {
        Alert {
            level: AlertLevel::Critical,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Alert {
            level: AlertLevel::Warning,
            message,
        }
    }
}

/// `expense / income`, or 0 when there is no income.
pub fn expense_ratio(income: Decimal, expense: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        expense / income
    } else {
        Decimal::ZERO
    }
}

fn ratio_percent(ratio: Decimal) -> i64 {
    round_half_away(ratio * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(0)
}

/// Per-category expense totals in first-seen order, largest first.
/// Equal amounts keep their first-seen order.
fn category_breakdown(
    current: &[&Transaction],
    index: &CategoryIndex<'_>,
    total_expense: Decimal,
) -> Vec<CategoryShare> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for t in current.iter().filter(|t| t.is_expense()) {
        let entry = totals.entry(t.category_id.as_str()).or_insert_with(|| {
            order.push(t.category_id.as_str());
            Decimal::ZERO
        });
        *entry += t.amount;
    }

    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|id| {
            let amount = totals[id];
            CategoryShare {
                name: index.name(id).to_string(),
                amount,
                percentage: percent_of(amount, total_expense),
            }
        })
        .collect();
    shares.sort_by(|a, b| b.amount.cmp(&a.amount));
    shares
}

fn expense_structure(
    current: &[&Transaction],
    index: &CategoryIndex<'_>,
    total_expense: Decimal,
) -> ExpenseStructure {
    let mut fixed = Decimal::ZERO;
    let mut flexible = Decimal::ZERO;
    for t in current.iter().filter(|t| t.is_expense()) {
        if is_fixed_expense_name(index.raw_name(&t.category_id)) {
            fixed += t.amount;
        } else {
            flexible += t.amount;
        }
    }
    ExpenseStructure {
        fixed_expenses: fixed,
        flexible_expenses: flexible,
        fixed_ratio_percent: percent_of(fixed, total_expense),
    }
}

/// Day with the largest total for `kind`; ties go to the earliest day.
fn peak_day(current: &[&Transaction], kind: TxKind) -> String {
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in current.iter().filter(|t| t.kind == kind) {
        *daily.entry(t.date.date_naive()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut best: Option<(NaiveDate, Decimal)> = None;
    for (day, total) in daily {
        match best {
            Some((_, top)) if total <= top => {}
            _ => best = Some((day, total)),
        }
    }
    best.map(|(day, _)| day.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NO_DAY.to_string())
}

fn normalized_note(t: &Transaction) -> String {
    t.note.trim().to_lowercase()
}

/// Notes longer than two characters that repeat across in-cycle expenses.
fn recurring_notes(current: &[&Transaction]) -> Vec<String> {
    let notes: Vec<String> = current
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| normalized_note(t))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for n in &notes {
        *counts.entry(n.as_str()).or_insert(0) += 1;
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for n in &notes {
        if n.chars().count() > 2 && counts[n.as_str()] > 1 && seen.insert(n.as_str()) {
            out.push(n.clone());
            if out.len() == RECURRING_CAP {
                break;
            }
        }
    }
    out
}

fn anomalies(current: &[&Transaction], income: Decimal) -> Vec<String> {
    let threshold = income * Decimal::new(2, 1);
    current
        .iter()
        .filter(|t| t.amount > threshold)
        .take(ANOMALY_CAP)
        .map(|t| {
            format!(
                "Giao dịch đột biến: {}đ vào ngày {}",
                fmt_amount(&t.amount),
                t.date.format("%d/%m")
            )
        })
        .collect()
}

pub fn generate_report(
    transactions: &[Transaction],
    categories: &[Category],
    cycle_start_day: u32,
    today: NaiveDate,
) -> AnalyticReport {
    let range = cycle_range(today, cycle_start_day);
    let current: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| range.contains(&t.date))
        .collect();
    let summary = calculate_summary(transactions, &range);
    let index = CategoryIndex::new(categories);

    let sorted = category_breakdown(&current, &index, summary.expense);
    let abnormal: Vec<HighSpending> = sorted
        .iter()
        .filter(|c| c.percentage > 40)
        .map(|c| HighSpending {
            category: c.name.clone(),
            amount: c.amount,
            reason: MSG_CONCENTRATED.to_string(),
        })
        .collect();
    let top3: Vec<CategoryShare> = sorted.into_iter().take(TOP_CATEGORY_COUNT).collect();
    let structure = expense_structure(&current, &index, summary.expense);

    let ratio = expense_ratio(summary.income, summary.expense);
    let ratio_pct = ratio_percent(ratio);

    let mut alerts = Vec::new();
    if ratio > Decimal::new(8, 1) {
        alerts.push(Alert::critical(MSG_RATIO_ALERT.replace("{}", &ratio_pct.to_string())));
    }
    if summary.balance < Decimal::ZERO {
        alerts.push(Alert::critical(MSG_NEGATIVE_BALANCE.to_string()));
    }
    for c in top3.iter().filter(|c| c.percentage > 50) {
        alerts.push(Alert::warning(format!(
            "Danh mục \"{}\" đang ngốn quá nửa ngân sách chi tiêu của bạn ({}%).",
            c.name, c.percentage
        )));
    }

    let mut habits = Vec::new();
    if current.iter().filter(|t| t.is_expense()).count() > HIGH_FREQUENCY_EXPENSES {
        habits.push(MSG_HIGH_FREQUENCY.to_string());
    }
    if structure.fixed_expenses > structure.flexible_expenses {
        habits.push(MSG_STABLE_LIFESTYLE.to_string());
    } else {
        habits.push(MSG_FLEXIBLE_LIFESTYLE.to_string());
    }

    let seed = if ratio > Decimal::new(8, 1) {
        REC_CUT_COSTS
    } else {
        REC_SAVE_MORE
    };

    debug!(
        in_cycle = current.len(),
        ratio_pct,
        alerts = alerts.len(),
        "generated cycle report"
    );

    AnalyticReport {
        overview: Overview {
            total_income: summary.income,
            total_expense: summary.expense,
            net_balance: summary.balance,
            expense_to_income_ratio_percent: ratio_pct,
        },
        spending_analysis: SpendingAnalysis {
            top_3_categories: top3,
            abnormal_high_spending: abnormal,
            structure,
        },
        cash_flow: CashFlow {
            peak_expense_day: peak_day(&current, TxKind::Expense),
            peak_income_day: peak_day(&current, TxKind::Income),
            flow_trend: FlowTrend::from_ratio(ratio),
        },
        behavior: Behavior {
            habits,
            recurring_spending: recurring_notes(&current),
            anomalies: anomalies(&current, summary.income),
        },
        alerts,
        recommendations: vec![
            seed.to_string(),
            REC_REVIEW_RECURRING.to_string(),
            REC_CAP_TOP.to_string(),
        ],
    }
}

/// Report for the cycle containing today's UTC date.
pub fn generate_report_now(
    transactions: &[Transaction],
    categories: &[Category],
    cycle_start_day: u32,
) -> AnalyticReport {
    generate_report(
        transactions,
        categories,
        cycle_start_day,
        Utc::now().date_naive(),
    )
}

/// Prepends up to two tips derived from the report itself, keeping at most four.
pub fn personalize(mut report: AnalyticReport) -> AnalyticReport {
    let mut tips: Vec<String> = Vec::new();
    let ratio = report.overview.expense_to_income_ratio_percent;
    if ratio > 90 {
        tips.push(TIP_RED_ALERT.to_string());
    } else if ratio > 70 {
        tips.push(TIP_24H_RULE.to_string());
    }
    if report.spending_analysis.structure.fixed_ratio_percent < 30 {
        tips.push(TIP_IMPULSE.to_string());
    }
    tips.append(&mut report.recommendations);
    tips.truncate(RECOMMENDATION_CAP);
    report.recommendations = tips;
    report
}

/// The "deep" analysis: an optional pause, then the personalized report.
/// The delay never changes the output.
pub fn deep_analysis(
    transactions: &[Transaction],
    categories: &[Category],
    cycle_start_day: u32,
    today: NaiveDate,
    delay: Option<Duration>,
) -> AnalyticReport {
    if let Some(pause) = delay {
        debug!(ms = pause.as_millis() as u64, "simulating analysis delay");
        std::thread::sleep(pause);
    }
    personalize(generate_report(
        transactions,
        categories,
        cycle_start_day,
        today,
    ))
}
