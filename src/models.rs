// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "INCOME",
            TxKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TxKind::Income),
            "expense" | "ex" | "out" => Ok(TxKind::Expense),
            other => Err(anyhow::anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

/// Where the money moved through. Older backups carry the Vietnamese labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentSource {
    #[default]
    #[serde(alias = "Tiền mặt")]
    Cash,
    #[serde(alias = "Ví điện tử")]
    EWallet,
    #[serde(alias = "Ngân hàng")]
    Bank,
}

impl PaymentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentSource::Cash => "CASH",
            PaymentSource::EWallet => "E_WALLET",
            PaymentSource::Bank => "BANK",
        }
    }
}

impl FromStr for PaymentSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cash" => Ok(PaymentSource::Cash),
            "e_wallet" | "ewallet" | "wallet" => Ok(PaymentSource::EWallet),
            "bank" => Ok(PaymentSource::Bank),
            other => Err(anyhow::anyhow!(
                "Invalid source '{}', expected cash|e-wallet|bank",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub category_id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub source: PaymentSource,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TxKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TxKind::Expense
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JarLabel {
    NEC,
    EDU,
    LTSS,
    PLAY,
    FFA,
    GIVE,
}

impl JarLabel {
    pub const ALL: [JarLabel; 6] = [
        JarLabel::NEC,
        JarLabel::EDU,
        JarLabel::LTSS,
        JarLabel::PLAY,
        JarLabel::FFA,
        JarLabel::GIVE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JarLabel::NEC => "NEC",
            JarLabel::EDU => "EDU",
            JarLabel::LTSS => "LTSS",
            JarLabel::PLAY => "PLAY",
            JarLabel::FFA => "FFA",
            JarLabel::GIVE => "GIVE",
        }
    }
}

impl fmt::Display for JarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialJar {
    pub id: String,
    pub name: String,
    pub label: JarLabel,
    pub percentage: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub cycle_start_day: u32,
    #[serde(default)]
    pub is_auto_lock: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cycle_start_day: 1,
            is_auto_lock: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl std::ops::Add for Summary {
    type Output = Summary;

    fn add(self, rhs: Summary) -> Summary {
        Summary {
            income: self.income + rhs.income,
            expense: self.expense + rhs.expense,
            balance: self.balance + rhs.balance,
        }
    }
}

/// Backup document written by `export` and read by `import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<String>,
}

fn category(id: &str, name: &str, icon: &str, color: &str, kind: TxKind) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon_name: icon.to_string(),
        color: color.to_string(),
        kind,
        is_default: true,
    }
}

pub fn default_income_categories() -> Vec<Category> {
    vec![
        category("in_1", "Lương", "Briefcase", "#34D399", TxKind::Income),
        category("in_2", "Đầu tư", "TrendingUp", "#2DD4BF", TxKind::Income),
        category("in_3", "Khác", "MoreHorizontal", "#94A3B8", TxKind::Income),
    ]
}

pub fn default_expense_categories() -> Vec<Category> {
    vec![
        category("ex_1", "Ăn uống", "Utensils", "#F87171", TxKind::Expense),
        category("ex_2", "Mua sắm", "ShoppingBag", "#FB923C", TxKind::Expense),
        category("ex_3", "Hóa đơn", "Receipt", "#60A5FA", TxKind::Expense),
        category("ex_4", "Giải trí", "Gamepad2", "#A78BFA", TxKind::Expense),
        category("ex_5", "Khác", "MoreHorizontal", "#94A3B8", TxKind::Expense),
    ]
}

fn jar(id: &str, name: &str, label: JarLabel, pct: u32, color: &str, desc: &str) -> FinancialJar {
    FinancialJar {
        id: id.to_string(),
        name: name.to_string(),
        label,
        percentage: pct,
        color: color.to_string(),
        description: desc.to_string(),
    }
}

/// The six-jar seed, summing to 100.
pub fn default_jars() -> Vec<FinancialJar> {
    vec![
        jar("1", "Thiết yếu", JarLabel::NEC, 55, "#6366f1", "Chi phí sinh hoạt"),
        jar("2", "Giáo dục", JarLabel::EDU, 10, "#f59e0b", "Học tập"),
        jar("3", "Tiết kiệm dài hạn", JarLabel::LTSS, 10, "#10b981", "Mua sắm lớn"),
        jar("4", "Hưởng thụ", JarLabel::PLAY, 10, "#ec4899", "Vui chơi"),
        jar("5", "Đầu tư", JarLabel::FFA, 10, "#06b6d4", "Tự do tài chính"),
        jar("6", "Từ thiện", JarLabel::GIVE, 5, "#8b5cf6", "Giúp đỡ"),
    ]
}
