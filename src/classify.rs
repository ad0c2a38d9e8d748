// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword heuristics over category names. Rule order is part of the
//! observable behaviour: the first rule whose keywords match wins.

use crate::models::{Category, JarLabel};
use std::collections::HashMap;

/// Display name used when a transaction points at a category that no longer exists.
pub const FALLBACK_CATEGORY_NAME: &str = "Khác";

const JAR_RULES: [(&[&str], JarLabel); 6] = [
    (&["ăn", "hóa đơn", "nhà", "điện", "khác"], JarLabel::NEC),
    (&["giải trí", "mua sắm", "cafe", "du lịch"], JarLabel::PLAY),
    (&["học", "giáo dục"], JarLabel::EDU),
    (&["đầu tư", "tự do"], JarLabel::FFA),
    (&["tiết kiệm", "tích lũy"], JarLabel::LTSS),
    (&["từ thiện", "cho đi"], JarLabel::GIVE),
];

const FIXED_KEYWORDS: [&str; 6] = ["hóa đơn", "nhà", "điện", "nước", "internet", "cố định"];

const INVESTMENT_KEYWORDS: [&str; 3] = ["đầu tư", "tự do", "tiết kiệm"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub fn jar_label_for_name(name: &str) -> JarLabel {
    let lower = name.to_lowercase();
    JAR_RULES
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, label)| *label)
        .unwrap_or(JarLabel::NEC)
}

/// Jar for a category id; unknown ids fall back to NEC.
pub fn classify(categories: &[Category], category_id: &str) -> JarLabel {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| jar_label_for_name(&c.name))
        .unwrap_or(JarLabel::NEC)
}

pub fn is_fixed_expense_name(name: &str) -> bool {
    contains_any(&name.to_lowercase(), &FIXED_KEYWORDS)
}

pub fn is_investment_name(name: &str) -> bool {
    contains_any(&name.to_lowercase(), &INVESTMENT_KEYWORDS)
}

/// Id-keyed view over a category list, built once per report.
pub struct CategoryIndex<'a> {
    by_id: HashMap<&'a str, &'a Category>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        for c in categories {
            // first definition wins, matching a linear scan
            by_id.entry(c.id.as_str()).or_insert(c);
        }
        CategoryIndex { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Category> {
        self.by_id.get(id).copied()
    }

    /// Display name, or "Khác" for dangling ids.
    pub fn name(&self, id: &str) -> &'a str {
        self.get(id)
            .map(|c| c.name.as_str())
            .unwrap_or(FALLBACK_CATEGORY_NAME)
    }

    /// Raw name for keyword tests; dangling ids give an empty name.
    pub fn raw_name(&self, id: &str) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn jar_label(&self, id: &str) -> JarLabel {
        self.get(id)
            .map(|c| jar_label_for_name(&c.name))
            .unwrap_or(JarLabel::NEC)
    }
}

pub fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(FALLBACK_CATEGORY_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // "nhà" (NEC) and "du lịch" (PLAY) both match; NEC is checked first
        assert_eq!(jar_label_for_name("Nhà nghỉ du lịch"), JarLabel::NEC);
        // "học" (EDU) and "đầu tư" (FFA): EDU first
        assert_eq!(jar_label_for_name("Đầu tư học tập"), JarLabel::EDU);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(jar_label_for_name("CAFE sáng"), JarLabel::PLAY);
        assert_eq!(jar_label_for_name("TỪ THIỆN"), JarLabel::GIVE);
    }

    #[test]
    fn fixed_keywords() {
        assert!(is_fixed_expense_name("Tiền Nước"));
        assert!(is_fixed_expense_name("Internet nhà"));
        assert!(!is_fixed_expense_name("Ăn uống"));
    }
}
