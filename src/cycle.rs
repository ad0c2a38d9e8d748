// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget cycles: a month-long window anchored on a configurable start day
//! rather than the first of the calendar month.

use crate::models::{Summary, Transaction, TxKind};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

pub const MIN_CYCLE_DAY: u32 = 1;
pub const MAX_CYCLE_DAY: u32 = 28;

/// Inclusive on both ends: `start` is 00:00:00.000, `end` is 23:59:59.999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CycleRange {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// `dd/mm/yyyy - dd/mm/yyyy`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

pub fn is_valid_cycle_day(day: u32) -> bool {
    (MIN_CYCLE_DAY..=MAX_CYCLE_DAY).contains(&day)
}

/// Range of the cycle containing `reference`. Days outside 1..=28 are clamped;
/// `FinanceStore::save_settings` rejects them before they get this far.
pub fn cycle_range(reference: NaiveDate, cycle_start_day: u32) -> CycleRange {
    let day = cycle_start_day.clamp(MIN_CYCLE_DAY, MAX_CYCLE_DAY);
    let anchor = reference
        .with_day(day)
        .expect("day 1..=28 exists in every month");
    let start = if reference.day() < day {
        anchor - Months::new(1)
    } else {
        anchor
    };
    let end = start + Months::new(1) - Days::new(1);

    let end_of_day =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("23:59:59.999 is a valid time");
    CycleRange {
        start: start.and_time(NaiveTime::MIN).and_utc(),
        end: end.and_time(end_of_day).and_utc(),
    }
}

/// Cycle containing the current UTC date.
pub fn current_cycle(cycle_start_day: u32) -> CycleRange {
    cycle_range(Utc::now().date_naive(), cycle_start_day)
}

pub fn in_range<'a>(transactions: &'a [Transaction], range: &CycleRange) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| range.contains(&t.date))
        .collect()
}

pub fn calculate_summary(transactions: &[Transaction], range: &CycleRange) -> Summary {
    summarize(transactions.iter().filter(|t| range.contains(&t.date)))
}

/// Totals over an already-filtered set.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TxKind::Income => income += t.amount,
            TxKind::Expense => expense += t.amount,
        }
    }
    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_day_on_reference_day_starts_today() {
        let r = cycle_range(d(2024, 3, 15), 15);
        assert_eq!(r.start_date(), d(2024, 3, 15));
        assert_eq!(r.end_date(), d(2024, 4, 14));
    }

    #[test]
    fn january_reference_rolls_back_into_previous_year() {
        let r = cycle_range(d(2024, 1, 3), 10);
        assert_eq!(r.start_date(), d(2023, 12, 10));
        assert_eq!(r.end_date(), d(2024, 1, 9));
    }

    #[test]
    fn out_of_range_day_is_clamped() {
        assert_eq!(cycle_range(d(2024, 3, 30), 31), cycle_range(d(2024, 3, 30), 28));
        assert_eq!(cycle_range(d(2024, 3, 30), 0), cycle_range(d(2024, 3, 30), 1));
    }

    #[test]
    fn label_uses_day_month_year() {
        let r = cycle_range(d(2024, 3, 20), 15);
        assert_eq!(r.label(), "15/03/2024 - 14/04/2024");
    }
}
