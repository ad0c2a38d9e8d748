// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised by `FinanceStore` before anything reaches storage.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid amount {0}: amounts must be zero or positive")]
    InvalidAmount(Decimal),
    #[error("Invalid cycle start day {0}: expected 1..=28")]
    InvalidCycleDay(u32),
    #[error("Invalid jar percentage {0}: expected 0..=100")]
    InvalidPercentage(u32),
    #[error("Transaction '{0}' not found")]
    TransactionNotFound(String),
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),
    #[error("Category '{0}' is a default category and cannot be deleted")]
    DefaultCategory(String),
    #[error("Jar '{0}' not found")]
    JarNotFound(String),
    #[error("Invalid import document: {0}")]
    InvalidImport(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for FinanceError {
    fn from(err: rusqlite::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::Storage(err.to_string())
    }
}

pub type FinanceResult<T> = Result<T, FinanceError>;
