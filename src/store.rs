// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state with write-through persistence.
//!
//! Each collection lives under its own key. A mutation rewrites the whole
//! collection it touched; there is no cross-key transaction, so a crash between
//! two writes can leave them out of step.

use crate::classify::FALLBACK_CATEGORY_NAME;
use crate::cycle::is_valid_cycle_day;
use crate::db::KvStore;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Category, ExportBundle, FinancialJar, PaymentSource, Settings, Transaction, TxKind,
    default_expense_categories, default_income_categories, default_jars,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

pub const TX_KEY: &str = "moneymind_transactions_v2";
pub const CAT_IN_KEY: &str = "income_categories_v2";
pub const CAT_EX_KEY: &str = "expense_categories_v2";
pub const SETTINGS_KEY: &str = "moneymind_settings_v2";
pub const JARS_KEY: &str = "moneymind_jars_v2";

pub const EXPORT_VERSION: &str = "2.0";

/// Validated input for a new or edited transaction.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TxKind,
    pub amount: Decimal,
    pub category_id: String,
    pub date: DateTime<Utc>,
    pub source: PaymentSource,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Drop every stored transaction and keep only the imported ones.
    Replace,
    /// Imported records overwrite same-id ones; unseen ids are prepended.
    Merge,
}

pub struct FinanceStore<K: KvStore> {
    kv: K,
    transactions: Vec<Transaction>,
    income_categories: Vec<Category>,
    expense_categories: Vec<Category>,
    settings: Settings,
    jars: Vec<FinancialJar>,
}

/// Parses one key, falling back to `default` when it is absent or corrupt.
fn load_or<K, T, F>(kv: &K, key: &str, default: F) -> FinanceResult<T>
where
    K: KvStore,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match kv.load(key)? {
        None => Ok(default()),
        Some(raw) => match serde_json::from_str::<T>(&raw) {
            Ok(v) => Ok(v),
            Err(err) => {
                warn!(key, error = %err, "stored snapshot is corrupt; resetting to defaults");
                Ok(default())
            }
        },
    }
}

impl<K: KvStore> FinanceStore<K> {
    pub fn load(kv: K) -> FinanceResult<Self> {
        let transactions = load_or(&kv, TX_KEY, Vec::new)?;
        let income_categories = load_or(&kv, CAT_IN_KEY, default_income_categories)?;
        let expense_categories = load_or(&kv, CAT_EX_KEY, default_expense_categories)?;
        let mut settings: Settings = load_or(&kv, SETTINGS_KEY, Settings::default)?;
        if settings.cycle_start_day == 0 {
            settings.cycle_start_day = 1;
        }
        let jars = load_or(&kv, JARS_KEY, default_jars)?;
        Ok(FinanceStore {
            kv,
            transactions,
            income_categories,
            expense_categories,
            settings,
            jars,
        })
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> FinanceResult<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.save(key, &raw)
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn income_categories(&self) -> &[Category] {
        &self.income_categories
    }

    pub fn expense_categories(&self) -> &[Category] {
        &self.expense_categories
    }

    /// Income categories followed by expense categories.
    pub fn categories(&self) -> Vec<Category> {
        self.income_categories
            .iter()
            .chain(self.expense_categories.iter())
            .cloned()
            .collect()
    }

    pub fn categories_of(&self, kind: TxKind) -> &[Category] {
        match kind {
            TxKind::Income => &self.income_categories,
            TxKind::Expense => &self.expense_categories,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn cycle_start_day(&self) -> u32 {
        self.settings.cycle_start_day
    }

    pub fn jars(&self) -> &[FinancialJar] {
        &self.jars
    }

    pub fn find_transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Case-insensitive lookup by id first, then by display name within `kind`.
    pub fn resolve_category(&self, kind: TxKind, key: &str) -> Option<&Category> {
        let key = key.trim();
        let list = self.categories_of(kind);
        list.iter().find(|c| c.id == key).or_else(|| {
            let lower = key.to_lowercase();
            list.iter().find(|c| c.name.to_lowercase() == lower)
        })
    }

    fn validate(draft: &TransactionDraft) -> FinanceResult<()> {
        if draft.amount.is_sign_negative() && !draft.amount.is_zero() {
            return Err(FinanceError::InvalidAmount(draft.amount));
        }
        Ok(())
    }

    /// Records a new transaction at the front of the list.
    pub fn add_transaction(
        &mut self,
        draft: TransactionDraft,
        created_at: DateTime<Utc>,
    ) -> FinanceResult<Transaction> {
        Self::validate(&draft)?;
        let tx = Transaction {
            id: Uuid::new_v4().to_string(),
            kind: draft.kind,
            amount: draft.amount,
            category_id: draft.category_id,
            date: draft.date,
            source: draft.source,
            note: draft.note,
            created_at: created_at.timestamp_millis(),
            is_locked: None,
        };
        self.transactions.insert(0, tx.clone());
        self.persist(TX_KEY, &self.transactions)?;
        info!(id = %tx.id, kind = %tx.kind, amount = %tx.amount, "transaction added");
        Ok(tx)
    }

    /// Replaces the record with the same id wholesale; `createdAt` is kept.
    pub fn update_transaction(&mut self, id: &str, draft: TransactionDraft) -> FinanceResult<Transaction> {
        Self::validate(&draft)?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| FinanceError::TransactionNotFound(id.to_string()))?;
        let updated = Transaction {
            id: slot.id.clone(),
            kind: draft.kind,
            amount: draft.amount,
            category_id: draft.category_id,
            date: draft.date,
            source: draft.source,
            note: draft.note,
            created_at: slot.created_at,
            is_locked: slot.is_locked,
        };
        *slot = updated.clone();
        self.persist(TX_KEY, &self.transactions)?;
        info!(id, "transaction updated");
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, id: &str) -> FinanceResult<Transaction> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| FinanceError::TransactionNotFound(id.to_string()))?;
        let removed = self.transactions.remove(pos);
        self.persist(TX_KEY, &self.transactions)?;
        info!(id, "transaction deleted");
        Ok(removed)
    }

    pub fn add_category(
        &mut self,
        name: &str,
        icon_name: &str,
        color: &str,
        kind: TxKind,
    ) -> FinanceResult<Category> {
        let cat = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            icon_name: icon_name.to_string(),
            color: color.to_string(),
            kind,
            is_default: false,
        };
        let key = match kind {
            TxKind::Income => {
                self.income_categories.push(cat.clone());
                CAT_IN_KEY
            }
            TxKind::Expense => {
                self.expense_categories.push(cat.clone());
                CAT_EX_KEY
            }
        };
        self.persist(key, self.categories_of(kind))?;
        info!(id = %cat.id, name = %cat.name, "category added");
        Ok(cat)
    }

    /// Deletes a user category; its transactions move to the same-type default
    /// "Khác", or to the first remaining category when there is none.
    /// Returns how many transactions were reassigned.
    pub fn delete_category(&mut self, id: &str, kind: TxKind) -> FinanceResult<usize> {
        let list = self.categories_of(kind);
        let target = list
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| FinanceError::CategoryNotFound(id.to_string()))?;
        if target.is_default {
            return Err(FinanceError::DefaultCategory(target.name.clone()));
        }

        let fallback = list
            .iter()
            .find(|c| c.name == FALLBACK_CATEGORY_NAME && c.is_default)
            .or_else(|| list.iter().find(|c| c.id != id))
            .map(|c| c.id.clone());

        let mut moved = 0;
        if let Some(fallback_id) = fallback {
            for t in self.transactions.iter_mut().filter(|t| t.category_id == id) {
                t.category_id = fallback_id.clone();
                moved += 1;
            }
            self.persist(TX_KEY, &self.transactions)?;
        }

        let (key, list) = match kind {
            TxKind::Income => (CAT_IN_KEY, &mut self.income_categories),
            TxKind::Expense => (CAT_EX_KEY, &mut self.expense_categories),
        };
        list.retain(|c| c.id != id);
        let raw = serde_json::to_string(list)?;
        self.kv.save(key, &raw)?;
        info!(id, moved, "category deleted");
        Ok(moved)
    }

    pub fn save_settings(&mut self, cycle_start_day: u32, is_auto_lock: bool) -> FinanceResult<()> {
        if !is_valid_cycle_day(cycle_start_day) {
            return Err(FinanceError::InvalidCycleDay(cycle_start_day));
        }
        self.settings = Settings {
            cycle_start_day,
            is_auto_lock,
        };
        self.persist(SETTINGS_KEY, &self.settings)?;
        info!(cycle_start_day, is_auto_lock, "settings saved");
        Ok(())
    }

    /// Sets one jar's share. The total is not forced to 100.
    pub fn update_jar_percentage(&mut self, id: &str, percentage: u32) -> FinanceResult<()> {
        if percentage > 100 {
            return Err(FinanceError::InvalidPercentage(percentage));
        }
        let jar = self
            .jars
            .iter_mut()
            .find(|j| j.id == id || j.label.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| FinanceError::JarNotFound(id.to_string()))?;
        jar.percentage = percentage;
        self.persist(JARS_KEY, &self.jars)?;
        info!(id, percentage, "jar updated");
        Ok(())
    }

    /// Wipes storage and resets every collection to its seed.
    pub fn clear_data(&mut self) -> FinanceResult<()> {
        self.kv.clear()?;
        self.transactions.clear();
        self.income_categories = default_income_categories();
        self.expense_categories = default_expense_categories();
        self.settings = Settings::default();
        self.jars = default_jars();
        warn!("all data cleared");
        Ok(())
    }

    pub fn export_bundle(&self, now: DateTime<Utc>) -> ExportBundle {
        ExportBundle {
            transactions: self.transactions.clone(),
            export_date: Some(now),
            version: Some(EXPORT_VERSION.to_string()),
        }
    }

    /// Accepts any JSON object with a `transactions` array.
    pub fn import_bundle(&mut self, raw: &str, mode: ImportMode) -> FinanceResult<usize> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| FinanceError::InvalidImport(e.to_string()))?;
        let txs = value
            .get("transactions")
            .ok_or_else(|| FinanceError::InvalidImport("missing 'transactions' field".into()))?;
        let incoming: Vec<Transaction> = serde_json::from_value(txs.clone())
            .map_err(|e| FinanceError::InvalidImport(e.to_string()))?;
        if let Some(bad) = incoming
            .iter()
            .find(|t| t.amount.is_sign_negative() && !t.amount.is_zero())
        {
            return Err(FinanceError::InvalidAmount(bad.amount));
        }
        self.import_transactions(incoming, mode)
    }

    pub fn import_transactions(
        &mut self,
        incoming: Vec<Transaction>,
        mode: ImportMode,
    ) -> FinanceResult<usize> {
        let count = incoming.len();
        match mode {
            ImportMode::Replace => self.transactions = incoming,
            ImportMode::Merge => {
                let positions: HashMap<String, usize> = self
                    .transactions
                    .iter()
                    .enumerate()
                    .map(|(i, t)| (t.id.clone(), i))
                    .collect();
                let mut fresh = Vec::new();
                for t in incoming {
                    match positions.get(&t.id) {
                        Some(&i) => self.transactions[i] = t,
                        None => fresh.push(t),
                    }
                }
                fresh.append(&mut self.transactions);
                self.transactions = fresh;
            }
        }
        self.persist(TX_KEY, &self.transactions)?;
        info!(count, ?mode, "transactions imported");
        Ok(count)
    }
}
