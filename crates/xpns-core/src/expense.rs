use std::cmp::Reverse;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::tags::TagRegistry;

pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Expense {
    pub fn blank(date: NaiveDate, currency: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            description: String::new(),
            amount: 0.0,
            currency: currency.to_string(),
            exchange_rate: None,
            tags: vec![],
        }
    }

    /// Amount converted into `default_currency` where a rate is known.
    pub fn amount_in(&self, default_currency: &str) -> f64 {
        match self.exchange_rate {
            Some(rate) if self.currency != default_currency => self.amount * rate,
            _ => self.amount,
        }
    }
}

/// All persisted data: the tag taxonomy and the expense records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub categories: TagRegistry,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Ledger {
    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Replaces the record with the same id or appends it. Returns true when
    /// it was new.
    pub fn upsert(&mut self, expense: Expense) -> bool {
        if let Some(existing) = self.expenses.iter_mut().find(|e| e.id == expense.id) {
            *existing = expense;
            false
        } else {
            self.expenses.push(expense);
            true
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Expense> {
        let idx = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(idx))
    }

    pub fn on_day(&self, date: NaiveDate) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| e.date == date).collect()
    }

    pub fn in_month(&self, date: NaiveDate) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| same_month(e.date, date))
            .collect()
    }

    /// Distinct descriptions, most recently dated first.
    pub fn recent_descriptions(&self) -> Vec<&str> {
        let mut expenses: Vec<&Expense> = self.expenses.iter().collect();
        expenses.sort_by_key(|e| Reverse(e.date));

        let mut out: Vec<&str> = Vec::new();
        for expense in expenses {
            let description = expense.description.trim();
            if !description.is_empty() && !out.contains(&description) {
                out.push(description);
            }
        }
        out
    }
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Where the ledger lives. `save` persists tags and expenses as a whole;
/// `delete_position` removes one record from durable storage.
#[allow(async_fn_in_trait)]
pub trait ExpenseStore {
    fn load(&mut self) -> anyhow::Result<Ledger>;

    fn save(&mut self, ledger: &Ledger) -> anyhow::Result<()>;

    fn prepare_create(&self, date: NaiveDate, currency: &str) -> Expense {
        Expense::blank(date, currency)
    }

    async fn delete_position(&mut self, expense: &Expense) -> anyhow::Result<()>;
}

/// Keeps everything in memory. Used by tests and as the starting point of a
/// session that has nothing stored yet.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub ledger: Ledger,
    pub saves: usize,
    pub deleted: Vec<Uuid>,
}

impl MemoryStore {
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }
}

impl ExpenseStore for MemoryStore {
    fn load(&mut self) -> anyhow::Result<Ledger> {
        Ok(self.ledger.clone())
    }

    fn save(&mut self, ledger: &Ledger) -> anyhow::Result<()> {
        self.ledger = ledger.clone();
        self.saves += 1;
        debug!(saves = self.saves, "saved ledger in memory");
        Ok(())
    }

    async fn delete_position(&mut self, expense: &Expense) -> anyhow::Result<()> {
        self.ledger.remove(expense.id);
        self.deleted.push(expense.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn expense(date: NaiveDate, description: &str, amount: f64) -> Expense {
        Expense {
            description: description.to_string(),
            amount,
            ..Expense::blank(date, DEFAULT_CURRENCY)
        }
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut ledger = Ledger::default();
        let mut item = expense(day(2026, 10, 1), "Bread", 2.5);
        assert!(ledger.upsert(item.clone()));
        item.amount = 3.0;
        assert!(!ledger.upsert(item.clone()));
        assert_eq!(ledger.expenses.len(), 1);
        assert_eq!(ledger.get(item.id).map(|e| e.amount), Some(3.0));
    }

    #[test]
    fn month_and_day_filters() {
        let mut ledger = Ledger::default();
        ledger.upsert(expense(day(2026, 10, 1), "Bread", 2.5));
        ledger.upsert(expense(day(2026, 10, 15), "Milk", 1.0));
        ledger.upsert(expense(day(2026, 11, 1), "Tea", 4.0));
        assert_eq!(ledger.in_month(day(2026, 10, 20)).len(), 2);
        assert_eq!(ledger.on_day(day(2026, 10, 15)).len(), 1);
    }

    #[test]
    fn recent_descriptions_are_distinct_and_newest_first() {
        let mut ledger = Ledger::default();
        ledger.upsert(expense(day(2026, 10, 1), "Bread", 2.5));
        ledger.upsert(expense(day(2026, 10, 3), "Milk", 1.0));
        ledger.upsert(expense(day(2026, 10, 2), "Bread", 2.0));
        assert_eq!(ledger.recent_descriptions(), vec!["Milk", "Bread"]);
    }

    #[test]
    fn foreign_amount_uses_rate() {
        let mut item = expense(day(2026, 10, 1), "Coffee", 10.0);
        item.currency = "CHF".to_string();
        item.exchange_rate = Some(1.05);
        assert!((item.amount_in(DEFAULT_CURRENCY) - 10.5).abs() < 1e-9);
    }
}
