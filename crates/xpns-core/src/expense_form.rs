use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ExpensesError;
use crate::expense::{Expense, Ledger};
use crate::labels::label_names;

const MAX_PROPOSALS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Description,
    Amount,
    Currency,
    Date,
    ExchangeRate,
}

impl DraftField {
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Currency => "currency-input",
            Self::Date => "date-input",
            Self::ExchangeRate => "exchange-rate",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        [
            Self::Description,
            Self::Amount,
            Self::Currency,
            Self::Date,
            Self::ExchangeRate,
        ]
        .into_iter()
        .find(|field| field.element_id() == id)
    }
}

/// Raw text of the expense form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub id: Option<Uuid>,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub date: String,
    pub exchange_rate: String,
}

impl ExpenseDraft {
    pub fn from_expense(expense: &Expense) -> Self {
        let amount = if expense.amount == 0.0 {
            String::new()
        } else {
            expense.amount.to_string()
        };
        Self {
            id: Some(expense.id),
            description: expense.description.clone(),
            amount,
            currency: expense.currency.clone(),
            date: expense.date.format("%Y-%m-%d").to_string(),
            exchange_rate: expense
                .exchange_rate
                .map(|rate| rate.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Description => &self.description,
            DraftField::Amount => &self.amount,
            DraftField::Currency => &self.currency,
            DraftField::Date => &self.date,
            DraftField::ExchangeRate => &self.exchange_rate,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Description => self.description = value,
            DraftField::Amount => self.amount = value,
            DraftField::Currency => self.currency = value,
            DraftField::Date => self.date = value,
            DraftField::ExchangeRate => self.exchange_rate = value,
        }
    }
}

/// Accepts `12.5`, `12,5` and `1.234,56`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Turns the draft into a record, reporting every invalid field at once.
pub fn validate(draft: &ExpenseDraft, default_currency: &str) -> Result<Expense, ExpensesError> {
    let mut messages = Vec::new();
    let mut error = ExpensesError::new("");

    let description = draft.description.trim().to_string();
    if description.is_empty() {
        messages.push("Bitte eine Beschreibung eingeben.");
        error = error.with_origin(DraftField::Description.element_id());
    }

    let amount = parse_amount(&draft.amount);
    if amount.is_none() {
        messages.push("Der Betrag ist keine Zahl.");
        error = error.with_origin(DraftField::Amount.element_id());
    }

    let date = NaiveDate::parse_from_str(draft.date.trim(), "%Y-%m-%d").ok();
    if date.is_none() {
        messages.push("Das Datum ist ungültig.");
        error = error.with_origin(DraftField::Date.element_id());
    }

    let currency = match draft.currency.trim() {
        "" => default_currency.to_string(),
        other => other.to_uppercase(),
    };

    let exchange_rate = if currency == default_currency {
        None
    } else {
        let rate = parse_amount(&draft.exchange_rate).filter(|rate| *rate > 0.0);
        if rate.is_none() {
            messages.push("Für Fremdwährungen wird ein Wechselkurs benötigt.");
            error = error.with_origin(DraftField::ExchangeRate.element_id());
        }
        rate
    };

    match (amount, date) {
        (Some(amount), Some(date)) if messages.is_empty() => Ok(Expense {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            date,
            tags: label_names(&description),
            description,
            amount,
            currency,
            exchange_rate,
        }),
        _ => {
            error.message = messages.join(" ");
            Err(error)
        }
    }
}

/// Earlier descriptions starting with what was typed, newest first.
pub fn proposals(ledger: &Ledger, typed: &str) -> Vec<String> {
    let needle = typed.trim().to_lowercase();
    if needle.is_empty() {
        return vec![];
    }

    ledger
        .recent_descriptions()
        .into_iter()
        .filter(|description| {
            let lower = description.to_lowercase();
            lower.starts_with(&needle) && lower != needle
        })
        .take(MAX_PROPOSALS)
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::DEFAULT_CURRENCY;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            id: None,
            description: "Groceries #Food".to_string(),
            amount: "12,50".to_string(),
            currency: String::new(),
            date: "2026-10-16".to_string(),
            exchange_rate: String::new(),
        }
    }

    #[test]
    fn parse_amount_accepts_decimal_comma() {
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("twelve"), None);
        assert_eq!(parse_amount(" "), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn valid_draft_becomes_expense_with_labels() {
        let expense = validate(&draft(), DEFAULT_CURRENCY).expect("valid draft");
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.currency, "EUR");
        assert_eq!(expense.tags, vec!["Food".to_string()]);
        assert_eq!(expense.exchange_rate, None);
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let mut bad = draft();
        bad.description = "  ".to_string();
        bad.amount = "abc".to_string();
        bad.date = "16.10.2026".to_string();
        bad.currency = "usd".to_string();

        let err = validate(&bad, DEFAULT_CURRENCY).expect_err("invalid draft");
        assert_eq!(
            err.origins,
            vec!["description", "amount", "date-input", "exchange-rate"]
        );
        assert!(err.message.contains("Wechselkurs"));
    }

    #[test]
    fn foreign_currency_with_rate_is_accepted() {
        let mut foreign = draft();
        foreign.currency = "chf".to_string();
        foreign.exchange_rate = "1,05".to_string();
        let expense = validate(&foreign, DEFAULT_CURRENCY).expect("valid draft");
        assert_eq!(expense.currency, "CHF");
        assert_eq!(expense.exchange_rate, Some(1.05));
    }

    #[test]
    fn draft_field_ids_round_trip() {
        assert_eq!(
            DraftField::from_element_id("exchange-rate"),
            Some(DraftField::ExchangeRate)
        );
        assert_eq!(DraftField::from_element_id("type-select"), None);
    }
}
