use chrono::NaiveDate;
use uuid::Uuid;

use super::RenderContext;
use crate::expense::{Expense, Ledger};
use crate::format::{render_day, render_day_heading, render_float};
use crate::labels::Segment;
use crate::state::EditedPosition;

pub const START_NEW_ID: &str = "start-new";

#[derive(Debug, Clone, PartialEq)]
pub struct DayExpenseRow {
    pub id: Uuid,
    pub element_id: String,
    pub segments: Vec<Segment>,
    pub amount: String,
    pub currency: String,
    /// Amount in the default currency, for foreign-currency rows.
    pub converted: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayExpensesView {
    pub heading: String,
    pub day_label: String,
    pub rows: Vec<DayExpenseRow>,
    pub total: String,
}

pub fn load(ledger: &Ledger, date: NaiveDate) -> Vec<Expense> {
    ledger.on_day(date).into_iter().cloned().collect()
}

pub fn element_id(id: Uuid) -> String {
    format!("expense-{id}")
}

pub fn build(ctx: &RenderContext<'_>, expenses: &[Expense]) -> DayExpensesView {
    let selected_id = match &ctx.state.edited_position.data {
        Some(EditedPosition::Record(expense)) => Some(expense.id),
        Some(EditedPosition::Pending(id)) => Some(*id),
        None => None,
    };

    let rows = expenses
        .iter()
        .map(|expense| DayExpenseRow {
            id: expense.id,
            element_id: element_id(expense.id),
            segments: ctx.labels.decorate(&expense.description),
            amount: render_float(expense.amount, ctx.locale),
            currency: expense.currency.clone(),
            converted: (expense.currency != ctx.default_currency).then(|| {
                render_float(expense.amount_in(ctx.default_currency), ctx.locale)
            }),
            selected: selected_id == Some(expense.id),
        })
        .collect();

    let total: f64 = expenses
        .iter()
        .map(|expense| expense.amount_in(ctx.default_currency))
        .sum();

    DayExpensesView {
        heading: render_day_heading(ctx.state.date, ctx.locale),
        day_label: render_day(ctx.state.date, ctx.locale),
        rows,
        total: render_float(total, ctx.locale),
    }
}
