use chrono::{Datelike, Duration, NaiveDate};

use super::RenderContext;
use crate::expense::Ledger;
use crate::format::{render_float, render_month, to_ymd, weekday_abbreviations};

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub element_id: String,
    pub total: Option<String>,
    pub today: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub month_label: String,
    pub weekdays: Vec<String>,
    /// Monday-first weeks; days outside the month are `None`.
    pub weeks: Vec<Vec<Option<CalendarDay>>>,
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_day_of_month(date);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_first
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

/// Total spent on each day of the month of `date`, indexed by `day - 1`.
#[tracing::instrument(skip(ledger))]
pub fn load_days_of_month(ledger: &Ledger, date: NaiveDate, default_currency: &str) -> Vec<f64> {
    let mut totals = vec![0.0; days_in_month(date) as usize];
    for expense in ledger.in_month(date) {
        if let Some(slot) = totals.get_mut(expense.date.day0() as usize) {
            *slot += expense.amount_in(default_currency);
        }
    }
    totals
}

pub fn build(ctx: &RenderContext<'_>, daily_totals: &[f64]) -> CalendarView {
    let first = first_day_of_month(ctx.state.date);
    let offset = first.weekday().num_days_from_monday() as usize;
    let day_count = days_in_month(first) as usize;

    let mut cells: Vec<Option<CalendarDay>> = vec![None; offset];
    for idx in 0..day_count {
        let date = first + Duration::days(idx as i64);
        let total = daily_totals
            .get(idx)
            .copied()
            .filter(|amount| *amount != 0.0)
            .map(|amount| render_float(amount, ctx.locale));
        cells.push(Some(CalendarDay {
            date,
            day: date.day(),
            element_id: format!("day-{}", to_ymd(date)),
            total,
            today: date == ctx.state.today,
            selected: date == ctx.state.date,
        }));
    }
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    CalendarView {
        month_label: render_month(first, ctx.locale),
        weekdays: weekday_abbreviations(ctx.locale),
        weeks: cells.chunks(7).map(|week| week.to_vec()).collect(),
    }
}
