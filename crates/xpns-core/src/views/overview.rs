use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::RenderContext;
use crate::classes::ClassList;
use crate::expense::Ledger;
use crate::format::{render_float, render_month};

pub const PATH_PREFIX: &str = "overview";

/// Month totals per tag, rolled up along the hierarchy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewData {
    pub totals: BTreeMap<String, f64>,
    pub untagged: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    pub path_id: String,
    pub name: String,
    pub depth: usize,
    pub badge: ClassList,
    pub total: f64,
    pub total_label: String,
    pub has_children: bool,
    pub expanded: bool,
    /// False while any ancestor is collapsed.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub month_label: String,
    pub rows: Vec<OverviewRow>,
    pub untagged_label: String,
    pub total_label: String,
}

#[tracing::instrument(skip(ledger))]
pub fn load(ledger: &Ledger, date: NaiveDate, default_currency: &str) -> OverviewData {
    let mut data = OverviewData::default();

    for expense in ledger.in_month(date) {
        let amount = expense.amount_in(default_currency);
        data.total += amount;

        // every tag the expense touches plus their ancestors, each once
        let touched: BTreeSet<&str> = expense
            .tags
            .iter()
            .flat_map(|tag| ledger.categories.breadcrumb(tag))
            .map(|tag| tag.name.as_str())
            .collect();
        if touched.is_empty() {
            data.untagged += amount;
        }
        for name in touched {
            *data.totals.entry(name.to_string()).or_default() += amount;
        }
    }

    tracing::debug!(tags = data.totals.len(), total = data.total, "loaded overview data");
    data
}

pub fn build(ctx: &RenderContext<'_>, data: &OverviewData) -> OverviewView {
    let tags = &ctx.ledger.categories;
    let expanded = &ctx.state.expanded_paths;
    let mut rows = Vec::new();

    tags.visit_hierarchy(|tag, depth| {
        let path_id = format!("{PATH_PREFIX}-{}", tags.path_id(&tag.name));
        let visible = match path_id.rsplit_once('-') {
            Some((parent_path, _)) if depth > 0 => expanded.is_expanded(parent_path),
            _ => true,
        };
        let total = data.totals.get(&tag.name).copied().unwrap_or_default();

        let mut badge: ClassList = ["badge"].into_iter().collect();
        badge.add(ctx.colors.classes(&tag.color));

        rows.push(OverviewRow {
            expanded: expanded.is_expanded(&path_id),
            has_children: tags.children(&tag.name).next().is_some(),
            path_id,
            name: tag.name.clone(),
            depth,
            badge,
            total,
            total_label: render_float(total, ctx.locale),
            visible,
        });
    });

    OverviewView {
        month_label: render_month(ctx.state.date, ctx.locale),
        rows,
        untagged_label: render_float(data.untagged, ctx.locale),
        total_label: render_float(data.total, ctx.locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{DEFAULT_CURRENCY, Expense};
    use crate::tags::{Tag, TagRegistry};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn expense(date: NaiveDate, amount: f64, tags: &[&str]) -> Expense {
        Expense {
            amount,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Expense::blank(date, DEFAULT_CURRENCY)
        }
    }

    fn ledger(expenses: Vec<Expense>) -> Ledger {
        Ledger {
            categories: TagRegistry::new(vec![
                Tag::new("Food", None, "green"),
                Tag::new("Groceries", Some("Food"), "green"),
                Tag::new("Organic", Some("Groceries"), "yellow"),
                Tag::new("Travel", None, "blue"),
            ]),
            expenses,
        }
    }

    #[test]
    fn child_totals_roll_into_their_ancestors() {
        let ledger = ledger(vec![
            expense(day(2026, 10, 3), 4.0, &["Organic"]),
            expense(day(2026, 10, 4), 6.0, &["Groceries"]),
            expense(day(2026, 10, 5), 30.0, &["Travel"]),
        ]);
        let data = load(&ledger, day(2026, 10, 16), DEFAULT_CURRENCY);

        assert_eq!(data.totals.get("Organic"), Some(&4.0));
        assert_eq!(data.totals.get("Groceries"), Some(&10.0));
        assert_eq!(data.totals.get("Food"), Some(&10.0));
        assert_eq!(data.totals.get("Travel"), Some(&30.0));
        assert_eq!(data.total, 40.0);
        assert_eq!(data.untagged, 0.0);
    }

    #[test]
    fn expense_on_several_levels_counts_once_per_tag() {
        let ledger = ledger(vec![expense(day(2026, 10, 16), 10.0, &["Food", "Groceries", "Organic"])]);
        let data = load(&ledger, day(2026, 10, 16), DEFAULT_CURRENCY);

        assert_eq!(data.totals.get("Food"), Some(&10.0));
        assert_eq!(data.totals.get("Groceries"), Some(&10.0));
        assert_eq!(data.totals.get("Organic"), Some(&10.0));
        assert_eq!(data.total, 10.0);
    }

    #[test]
    fn unknown_tags_and_other_months_are_kept_apart() {
        let mut foreign = expense(day(2026, 10, 8), 20.0, &["Souvenirs"]);
        foreign.currency = "CHF".to_string();
        foreign.exchange_rate = Some(1.5);
        let ledger = ledger(vec![
            foreign,
            expense(day(2026, 10, 9), 2.0, &[]),
            expense(day(2026, 9, 30), 99.0, &["Travel"]),
        ]);
        let data = load(&ledger, day(2026, 10, 16), DEFAULT_CURRENCY);

        assert_eq!(data.untagged, 32.0);
        assert_eq!(data.total, 32.0);
        assert!(data.totals.is_empty());
    }
}
