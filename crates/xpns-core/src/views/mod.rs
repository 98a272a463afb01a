//! View models. A [`Frame`] is everything one render produces: the navbar,
//! the app area and the listeners to attach to it. Frames are rebuilt whole
//! on every render; nothing in them survives to the next one.

pub mod calendar;
pub mod chart;
pub mod day_expenses;
pub mod form;
pub mod manage_tags;
pub mod overview;

use std::collections::BTreeSet;

use chrono::{Months, NaiveDate};

use crate::colors::ColorRegistry;
use crate::expense::Ledger;
use crate::format::{Locale, render_month};
use crate::labels::LabelCache;
use crate::shell::Action;
use crate::state::{MonthDisplay, ViewMode, ViewState};

pub use calendar::{CalendarDay, CalendarView};
pub use chart::{ChartPoint, MonthChartView};
pub use day_expenses::{DayExpenseRow, DayExpensesView};
pub use form::{ExpenseFormView, ProposalOption};
pub use manage_tags::{ManageTagsView, TagRow};
pub use overview::{OverviewData, OverviewRow, OverviewView};

pub const NAVBAR_ID: &str = "navbar";
pub const APP_AREA_ID: &str = "app-area";

/// Inputs every view builder reads from.
pub struct RenderContext<'a> {
    pub state: &'a ViewState,
    pub ledger: &'a Ledger,
    pub colors: &'a ColorRegistry,
    pub labels: &'a LabelCache,
    pub locale: Locale,
    pub default_currency: &'a str,
}

/// Cached slices of derived data, reloaded only when their load state is
/// dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DataSlice {
    DaysOfMonth,
    OverviewData,
    DayExpenses,
    EditedPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub revision: u64,
    pub navbar: NavbarView,
    pub app_area: AppArea,
    pub bindings: Vec<Binding>,
    pub alert: Option<String>,
    /// Slices that had to be reloaded for this frame.
    pub reloaded: BTreeSet<DataSlice>,
}

impl Frame {
    pub fn binding(&self, element_id: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.element_id == element_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppArea {
    MonthDisplay(Box<MonthArea>),
    ManageTags(ManageTagsView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthArea {
    pub tabs: Vec<MonthTab>,
    pub main: MainView,
    pub day_table: DayExpensesView,
    pub form: Option<ExpenseFormView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MainView {
    Overview(OverviewView),
    Calendar(CalendarView),
    Chart(MonthChartView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTab {
    pub display: MonthDisplay,
    pub element_id: String,
    pub label: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub mode: ViewMode,
    pub element_id: String,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavbarView {
    pub items: Vec<NavItem>,
    pub month_label: String,
    pub previous_month: NaiveDate,
    pub next_month: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Listener {
    Click(Action),
    /// The form's own submit handler reads the field values.
    Submit,
    /// Change handler reading the element's value.
    Change,
    /// Show/hide pair of a collapsible section.
    Collapse { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub element_id: String,
    pub listener: Listener,
}

impl Binding {
    pub fn click(element_id: impl Into<String>, action: Action) -> Self {
        Self {
            element_id: element_id.into(),
            listener: Listener::Click(action),
        }
    }

    fn new(element_id: impl Into<String>, listener: Listener) -> Self {
        Self {
            element_id: element_id.into(),
            listener,
        }
    }
}

pub fn navbar(ctx: &RenderContext<'_>) -> NavbarView {
    let date = ctx.state.date;
    NavbarView {
        items: ViewMode::all()
            .into_iter()
            .map(|mode| NavItem {
                mode,
                element_id: format!("nav-{}", mode.as_key()),
                label: mode.label(),
                active: ctx.state.view_mode == mode,
            })
            .collect(),
        month_label: render_month(date, ctx.locale),
        previous_month: date.checked_sub_months(Months::new(1)).unwrap_or(date),
        next_month: date.checked_add_months(Months::new(1)).unwrap_or(date),
    }
}

pub fn month_tabs(state: &ViewState) -> Vec<MonthTab> {
    MonthDisplay::all()
        .into_iter()
        .map(|display| MonthTab {
            display,
            element_id: format!("tab-{}", display.as_key()),
            label: display.label(),
            icon: display.icon(),
            active: state.month_display == display,
        })
        .collect()
}

/// Every listener the frame needs, derived from scratch from its content.
pub fn collect_bindings(navbar: &NavbarView, app_area: &AppArea) -> Vec<Binding> {
    let mut bindings: Vec<Binding> = navbar
        .items
        .iter()
        .map(|item| Binding::click(item.element_id.clone(), Action::SetViewMode(item.mode)))
        .collect();
    bindings.push(Binding::click("nav-prev", Action::SetDate(navbar.previous_month)));
    bindings.push(Binding::click("nav-next", Action::SetDate(navbar.next_month)));

    match app_area {
        AppArea::MonthDisplay(area) => {
            bindings.extend(area.tabs.iter().map(|tab| {
                Binding::click(tab.element_id.clone(), Action::SetMonthDisplay(tab.display))
            }));

            match &area.main {
                MainView::Overview(overview) => {
                    bindings.extend(overview.rows.iter().filter(|row| row.has_children).map(
                        |row| {
                            Binding::new(
                                row.path_id.clone(),
                                Listener::Collapse {
                                    path: row.path_id.clone(),
                                },
                            )
                        },
                    ));
                }
                MainView::Calendar(calendar) => {
                    bindings.extend(calendar.weeks.iter().flatten().flatten().map(|day| {
                        Binding::click(day.element_id.clone(), Action::SetDate(day.date))
                    }));
                }
                MainView::Chart(_) => {}
            }

            bindings.push(Binding::click(day_expenses::START_NEW_ID, Action::StartNew));
            bindings.extend(
                area.day_table
                    .rows
                    .iter()
                    .map(|row| Binding::click(row.element_id.clone(), Action::EditExpense(row.id))),
            );

            if let Some(form) = &area.form {
                bindings.push(Binding::new(form::FORM_ID, Listener::Submit));
                bindings.push(Binding::new(crate::keyboard::DESCRIPTION_FIELD, Listener::Change));
                bindings.push(Binding::click(form::CANCEL_ID, Action::CancelLineEdit));
                if form.can_delete {
                    bindings.push(Binding::click(form::REMOVE_ID, Action::RemoveExpense));
                }
            }
        }
        AppArea::ManageTags(manage) => {
            bindings.extend(manage.rows.iter().map(|row| {
                Binding::click(row.element_id.clone(), Action::StartTagEdit(row.name.clone()))
            }));
            if manage.editor.is_some() {
                bindings.push(Binding::new(crate::tag_editor::FORM_ID, Listener::Submit));
                bindings.push(Binding::new(crate::tag_editor::COLOR_SELECT_ID, Listener::Change));
                bindings.push(Binding::click(form::CANCEL_ID, Action::CancelTagEdit));
            }
        }
    }

    bindings
}
