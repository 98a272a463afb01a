//! The application shell: owns the view state and the ledger, turns user
//! actions and key presses into state changes and rebuilds the whole
//! [`Frame`] after each of them.

use std::collections::BTreeSet;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::colors::ColorRegistry;
use crate::error::{ExpensesError, TagError};
use crate::expense::{DEFAULT_CURRENCY, Expense, ExpenseStore, Ledger, same_month};
use crate::expense_form::{self, DraftField, ExpenseDraft};
use crate::format::{Locale, to_ymd};
use crate::keyboard::{self, KeyCommand, KeyInput, KeyOutcome, ProposalList};
use crate::labels::LabelCache;
use crate::state::{
    EditedPosition, FormMode, LoadState, Loadable, MonthDisplay, ViewMode, ViewState,
};
use crate::storage::{KeyValueStore, MONTH_DISPLAY_KEY};
use crate::tag_editor::{self, ColorPreview, TagSubmission};
use crate::tags::Tag;
use crate::views::{
    self, AppArea, DataSlice, Frame, MainView, MonthArea, RenderContext, calendar, chart,
    day_expenses, form, manage_tags, overview,
};

/// Everything a listener binding can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetViewMode(ViewMode),
    SetMonthDisplay(MonthDisplay),
    SetDate(NaiveDate),
    StartNew,
    EditExpense(Uuid),
    CancelLineEdit,
    RemoveExpense,
    SubmitForm,
    UpdateDraft(DraftField, String),
    SaveExpandedPath(String),
    RemoveExpandedPath(String),
    StartTagEdit(String),
    CancelTagEdit,
    ChangeTagColor(String),
    SubmitTagForm(TagSubmission),
    DismissAlert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSettings {
    pub locale: Locale,
    pub default_currency: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            locale: Locale::De,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

pub struct Shell<S: ExpenseStore, K: KeyValueStore> {
    state: ViewState,
    ledger: Ledger,
    colors: ColorRegistry,
    labels: LabelCache,
    store: S,
    prefs: K,
    settings: ShellSettings,
    days_of_month: Vec<f64>,
    overview_data: overview::OverviewData,
    day_expenses: Vec<Expense>,
    frame: Option<Frame>,
}

impl<S: ExpenseStore, K: KeyValueStore> Shell<S, K> {
    #[tracing::instrument(skip(store, prefs, settings))]
    pub fn new(
        mut store: S,
        prefs: K,
        today: NaiveDate,
        settings: ShellSettings,
    ) -> anyhow::Result<Self> {
        let ledger = store.load().context("failed to load ledger")?;
        if let Err(err) = ledger.categories.validate_acyclic() {
            warn!(error = %err, "tag hierarchy contains a cycle");
        }

        let month_display = match prefs.get_item(MONTH_DISPLAY_KEY) {
            Some(stored) => MonthDisplay::from_key(&stored).unwrap_or_else(|| {
                warn!(value = %stored, "ignoring unknown stored month display");
                MonthDisplay::Overview
            }),
            None => MonthDisplay::Overview,
        };

        info!(
            tags = ledger.categories.len(),
            expenses = ledger.expenses.len(),
            month_display = month_display.as_key(),
            "shell ready"
        );

        Ok(Self {
            state: ViewState::new(today, month_display),
            ledger,
            colors: ColorRegistry::load(),
            labels: LabelCache::default(),
            store,
            prefs,
            settings,
            days_of_month: vec![],
            overview_data: overview::OverviewData::default(),
            day_expenses: vec![],
            frame: None,
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prefs(&self) -> &K {
        &self.prefs
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// The frame of the last render, if there was one.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Rebuilds the whole frame. Dirty slices that the visible views need are
    /// reloaded first and marked loaded.
    #[tracing::instrument(skip(self), fields(revision = self.state.revision + 1))]
    pub fn render(&mut self) -> &Frame {
        self.state.revision += 1;
        self.labels.refresh(&self.ledger.categories, &self.colors);
        let reloaded = self.reload_dirty();

        let ctx = RenderContext {
            state: &self.state,
            ledger: &self.ledger,
            colors: &self.colors,
            labels: &self.labels,
            locale: self.settings.locale,
            default_currency: &self.settings.default_currency,
        };

        let navbar = views::navbar(&ctx);
        let app_area = match self.state.view_mode {
            ViewMode::MonthDisplay => {
                let main = match self.state.month_display {
                    MonthDisplay::Overview => {
                        MainView::Overview(overview::build(&ctx, &self.overview_data))
                    }
                    MonthDisplay::Calendar => {
                        MainView::Calendar(calendar::build(&ctx, &self.days_of_month))
                    }
                    MonthDisplay::Chart => MainView::Chart(chart::build(&ctx, &self.days_of_month)),
                };
                AppArea::MonthDisplay(Box::new(MonthArea {
                    tabs: views::month_tabs(&self.state),
                    main,
                    day_table: day_expenses::build(&ctx, &self.day_expenses),
                    form: form::build(&ctx),
                }))
            }
            ViewMode::ManageTags => AppArea::ManageTags(manage_tags::build(&ctx)),
        };
        let bindings = views::collect_bindings(&navbar, &app_area);

        debug!(
            bindings = bindings.len(),
            reloaded = ?reloaded,
            "rendered frame"
        );

        self.frame.insert(Frame {
            revision: self.state.revision,
            navbar,
            app_area,
            bindings,
            alert: self.state.alert.clone(),
            reloaded,
        })
    }

    fn reload_dirty(&mut self) -> BTreeSet<DataSlice> {
        let mut reloaded = BTreeSet::new();

        if self.state.edited_position.is_dirty() {
            self.load_edited_position();
            reloaded.insert(DataSlice::EditedPosition);
        }

        if self.state.view_mode != ViewMode::MonthDisplay {
            return reloaded;
        }

        let date = self.state.date;
        let currency = &self.settings.default_currency;
        match self.state.month_display {
            MonthDisplay::Overview => {
                if self.state.overview_data == LoadState::Dirty {
                    self.overview_data = overview::load(&self.ledger, date, currency);
                    self.state.overview_data = LoadState::Loaded;
                    reloaded.insert(DataSlice::OverviewData);
                }
            }
            MonthDisplay::Calendar | MonthDisplay::Chart => {
                if self.state.days_of_month == LoadState::Dirty {
                    self.days_of_month = calendar::load_days_of_month(&self.ledger, date, currency);
                    self.state.days_of_month = LoadState::Loaded;
                    reloaded.insert(DataSlice::DaysOfMonth);
                }
            }
        }

        if self.state.day_expenses == LoadState::Dirty {
            self.day_expenses = day_expenses::load(&self.ledger, date);
            self.state.day_expenses = LoadState::Loaded;
            reloaded.insert(DataSlice::DayExpenses);
        }

        reloaded
    }

    fn load_edited_position(&mut self) {
        let id = match &self.state.edited_position.data {
            Some(EditedPosition::Pending(id)) => *id,
            Some(EditedPosition::Record(expense)) => expense.id,
            None => {
                self.state.edited_position = Loadable::loaded(None);
                return;
            }
        };

        match self.ledger.get(id) {
            Some(expense) => {
                self.state.draft = Some(ExpenseDraft::from_expense(expense));
                self.state.edited_position =
                    Loadable::loaded(Some(EditedPosition::Record(expense.clone())));
            }
            None => {
                warn!(%id, "edited expense no longer exists");
                self.state.clear_form();
            }
        }
    }

    fn mark_all_dirty(&mut self) {
        self.state.days_of_month = LoadState::Dirty;
        self.state.overview_data = LoadState::Dirty;
        self.state.day_expenses = LoadState::Dirty;
    }

    /// Maps a key press to a command. `Handled` asks the surface to suppress
    /// the native behavior.
    pub fn handle_key(&mut self, input: &KeyInput) -> anyhow::Result<KeyOutcome> {
        let command = keyboard::classify(input);
        debug!(?command, target = ?input.target_id, "key press");

        match command {
            KeyCommand::SubmitForm => {
                if let Err(err) = self.submit_form() {
                    self.handle_error(err)?;
                }
                Ok(KeyOutcome::Handled)
            }
            KeyCommand::Suppress => Ok(KeyOutcome::Handled),
            KeyCommand::CancelEdit => {
                if self.state.edit.is_some() {
                    self.state.clear_tag_edit();
                }
                self.cancel_line_edit();
                Ok(KeyOutcome::Handled)
            }
            KeyCommand::StartNew => {
                self.start_new();
                Ok(KeyOutcome::Handled)
            }
            KeyCommand::CycleProposal(direction) => {
                let Some(proposal) = self.state.proposals.cycle(direction).map(str::to_string)
                else {
                    return Ok(KeyOutcome::Handled);
                };
                if let Some(draft) = self.state.draft.as_mut() {
                    draft.description = proposal;
                }
                self.render();
                Ok(KeyOutcome::Handled)
            }
            KeyCommand::Ignore => Ok(KeyOutcome::PassThrough),
        }
    }

    /// Surfaces an [`ExpensesError`] to the user: its origin elements are
    /// flagged and its message becomes the alert. Any other error is handed
    /// back unchanged.
    pub fn handle_error(&mut self, err: anyhow::Error) -> anyhow::Result<()> {
        match err.downcast::<ExpensesError>() {
            Ok(expenses_error) => {
                warn!(
                    message = %expenses_error.message,
                    origins = ?expenses_error.origins,
                    "rejected user input"
                );
                self.state.flagged = expenses_error.origins.into_iter().collect();
                self.state.alert = Some(expenses_error.message);
                self.render();
                Ok(())
            }
            Err(other) => Err(other),
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
        self.render();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.clear_form();
        self.state.clear_tag_edit();
        self.state.view_mode = mode;
        self.render();
    }

    pub fn set_month_display(&mut self, display: MonthDisplay) {
        if self.state.month_display == display {
            return;
        }
        self.state.month_display = display;
        if let Err(err) = self.prefs.set_item(MONTH_DISPLAY_KEY, display.as_key()) {
            warn!(error = %err, "failed to persist month display");
        }
        self.render();
    }

    #[tracing::instrument(skip(self), fields(from = %self.state.date))]
    pub fn set_date(&mut self, date: NaiveDate) {
        if date == self.state.date {
            return;
        }
        if !same_month(date, self.state.date) {
            self.state.days_of_month = LoadState::Dirty;
            self.state.overview_data = LoadState::Dirty;
        }
        self.state.day_expenses = LoadState::Dirty;
        self.state.date = date;
        self.render();
    }

    pub fn current_day_string(&self) -> String {
        to_ymd(self.state.date)
    }

    pub fn save_expanded_path(&mut self, path: &str) {
        self.state.expanded_paths.save(path);
        self.render();
    }

    pub fn remove_expanded_path(&mut self, path: &str) {
        self.state.expanded_paths.remove(path);
        self.render();
    }

    pub fn start_new(&mut self) {
        let record = self
            .store
            .prepare_create(self.state.date, &self.settings.default_currency);
        self.state.clear_form();
        self.state.form = Some(FormMode::New);
        self.state.draft = Some(ExpenseDraft::from_expense(&record));
        self.state.edited_position = Loadable::loaded(Some(EditedPosition::Record(record)));
        self.render();
    }

    pub fn start_edit_position(&mut self, id: Uuid) {
        self.state.clear_form();
        self.state.form = Some(FormMode::Edit);
        self.state.edited_position = Loadable::dirty(Some(EditedPosition::Pending(id)));
        self.render();
    }

    pub fn cancel_line_edit(&mut self) {
        self.state.clear_form();
        self.render();
    }

    /// Deletes the record bound to the open form.
    #[tracing::instrument(skip(self))]
    pub async fn remove_expense(&mut self) -> anyhow::Result<()> {
        let Some(EditedPosition::Record(expense)) = self.state.edited_position.data.clone() else {
            debug!("no loaded expense to remove");
            return Ok(());
        };

        self.store
            .delete_position(&expense)
            .await
            .with_context(|| format!("failed to delete expense {}", expense.id))?;
        self.ledger.remove(expense.id);
        info!(id = %expense.id, "removed expense");

        self.state.clear_form();
        self.mark_all_dirty();
        self.render();
        Ok(())
    }

    pub fn update_draft(&mut self, field: DraftField, value: String) {
        let Some(draft) = self.state.draft.as_mut() else {
            return;
        };
        if field == DraftField::Description {
            self.state.proposals =
                ProposalList::new(expense_form::proposals(&self.ledger, &value));
        }
        draft.set(field, value);
        self.state.flagged.remove(field.element_id());
        self.render();
    }

    /// Caret position of the description field, restored after a proposal
    /// replaces its text.
    pub fn set_description_caret(&mut self, position: Option<usize>) {
        self.state.description_caret_position = position;
    }

    #[tracing::instrument(skip(self))]
    pub fn submit_form(&mut self) -> anyhow::Result<()> {
        let Some(draft) = self.state.draft.as_ref() else {
            debug!("submit without an open form");
            return Ok(());
        };

        let expense = expense_form::validate(draft, &self.settings.default_currency)?;
        let id = expense.id;
        let date = expense.date;
        let mut ledger = self.ledger.clone();
        let created = ledger.upsert(expense);
        self.store.save(&ledger).context("failed to save ledger")?;
        self.ledger = ledger;
        info!(%id, created, "saved expense");

        self.state.clear_form();
        self.state.alert = None;
        self.mark_all_dirty();
        self.state.date = date;
        self.render();
        Ok(())
    }

    /// Opens the tag editor. An unknown name starts a new tag with the
    /// default color that only reaches the registry on submit.
    pub fn start_tag_edit(&mut self, name: &str) -> anyhow::Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExpensesError::new("Bitte einen Namen für die Kategorie eingeben.")
                .with_origin(manage_tags::NEW_TAG_INPUT_ID)
                .into());
        }

        self.state.clear_tag_edit();
        let color = match self.ledger.categories.get_by_name(name) {
            Some(tag) => tag.color.clone(),
            None => {
                let color = self
                    .colors
                    .default_key()
                    .map(str::to_string)
                    .unwrap_or_default();
                self.state.tag_draft = Some(Tag::new(name, None, color.clone()));
                self.state.is_new = true;
                color
            }
        };
        self.state.color_preview = Some(ColorPreview::new(&self.colors, &color));
        self.state.edit = Some(name.to_string());
        self.state.view_mode = ViewMode::ManageTags;
        info!(tag = %name, is_new = self.state.is_new, "editing tag");
        self.render();
        Ok(())
    }

    pub fn cancel_tag_edit(&mut self) {
        self.state.clear_tag_edit();
        self.render();
    }

    pub fn handle_color_change(&mut self, key: &str) -> anyhow::Result<()> {
        let preview = self
            .state
            .color_preview
            .as_mut()
            .ok_or(TagError::NotEditing)?;
        preview.apply(&self.colors, key)?;
        self.render();
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn submit_tag_form(&mut self, submission: TagSubmission) -> anyhow::Result<Tag> {
        let mut state = self.state.clone();
        let mut ledger = self.ledger.clone();
        let tag = tag_editor::submit(&mut state, &mut ledger.categories, &self.colors, submission)?;
        self.store.save(&ledger).context("failed to save ledger")?;
        self.state = state;
        self.ledger = ledger;
        self.state.overview_data = LoadState::Dirty;
        self.render();
        Ok(tag)
    }

    /// Runs the action bound to an element.
    pub async fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        debug!(?action, "dispatch");
        match action {
            Action::SetViewMode(mode) => self.set_view_mode(mode),
            Action::SetMonthDisplay(display) => self.set_month_display(display),
            Action::SetDate(date) => self.set_date(date),
            Action::StartNew => self.start_new(),
            Action::EditExpense(id) => self.start_edit_position(id),
            Action::CancelLineEdit => self.cancel_line_edit(),
            Action::RemoveExpense => self.remove_expense().await?,
            Action::SubmitForm => self.submit_form()?,
            Action::UpdateDraft(field, value) => self.update_draft(field, value),
            Action::SaveExpandedPath(path) => self.save_expanded_path(&path),
            Action::RemoveExpandedPath(path) => self.remove_expanded_path(&path),
            Action::StartTagEdit(name) => self.start_tag_edit(&name)?,
            Action::CancelTagEdit => self.cancel_tag_edit(),
            Action::ChangeTagColor(key) => self.handle_color_change(&key)?,
            Action::SubmitTagForm(submission) => {
                self.submit_tag_form(submission)?;
            }
            Action::DismissAlert => self.dismiss_alert(),
        }
        Ok(())
    }
}
