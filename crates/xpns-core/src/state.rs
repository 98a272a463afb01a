use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::expense::Expense;
use crate::expense_form::ExpenseDraft;
use crate::keyboard::ProposalList;
use crate::tag_editor::ColorPreview;
use crate::tags::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    MonthDisplay,
    ManageTags,
}

impl ViewMode {
    pub fn all() -> [Self; 2] {
        [Self::MonthDisplay, Self::ManageTags]
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::MonthDisplay => "monthDisplay",
            Self::ManageTags => "manageTags",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MonthDisplay => "Ausgaben",
            Self::ManageTags => "Kategorien",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthDisplay {
    Overview,
    Calendar,
    Chart,
}

impl MonthDisplay {
    pub fn all() -> [Self; 3] {
        [Self::Overview, Self::Calendar, Self::Chart]
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Calendar => "calendar",
            Self::Chart => "chart",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|display| display.as_key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Übersicht",
            Self::Calendar => "Kalender",
            Self::Chart => "Diagramm",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Overview => "eyeglasses",
            Self::Calendar => "calendar3",
            Self::Chart => "graph-up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Edit,
}

/// Whether a slice of view data must be (re)loaded before it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Dirty,
    Loaded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    pub data: T,
    pub load_state: LoadState,
}

impl<T> Loadable<T> {
    pub fn dirty(data: T) -> Self {
        Self {
            data,
            load_state: LoadState::Dirty,
        }
    }

    pub fn loaded(data: T) -> Self {
        Self {
            data,
            load_state: LoadState::Loaded,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.load_state == LoadState::Dirty
    }
}

/// The record bound to the open expense form. While dirty only `id` is
/// meaningful.
#[derive(Debug, Clone, PartialEq)]
pub enum EditedPosition {
    Record(Expense),
    Pending(Uuid),
}

/// Expand/collapse state of nested UI sections, keyed by the `-` separated
/// segments of their element ids. A collapsed section keeps its entry as
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedPaths {
    children: BTreeMap<String, Option<ExpandedPaths>>,
}

impl ExpandedPaths {
    pub fn save(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('-') {
            let entry = node.children.entry(segment.to_string()).or_insert(None);
            node = entry.get_or_insert_with(ExpandedPaths::default);
        }
    }

    pub fn remove(&mut self, path: &str) {
        let segments: Vec<&str> = path.split('-').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut node = self;
        for segment in parents {
            match node.children.get_mut(*segment) {
                Some(Some(child)) => node = child,
                _ => return,
            }
        }
        node.children.insert(last.to_string(), None);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        let mut node = self;
        for segment in path.split('-') {
            match node.children.get(segment) {
                Some(Some(child)) => node = child,
                _ => return false,
            }
        }
        true
    }
}

/// Everything the UI shows that is not persisted data.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub date: NaiveDate,
    /// Date the session started on.
    pub today: NaiveDate,
    pub view_mode: ViewMode,
    pub month_display: MonthDisplay,
    pub form: Option<FormMode>,
    pub edited_position: Loadable<Option<EditedPosition>>,
    pub draft: Option<ExpenseDraft>,
    pub proposals: ProposalList,
    pub description_caret_position: Option<usize>,
    /// Name of the tag being edited.
    pub edit: Option<String>,
    /// Set while `edit` names a tag that has not been saved yet.
    pub is_new: bool,
    pub tag_draft: Option<Tag>,
    pub color_preview: Option<ColorPreview>,
    pub expanded_paths: ExpandedPaths,
    pub days_of_month: LoadState,
    pub overview_data: LoadState,
    pub day_expenses: LoadState,
    pub flagged: BTreeSet<String>,
    pub alert: Option<String>,
    pub revision: u64,
}

impl ViewState {
    pub fn new(date: NaiveDate, month_display: MonthDisplay) -> Self {
        Self {
            date,
            today: date,
            view_mode: ViewMode::MonthDisplay,
            month_display,
            form: None,
            edited_position: Loadable::loaded(None),
            draft: None,
            proposals: ProposalList::default(),
            description_caret_position: None,
            edit: None,
            is_new: false,
            tag_draft: None,
            color_preview: None,
            expanded_paths: ExpandedPaths::default(),
            days_of_month: LoadState::Dirty,
            overview_data: LoadState::Dirty,
            day_expenses: LoadState::Dirty,
            flagged: BTreeSet::new(),
            alert: None,
            revision: 0,
        }
    }

    pub fn clear_form(&mut self) {
        self.form = None;
        self.edited_position = Loadable::loaded(None);
        self.draft = None;
        self.proposals = ProposalList::default();
        self.description_caret_position = None;
        self.flagged.clear();
    }

    pub fn clear_tag_edit(&mut self) {
        self.edit = None;
        self.is_new = false;
        self.tag_draft = None;
        self.color_preview = None;
    }
}
