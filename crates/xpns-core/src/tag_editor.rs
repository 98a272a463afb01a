//! Edit form for a single tag: parent and color selection with a live color
//! preview, committed back into the registry on submit.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::classes::ClassList;
use crate::colors::{ColorRegistry, text_classes};
use crate::error::TagError;
use crate::labels::LabelBadge;
use crate::state::ViewState;
use crate::tags::{Tag, TagRegistry};

pub const FORM_ID: &str = "tag-form";
pub const PARENT_SELECT_ID: &str = "parent-select";
pub const COLOR_SELECT_ID: &str = "color-select";
pub const TAG_CONTAINER_ID: &str = "tag-container";

pub const ROOT_OPTION_LABEL: &str = "(keine)";
const INDENT: &str = "\u{a0}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    /// `None` is the "no parent" entry.
    pub value: Option<String>,
    pub label: String,
    pub depth: usize,
    pub selected: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOption {
    pub key: String,
    pub name: String,
    pub classes: ClassList,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormView {
    pub tag: Tag,
    pub is_new: bool,
    /// Badges of the ancestors, root first. The edited tag itself is shown
    /// with `preview.badge`.
    pub ancestors: Vec<LabelBadge>,
    pub parent_options: Vec<ParentOption>,
    pub color_options: Vec<ColorOption>,
    pub preview: ColorPreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSubmission {
    pub parent: Option<String>,
    pub color: String,
}

/// Class lists of the three elements that mirror the selected color: the
/// color select, the tag badge and the select's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPreview {
    applied: String,
    pub select: ClassList,
    pub badge: ClassList,
    pub label: ClassList,
}

impl ColorPreview {
    pub fn new(colors: &ColorRegistry, key: &str) -> Self {
        let classes = colors.classes(key);

        let mut select: ClassList = ["form-select", "fw-bold"].into_iter().collect();
        select.add(classes);
        let mut badge: ClassList = ["badge"].into_iter().collect();
        badge.add(classes);
        let label: ClassList = text_classes(classes).into_iter().collect();

        Self {
            applied: key.to_string(),
            select,
            badge,
            label,
        }
    }

    pub fn applied(&self) -> &str {
        &self.applied
    }

    /// Swaps the previously applied color's classes for those of `key`.
    pub fn apply(&mut self, colors: &ColorRegistry, key: &str) -> Result<(), TagError> {
        if !colors.contains(key) {
            return Err(TagError::UnknownColor(key.to_string()));
        }

        let old = colors.classes(&self.applied);
        self.select.remove(old);
        self.badge.remove(old);
        self.label.remove(&text_classes(old));

        let new = colors.classes(key);
        self.select.add(new);
        self.badge.add(new);
        self.label.add(&text_classes(new));

        debug!(from = %self.applied, to = %key, "swapped preview color");
        self.applied = key.to_string();
        Ok(())
    }
}

/// The tag named by `state.edit`: a registered one, or the unsaved draft.
pub fn resolve<'a>(state: &'a ViewState, tags: &'a TagRegistry) -> Result<&'a Tag, TagError> {
    let name = state.edit.as_deref().ok_or(TagError::NotEditing)?;
    tags.get_by_name(name)
        .or_else(|| state.tag_draft.as_ref().filter(|draft| draft.name == name))
        .ok_or_else(|| TagError::NotFound(name.to_string()))
}

/// Every tag as a parent candidate, in hierarchy order. The edited tag and
/// all of its descendants are disabled.
pub fn parent_options(tags: &TagRegistry, edited: &Tag) -> Vec<ParentOption> {
    let has_known_parent = edited
        .parent
        .as_deref()
        .is_some_and(|parent| tags.contains(parent));

    let mut options = vec![ParentOption {
        value: None,
        label: ROOT_OPTION_LABEL.to_string(),
        depth: 0,
        selected: !has_known_parent,
        disabled: false,
    }];

    // an unsaved tag is never visited, but orphans may already name it
    let mut disabled: HashSet<String> = HashSet::new();
    if !tags.contains(&edited.name) {
        disabled.insert(edited.name.clone());
    }
    tags.visit_hierarchy(|tag, depth| {
        let is_disabled = tag.name == edited.name
            || tag
                .parent
                .as_ref()
                .is_some_and(|parent| disabled.contains(parent));
        if is_disabled {
            disabled.insert(tag.name.clone());
        }

        options.push(ParentOption {
            value: Some(tag.name.clone()),
            label: format!("{}{}", INDENT.repeat(depth * 2), tag.name),
            depth,
            selected: edited.parent.as_deref() == Some(tag.name.as_str()),
            disabled: is_disabled,
        });
    });

    options
}

pub fn color_options(colors: &ColorRegistry, selected: &str) -> Vec<ColorOption> {
    colors
        .sorted_by_name()
        .into_iter()
        .map(|color| {
            let mut classes: ClassList = color.classes.iter().collect();
            classes.add(&["fw-bold"]);
            ColorOption {
                key: color.key.clone(),
                name: color.name.clone(),
                classes,
                selected: color.key == selected,
            }
        })
        .collect()
}

#[tracing::instrument(skip_all, fields(edit = ?state.edit))]
pub fn render(
    state: &ViewState,
    tags: &TagRegistry,
    colors: &ColorRegistry,
) -> Result<TagFormView, TagError> {
    let tag = resolve(state, tags)?;

    let preview = state
        .color_preview
        .clone()
        .unwrap_or_else(|| ColorPreview::new(colors, &tag.color));

    let ancestors = tag
        .parent
        .as_deref()
        .map(|parent| tags.breadcrumb(parent))
        .unwrap_or_default()
        .into_iter()
        .map(|ancestor| {
            let mut classes: ClassList = ["badge"].into_iter().collect();
            classes.add(colors.classes(&ancestor.color));
            LabelBadge {
                name: ancestor.name.clone(),
                classes,
            }
        })
        .collect();

    Ok(TagFormView {
        tag: tag.clone(),
        is_new: state.is_new,
        ancestors,
        parent_options: parent_options(tags, tag),
        color_options: color_options(colors, preview.applied()),
        preview,
    })
}

/// Commits the form: registers the tag if it is new, then overwrites parent
/// and color. Nothing changes when the submission is rejected.
#[tracing::instrument(skip_all, fields(edit = ?state.edit))]
pub fn submit(
    state: &mut ViewState,
    tags: &mut TagRegistry,
    colors: &ColorRegistry,
    submission: TagSubmission,
) -> Result<Tag, TagError> {
    let tag = resolve(state, tags)?.clone();

    if let Some(parent) = submission.parent.as_deref() {
        if !tags.contains(parent) {
            return Err(TagError::UnknownParent(parent.to_string()));
        }
        if tags.would_cycle(&tag.name, parent) {
            return Err(TagError::Cycle {
                tag: tag.name.clone(),
                parent: parent.to_string(),
            });
        }
    }
    if !colors.contains(&submission.color) {
        return Err(TagError::UnknownColor(submission.color));
    }

    if tags.index_of(&tag.name).is_none() {
        tags.push(tag.clone())?;
        info!(tag = %tag.name, "registered new tag");
    }

    let stored = tags
        .get_by_name_mut(&tag.name)
        .ok_or_else(|| TagError::NotFound(tag.name.clone()))?;
    stored.parent = submission.parent;
    stored.color = submission.color;
    let committed = stored.clone();

    state.clear_tag_edit();
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::state::MonthDisplay;

    fn registry() -> TagRegistry {
        TagRegistry::new(vec![
            Tag::new("Food", None, "green"),
            Tag::new("Groceries", Some("Food"), "green"),
            Tag::new("Travel", None, "blue"),
            Tag::new("Organic", Some("Groceries"), "yellow"),
        ])
    }

    fn editing(name: &str) -> ViewState {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        let mut state = ViewState::new(date, MonthDisplay::Overview);
        state.edit = Some(name.to_string());
        state
    }

    fn disabled_names(options: &[ParentOption]) -> Vec<&str> {
        options
            .iter()
            .filter(|o| o.disabled)
            .filter_map(|o| o.value.as_deref())
            .collect()
    }

    #[test]
    fn editing_root_disables_its_whole_subtree() {
        let tags = registry();
        let food = tags.get_by_name("Food").expect("food");
        let options = parent_options(&tags, food);
        assert_eq!(disabled_names(&options), vec!["Food", "Groceries", "Organic"]);
        let travel = options
            .iter()
            .find(|o| o.value.as_deref() == Some("Travel"))
            .expect("travel option");
        assert!(!travel.disabled);
        assert!(options[0].selected, "root option selected for a root tag");
    }

    #[test]
    fn editing_leaf_disables_only_itself() {
        let tags = registry();
        let organic = tags.get_by_name("Organic").expect("organic");
        let options = parent_options(&tags, organic);
        assert_eq!(disabled_names(&options), vec!["Organic"]);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value.as_deref(), Some("Groceries"));
    }

    #[test]
    fn new_tag_disables_orphans_that_already_name_it() {
        let mut tags = registry();
        tags.push(Tag::new("Lost", Some("Gone"), "red")).expect("push");
        tags.push(Tag::new("Found", Some("Lost"), "red")).expect("push");
        let draft = Tag::new("Gone", None, "green");
        let options = parent_options(&tags, &draft);
        assert_eq!(disabled_names(&options), vec!["Lost", "Found"]);
        assert!(options[0].selected);
    }

    #[test]
    fn parent_options_are_indented_by_depth() {
        let tags = registry();
        let travel = tags.get_by_name("Travel").expect("travel");
        let options = parent_options(&tags, travel);
        let organic = options
            .iter()
            .find(|o| o.value.as_deref() == Some("Organic"))
            .expect("organic option");
        assert_eq!(organic.depth, 2);
        assert_eq!(organic.label, format!("{}Organic", "\u{a0}".repeat(4)));
    }

    #[test]
    fn render_without_tag_is_not_found() {
        let tags = registry();
        let colors = ColorRegistry::load();
        let state = editing("Nope");
        assert_eq!(
            render(&state, &tags, &colors),
            Err(TagError::NotFound("Nope".to_string()))
        );
        let mut idle = editing("Food");
        idle.edit = None;
        assert_eq!(render(&idle, &tags, &colors), Err(TagError::NotEditing));
    }

    #[test]
    fn render_sorts_colors_and_marks_selection() {
        let tags = registry();
        let colors = ColorRegistry::load();
        let view = render(&editing("Groceries"), &tags, &colors).expect("form");
        assert_eq!(view.color_options[0].name, "Blau");
        let selected: Vec<_> = view.color_options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].key, "green");
        assert!(selected[0].classes.contains("fw-bold"));
        assert_eq!(view.ancestors.len(), 1);
        assert_eq!(view.ancestors[0].name, "Food");
        assert_eq!(view.preview.label.to_attr(), "text-white");
    }

    #[test]
    fn submit_existing_mutates_in_place() {
        let mut tags = registry();
        let colors = ColorRegistry::load();
        let mut state = editing("Organic");
        let committed = submit(
            &mut state,
            &mut tags,
            &colors,
            TagSubmission {
                parent: Some("Travel".to_string()),
                color: "red".to_string(),
            },
        )
        .expect("submit");

        assert_eq!(committed.parent.as_deref(), Some("Travel"));
        assert_eq!(tags.len(), 4);
        assert_eq!(tags.index_of("Organic"), Some(3));
        assert_eq!(tags.get_by_name("Organic").map(|t| t.color.as_str()), Some("red"));
        assert_eq!(state.edit, None);
        assert!(!state.is_new);
    }

    #[test]
    fn submit_new_appends_exactly_once() {
        let mut tags = registry();
        let colors = ColorRegistry::load();
        let mut state = editing("Books");
        state.is_new = true;
        state.tag_draft = Some(Tag::new("Books", None, "blue"));

        submit(
            &mut state,
            &mut tags,
            &colors,
            TagSubmission {
                parent: Some("Food".to_string()),
                color: "grey".to_string(),
            },
        )
        .expect("submit");

        assert_eq!(tags.len(), 5);
        assert_eq!(tags.index_of("Books"), Some(4));
        assert_eq!(state.tag_draft, None);
    }

    #[test]
    fn submit_rejects_cycles_without_mutating() {
        let mut tags = registry();
        let before = tags.clone();
        let colors = ColorRegistry::load();
        let mut state = editing("Food");

        let err = submit(
            &mut state,
            &mut tags,
            &colors,
            TagSubmission {
                parent: Some("Organic".to_string()),
                color: "green".to_string(),
            },
        )
        .expect_err("cycle");

        assert!(matches!(err, TagError::Cycle { .. }));
        assert_eq!(tags, before);
        assert_eq!(state.edit.as_deref(), Some("Food"));
    }

    #[test]
    fn submit_rejects_unknown_color_and_parent() {
        let mut tags = registry();
        let colors = ColorRegistry::load();
        let mut state = editing("Food");
        let unknown_color = submit(
            &mut state,
            &mut tags,
            &colors,
            TagSubmission {
                parent: None,
                color: "mauve".to_string(),
            },
        );
        assert_eq!(unknown_color, Err(TagError::UnknownColor("mauve".to_string())));

        let unknown_parent = submit(
            &mut state,
            &mut tags,
            &colors,
            TagSubmission {
                parent: Some("Ghost".to_string()),
                color: "red".to_string(),
            },
        );
        assert_eq!(unknown_parent, Err(TagError::UnknownParent("Ghost".to_string())));
    }

    #[test]
    fn color_preview_swaps_exactly_the_old_classes() {
        let colors = ColorRegistry::load();
        let mut preview = ColorPreview::new(&colors, "light");
        assert_eq!(preview.select.to_attr(), "form-select fw-bold bg-light text-dark border");
        assert_eq!(preview.label.to_attr(), "text-dark");

        preview.apply(&colors, "red").expect("known color");
        assert_eq!(preview.select.to_attr(), "form-select fw-bold bg-danger text-white");
        assert_eq!(preview.badge.to_attr(), "badge bg-danger text-white");
        assert_eq!(preview.label.to_attr(), "text-white");
        assert_eq!(preview.applied(), "red");

        assert_eq!(
            preview.apply(&colors, "mauve"),
            Err(TagError::UnknownColor("mauve".to_string()))
        );
        assert_eq!(preview.applied(), "red");
    }
}
