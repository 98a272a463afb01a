use super::RenderContext;
use crate::classes::ClassList;
use crate::tag_editor::{self, TagFormView};
use crate::tags::sanitize_segment;

pub const NEW_TAG_INPUT_ID: &str = "new-tag-name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub name: String,
    pub element_id: String,
    pub depth: usize,
    pub badge: ClassList,
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageTagsView {
    pub rows: Vec<TagRow>,
    pub editor: Option<TagFormView>,
    /// Set when the edit target could not be resolved.
    pub editor_error: Option<String>,
}

pub fn build(ctx: &RenderContext<'_>) -> ManageTagsView {
    let tags = &ctx.ledger.categories;
    let editing = ctx.state.edit.as_deref();

    let mut rows = Vec::with_capacity(tags.len());
    tags.visit_hierarchy(|tag, depth| {
        let mut badge: ClassList = ["badge"].into_iter().collect();
        badge.add(ctx.colors.classes(&tag.color));
        rows.push(TagRow {
            name: tag.name.clone(),
            element_id: format!("tag-{}", sanitize_segment(&tag.name)),
            depth,
            badge,
            editing: editing == Some(tag.name.as_str()),
        });
    });

    let (editor, editor_error) = if ctx.state.edit.is_some() {
        match tag_editor::render(ctx.state, tags, ctx.colors) {
            Ok(view) => (Some(view), None),
            Err(err) => {
                tracing::warn!(error = %err, "tag editor could not render");
                (None, Some(err.to_string()))
            }
        }
    } else {
        (None, None)
    };

    ManageTagsView {
        rows,
        editor,
        editor_error,
    }
}
