//! `#Label` markers inside expense descriptions.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::classes::ClassList;
use crate::colors::ColorRegistry;
use crate::tags::TagRegistry;

static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"#([\w-]+)").unwrap()
});

const UNKNOWN_LABEL_CLASSES: [&str; 2] = ["bg-secondary", "text-white"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Label(LabelBadge),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBadge {
    pub name: String,
    pub classes: ClassList,
}

pub fn label_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in LABEL_REGEX.captures_iter(text) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Badge classes for every known tag, rebuilt on each render.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    badges: BTreeMap<String, ClassList>,
}

impl LabelCache {
    pub fn refresh(&mut self, tags: &TagRegistry, colors: &ColorRegistry) {
        self.badges = tags
            .iter()
            .map(|tag| {
                let mut classes: ClassList = ["badge"].into_iter().collect();
                classes.add(colors.classes(&tag.color));
                (tag.name.clone(), classes)
            })
            .collect();
        tracing::trace!(labels = self.badges.len(), "refreshed label cache");
    }

    pub fn badge(&self, name: &str) -> LabelBadge {
        let classes = self.badges.get(name).cloned().unwrap_or_else(|| {
            let mut classes: ClassList = ["badge"].into_iter().collect();
            classes.add(&UNKNOWN_LABEL_CLASSES);
            classes
        });
        LabelBadge {
            name: name.to_string(),
            classes,
        }
    }

    /// Splits `text` into plain runs and label badges. Text without labels
    /// comes back as a single text segment.
    pub fn decorate(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in LABEL_REGEX.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            push_text(&mut segments, &text[last..whole.start()]);
            segments.push(Segment::Label(self.badge(&caps[1])));
            last = whole.end();
        }
        push_text(&mut segments, &text[last..]);

        if segments.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }
        segments
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Text(trimmed.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::Tag;

    fn cache() -> LabelCache {
        let tags = TagRegistry::new(vec![Tag::new("Food", None, "green")]);
        let mut cache = LabelCache::default();
        cache.refresh(&tags, &ColorRegistry::load());
        cache
    }

    #[test]
    fn decorate_splits_text_and_labels() {
        let segments = cache().decorate("Lunch #Food with team #Work");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], Segment::Text("Lunch".to_string()));
        let Segment::Label(food) = &segments[1] else {
            panic!("expected label, got {:?}", segments[1]);
        };
        assert_eq!(food.classes.to_attr(), "badge bg-success text-white");
        assert_eq!(segments[2], Segment::Text("with team".to_string()));
        let Segment::Label(work) = &segments[3] else {
            panic!("expected label, got {:?}", segments[3]);
        };
        assert!(work.classes.contains("bg-secondary"));
    }

    #[test]
    fn plain_text_is_single_segment() {
        assert_eq!(
            cache().decorate("Bakery"),
            vec![Segment::Text("Bakery".to_string())]
        );
        assert_eq!(cache().decorate(""), vec![Segment::Text(String::new())]);
    }

    #[test]
    fn label_names_are_distinct() {
        assert_eq!(
            label_names("#Food and #Food-Out and #Food"),
            vec!["Food".to_string(), "Food-Out".to_string()]
        );
    }
}
