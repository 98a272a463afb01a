use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TagError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, parent: Option<&str>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(ToString::to_string),
            color: color.into(),
        }
    }
}

/// The tag taxonomy, kept in insertion order.
///
/// Names are unique. Parents refer to other tags by name; a parent that does
/// not resolve makes the tag a root for traversal purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|tag| tag.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|tag| tag.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Appends `tag`; the registry is never re-sorted.
    pub fn push(&mut self, tag: Tag) -> Result<(), TagError> {
        if self.contains(&tag.name) {
            return Err(TagError::Duplicate(tag.name));
        }
        self.tags.push(tag);
        Ok(())
    }

    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.parent.as_deref() == Some(parent))
    }

    fn is_root(&self, tag: &Tag) -> bool {
        match tag.parent.as_deref() {
            None => true,
            Some(parent) => !self.contains(parent),
        }
    }

    /// Depth-first, pre-order walk of the hierarchy: a parent is always
    /// visited before its children, siblings in registry order. Tags caught
    /// in a parent cycle come last, each unvisited one starting a new tree.
    pub fn visit_hierarchy<F>(&self, mut visit: F)
    where
        F: FnMut(&Tag, usize),
    {
        let mut seen = HashSet::new();
        for root in self.tags.iter().filter(|tag| self.is_root(tag)) {
            self.visit_from(root, 0, &mut seen, &mut visit);
        }
        for tag in &self.tags {
            self.visit_from(tag, 0, &mut seen, &mut visit);
        }
    }

    fn visit_from<'a, F>(&'a self, tag: &'a Tag, depth: usize, seen: &mut HashSet<&'a str>, visit: &mut F)
    where
        F: FnMut(&Tag, usize),
    {
        if !seen.insert(tag.name.as_str()) {
            return;
        }
        visit(tag, depth);
        for child in self.children(&tag.name) {
            self.visit_from(child, depth + 1, seen, visit);
        }
    }

    /// The chain from the root down to `name`, inclusive. Empty if `name` is
    /// unknown.
    pub fn breadcrumb(&self, name: &str) -> Vec<&Tag> {
        let mut chain = Vec::new();
        let mut current = self.get_by_name(name);
        while let Some(tag) = current {
            if chain.len() > self.tags.len() || chain.iter().any(|t: &&Tag| t.name == tag.name) {
                break;
            }
            chain.push(tag);
            current = tag.parent.as_deref().and_then(|p| self.get_by_name(p));
        }
        chain.reverse();
        chain
    }

    /// True when `ancestor` is reachable from `name` by following parents.
    /// A tag does not descend from itself.
    pub fn descends_from(&self, name: &str, ancestor: &str) -> bool {
        let mut current = self.get_by_name(name).and_then(|tag| tag.parent.as_deref());
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.tags.len() {
                return false;
            }
            current = self.get_by_name(parent).and_then(|tag| tag.parent.as_deref());
        }
        false
    }

    /// Whether giving `name` the parent `parent` would close a loop.
    pub fn would_cycle(&self, name: &str, parent: &str) -> bool {
        name == parent || self.descends_from(parent, name)
    }

    pub fn validate_acyclic(&self) -> Result<(), TagError> {
        for tag in &self.tags {
            let mut current = tag.parent.as_deref();
            let mut steps = 0;
            while let Some(parent) = current {
                if parent == tag.name || steps > self.tags.len() {
                    return Err(TagError::Cycle {
                        tag: tag.name.clone(),
                        parent: tag.parent.clone().unwrap_or_default(),
                    });
                }
                steps += 1;
                current = self.get_by_name(parent).and_then(|t| t.parent.as_deref());
            }
        }
        Ok(())
    }

    /// Element-id friendly path of `name`, e.g. `Food-Groceries`.
    pub fn path_id(&self, name: &str) -> String {
        self.breadcrumb(name)
            .iter()
            .map(|tag| sanitize_segment(&tag.name))
            .collect::<Vec<_>>()
            .join("-")
    }
}

pub fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagRegistry {
        TagRegistry::new(vec![
            Tag::new("Food", None, "green"),
            Tag::new("Groceries", Some("Food"), "green"),
            Tag::new("Travel", None, "blue"),
            Tag::new("Organic", Some("Groceries"), "yellow"),
            Tag::new("Train", Some("Travel"), "blue"),
        ])
    }

    #[test]
    fn visit_hierarchy_is_depth_first_preorder() {
        let tags = sample();
        let mut seen = vec![];
        tags.visit_hierarchy(|tag, depth| seen.push((tag.name.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("Food".to_string(), 0),
                ("Groceries".to_string(), 1),
                ("Organic".to_string(), 2),
                ("Travel".to_string(), 0),
                ("Train".to_string(), 1),
            ]
        );
    }

    #[test]
    fn orphans_are_visited_as_roots() {
        let tags = TagRegistry::new(vec![Tag::new("Lost", Some("Gone"), "red")]);
        let mut seen = vec![];
        tags.visit_hierarchy(|tag, depth| seen.push((tag.name.clone(), depth)));
        assert_eq!(seen, vec![("Lost".to_string(), 0)]);
    }

    #[test]
    fn tags_in_a_parent_cycle_are_still_visited() {
        let tags = TagRegistry::new(vec![
            Tag::new("A", Some("B"), "red"),
            Tag::new("B", Some("A"), "red"),
            Tag::new("C", None, "red"),
        ]);
        let mut seen = vec![];
        tags.visit_hierarchy(|tag, depth| seen.push((tag.name.clone(), depth)));
        assert_eq!(
            seen,
            vec![
                ("C".to_string(), 0),
                ("A".to_string(), 0),
                ("B".to_string(), 1),
            ]
        );
    }

    #[test]
    fn push_rejects_duplicates_and_appends() {
        let mut tags = sample();
        assert_eq!(
            tags.push(Tag::new("Food", None, "red")),
            Err(TagError::Duplicate("Food".to_string()))
        );
        tags.push(Tag::new("Books", None, "red")).expect("new tag");
        assert_eq!(tags.index_of("Books"), Some(5));
    }

    #[test]
    fn reachability() {
        let tags = sample();
        assert!(tags.descends_from("Organic", "Food"));
        assert!(tags.descends_from("Groceries", "Food"));
        assert!(!tags.descends_from("Food", "Food"));
        assert!(!tags.descends_from("Train", "Food"));
        assert!(tags.would_cycle("Food", "Organic"));
        assert!(tags.would_cycle("Food", "Food"));
        assert!(!tags.would_cycle("Organic", "Travel"));
    }

    #[test]
    fn validate_acyclic_detects_loops() {
        assert!(sample().validate_acyclic().is_ok());
        let looped = TagRegistry::new(vec![
            Tag::new("A", Some("B"), "red"),
            Tag::new("B", Some("A"), "red"),
        ]);
        assert!(matches!(looped.validate_acyclic(), Err(TagError::Cycle { .. })));
    }

    #[test]
    fn breadcrumb_and_path_id() {
        let tags = sample();
        let names: Vec<&str> = tags
            .breadcrumb("Organic")
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["Food", "Groceries", "Organic"]);
        assert_eq!(tags.path_id("Organic"), "Food-Groceries-Organic");
        assert!(tags.breadcrumb("Nope").is_empty());
    }

    #[test]
    fn deserializes_missing_parent_as_root() {
        let tags: TagRegistry =
            serde_json::from_str(r#"[{"name":"Food","color":"green"}]"#).expect("valid json");
        assert_eq!(tags.get_by_name("Food").and_then(|t| t.parent.clone()), None);
    }
}
