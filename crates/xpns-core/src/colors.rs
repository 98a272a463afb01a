use std::cmp::Ordering;

use deunicode::deunicode;
use indexmap::IndexMap;
use serde::Deserialize;

const PALETTE_TOML: &str = include_str!("palette.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Palette {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        let color = |key: &str, name: &str, classes: &[&str]| Color {
            key: key.to_string(),
            name: name.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        };

        Self {
            version: 1,
            colors: vec![
                color("blue", "Blau", &["bg-primary", "text-white"]),
                color("grey", "Grau", &["bg-secondary", "text-white"]),
                color("green", "Grün", &["bg-success", "text-white"]),
                color("red", "Rot", &["bg-danger", "text-white"]),
            ],
        }
    }
}

/// Static lookup from color key to display name and CSS classes.
///
/// Iteration follows palette order; [`ColorRegistry::sorted_by_name`] is the
/// order presented to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRegistry {
    colors: IndexMap<String, Color>,
}

impl ColorRegistry {
    pub fn load() -> Self {
        match Self::from_toml(PALETTE_TOML) {
            Ok(registry) => registry,
            Err(error) => {
                tracing::error!(%error, "failed to load color palette; using fallback palette");
                Self::from_colors(Palette::default().colors)
            }
        }
    }

    /// Parses a palette; a palette without colors is an error.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let palette: Palette = toml::from_str(text)?;
        if palette.colors.is_empty() {
            anyhow::bail!("color palette has no colors");
        }
        tracing::info!(
            version = palette.version,
            color_count = palette.colors.len(),
            "loaded color palette"
        );
        Ok(Self::from_colors(palette.colors))
    }

    pub fn from_colors(colors: Vec<Color>) -> Self {
        let colors = colors
            .into_iter()
            .map(|color| (color.key.clone(), color))
            .collect();
        Self { colors }
    }

    pub fn all(&self) -> impl Iterator<Item = &Color> {
        self.colors.values()
    }

    pub fn get(&self, key: &str) -> Option<&Color> {
        self.colors.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.colors.contains_key(key)
    }

    /// Classes for `key`; unknown keys have none.
    pub fn classes(&self, key: &str) -> &[String] {
        self.colors
            .get(key)
            .map(|color| color.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn default_key(&self) -> Option<&str> {
        self.colors.keys().next().map(String::as_str)
    }

    pub fn sorted_by_name(&self) -> Vec<&Color> {
        let mut colors: Vec<&Color> = self.colors.values().collect();
        colors.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.key.cmp(&b.key)));
        colors
    }
}

pub fn text_classes(classes: &[String]) -> Vec<String> {
    classes
        .iter()
        .filter(|class| class.starts_with("text-"))
        .cloned()
        .collect()
}

/// Compares display names the way a reader expects: accents folded onto
/// their base letter, case ignored.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(name: &str) -> String {
    deunicode(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_palette_loads_in_file_order() {
        let colors = ColorRegistry::load();
        let keys: Vec<&str> = colors.all().map(|c| c.key.as_str()).collect();
        assert_eq!(keys.first(), Some(&"blue"));
        assert_eq!(keys.len(), 8);
        assert_eq!(colors.default_key(), Some("blue"));
    }

    #[test]
    fn sorted_by_name_folds_umlauts() {
        let colors = ColorRegistry::load();
        let names: Vec<&str> = colors
            .sorted_by_name()
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Blau", "Dunkel", "Gelb", "Grau", "Grün", "Hell", "Rot", "Türkis"]
        );
    }

    #[test]
    fn unknown_key_has_no_classes() {
        let colors = ColorRegistry::load();
        assert!(colors.classes("mauve").is_empty());
        assert_eq!(colors.classes("yellow"), ["bg-warning", "text-dark"]);
    }

    #[test]
    fn text_classes_keeps_only_text_prefixed() {
        let classes = vec![
            "bg-light".to_string(),
            "text-dark".to_string(),
            "border".to_string(),
        ];
        assert_eq!(text_classes(&classes), vec!["text-dark".to_string()]);
    }

    #[test]
    fn from_toml_rejects_garbage() {
        assert!(ColorRegistry::from_toml("colors = 3").is_err());
        assert!(ColorRegistry::from_toml("version = 2\ncolors = []").is_err());
    }

    #[test]
    fn from_toml_keeps_palette_order() {
        let text = r#"
            [[colors]]
            key = "teal"
            name = "Türkis"
            classes = ["bg-info"]

            [[colors]]
            key = "black"
            name = "Schwarz"
        "#;
        let colors = ColorRegistry::from_toml(text).expect("palette");
        let keys: Vec<&str> = colors.all().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["teal", "black"]);
        assert_eq!(colors.default_key(), Some("teal"));
        assert!(colors.classes("black").is_empty());
    }
}
