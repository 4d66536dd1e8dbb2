use regex::Regex;

use crate::config::StyleSpec;
use crate::error::{ConfigError, Result};
use crate::surface::Surface;

use super::translator::{StyleHandle, StyleTranslator};

pub const KEY_BACKGROUND: &str = "background";
pub const KEY_TITLE: &str = "title";
pub const KEY_BODY: &str = "body";
pub const KEY_BORDER: &str = "border";

/// Style table key: a fixed name or a pattern searched in each rendered row.
#[derive(Debug, Clone)]
pub enum StyleKey {
    Exact(String),
    Pattern(Regex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleValue {
    Handle(StyleHandle),
    Flag(bool),
}

/// Ordered style assignments.
///
/// Exact keys are unique and replaced on insert; pattern keys accumulate in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    entries: Vec<(StyleKey, StyleValue)>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a declarative style block into handles.
    pub fn build<S>(spec: &StyleSpec, translator: &mut StyleTranslator, surface: &mut S) -> Result<Self>
    where
        S: Surface + ?Sized,
    {
        let mut table = StyleTable::new();
        let named = [
            (KEY_BACKGROUND, &spec.background),
            (KEY_TITLE, &spec.title),
            (KEY_BODY, &spec.body),
        ];
        for (name, tokens) in named {
            if let Some(tokens) = tokens {
                let handle = translator.resolve(tokens.as_slice(), surface)?;
                table.insert(StyleKey::Exact(name.to_string()), StyleValue::Handle(handle));
            }
        }
        if let Some(border) = spec.border {
            table.insert(StyleKey::Exact(KEY_BORDER.to_string()), StyleValue::Flag(border));
        }
        for rule in &spec.patterns {
            let regex = Regex::new(&rule.pattern).map_err(|err| {
                ConfigError::Invalid(vec![format!("style pattern `{}`: {err}", rule.pattern)])
            })?;
            let handle = translator.resolve(rule.tokens.as_slice(), surface)?;
            table.insert(StyleKey::Pattern(regex), StyleValue::Handle(handle));
        }
        Ok(table)
    }

    pub fn insert(&mut self, key: StyleKey, value: StyleValue) {
        if let StyleKey::Exact(name) = &key {
            if let Some(slot) = self.exact_slot_mut(name) {
                *slot = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// New table with `overrides` layered on top of `self`.
    pub fn merge(&self, overrides: &StyleTable) -> StyleTable {
        let mut merged = self.clone();
        for (key, value) in &overrides.entries {
            merged.insert(key.clone(), *value);
        }
        merged
    }

    /// Exact keys first, then the first pattern found in `text`.
    pub fn lookup(&self, text: &str) -> Option<StyleValue> {
        self.exact(text).or_else(|| self.first_pattern_match(text))
    }

    pub fn exact(&self, name: &str) -> Option<StyleValue> {
        self.entries.iter().find_map(|(key, value)| match key {
            StyleKey::Exact(candidate) if candidate == name => Some(*value),
            _ => None,
        })
    }

    pub fn first_pattern_match(&self, text: &str) -> Option<StyleValue> {
        self.entries.iter().find_map(|(key, value)| match key {
            StyleKey::Pattern(regex) if regex.is_match(text) => Some(*value),
            _ => None,
        })
    }

    /// Handle stored under an exact key; flags and missing keys give `NONE`.
    pub fn handle(&self, name: &str) -> StyleHandle {
        match self.exact(name) {
            Some(StyleValue::Handle(handle)) => handle,
            _ => StyleHandle::NONE,
        }
    }

    pub fn has_handle(&self, name: &str) -> bool {
        matches!(self.exact(name), Some(StyleValue::Handle(_)))
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.exact(name), Some(StyleValue::Flag(true)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn exact_slot_mut(&mut self, name: &str) -> Option<&mut StyleValue> {
        self.entries.iter_mut().find_map(|(key, value)| match key {
            StyleKey::Exact(candidate) if candidate == name => Some(value),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternStyle;
    use crate::geometry::Size;
    use crate::surface::MemorySurface;

    fn tokens(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn pattern(pattern: &str, values: &[&str]) -> PatternStyle {
        PatternStyle {
            pattern: pattern.to_string(),
            tokens: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn tile_overrides_replace_exact_keys_and_append_patterns() {
        let mut surface = MemorySurface::new(Size::new(10, 2));
        let mut translator = StyleTranslator::new();
        let global = StyleSpec {
            background: tokens(&["WHITE", "BLUE"]),
            title: tokens(&["BLUE", "WHITE"]),
            border: Some(true),
            patterns: vec![pattern("ERR", &["RED", "BLACK"])],
            ..StyleSpec::default()
        };
        let tile = StyleSpec {
            title: tokens(&["WHITE", "RED", "BOLD"]),
            border: Some(false),
            patterns: vec![pattern("WARN", &["YELLOW", "BLACK"])],
            ..StyleSpec::default()
        };
        let base = StyleTable::build(&global, &mut translator, &mut surface).unwrap();
        let layered = StyleTable::build(&tile, &mut translator, &mut surface).unwrap();
        let merged = base.merge(&layered);

        assert_eq!(merged.handle(KEY_BACKGROUND), base.handle(KEY_BACKGROUND));
        assert_eq!(merged.handle(KEY_TITLE), layered.handle(KEY_TITLE));
        assert_ne!(merged.handle(KEY_TITLE), base.handle(KEY_TITLE));
        assert!(!merged.flag(KEY_BORDER));
        assert!(merged.first_pattern_match("ERR here").is_some());
        assert!(merged.first_pattern_match("WARN here").is_some());
        assert_eq!(merged.len(), 5);
    }

    #[test]
    fn first_pattern_in_table_order_wins() {
        let mut surface = MemorySurface::new(Size::new(10, 2));
        let mut translator = StyleTranslator::new();
        let spec = StyleSpec {
            patterns: vec![pattern("o", &["RED", "BLACK"]), pattern("foo", &["GREEN", "BLACK"])],
            ..StyleSpec::default()
        };
        let table = StyleTable::build(&spec, &mut translator, &mut surface).unwrap();
        let red = translator.resolve(&["RED", "BLACK"], &mut surface).unwrap();
        assert_eq!(table.lookup("foo"), Some(StyleValue::Handle(red)));
        assert_eq!(table.lookup("bar"), None);
    }

    #[test]
    fn exact_keys_take_precedence_in_lookup() {
        let mut table = StyleTable::new();
        table.insert(
            StyleKey::Pattern(Regex::new("title").unwrap()),
            StyleValue::Flag(false),
        );
        table.insert(StyleKey::Exact(KEY_TITLE.to_string()), StyleValue::Flag(true));
        assert_eq!(table.lookup(KEY_TITLE), Some(StyleValue::Flag(true)));
        assert!(table.handle(KEY_TITLE).is_none());
    }
}
