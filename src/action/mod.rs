//! Regex triggers evaluated against freshly produced tile content.

use regex::Regex;

use crate::config::ActionRule;
use crate::error::{ConfigError, Result};
use crate::style::{StyleHandle, StyleTranslator};
use crate::surface::Surface;

/// Runtime effect applied by the engine when a trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionEffect {
    /// Replace the screen background with this style.
    pub background: Option<StyleHandle>,
    /// Pause the engine until the user resumes it.
    pub halt: bool,
    /// Leave the main loop.
    pub exit: bool,
}

impl ActionEffect {
    pub fn is_noop(&self) -> bool {
        self.background.is_none() && !self.halt && !self.exit
    }
}

/// Ordered `(pattern, effect)` rules for one tile.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    rules: Vec<(Regex, ActionEffect)>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<S>(
        rules: &[ActionRule],
        translator: &mut StyleTranslator,
        surface: &mut S,
    ) -> Result<Self>
    where
        S: Surface + ?Sized,
    {
        let mut table = ActionTable::new();
        for rule in rules {
            let regex = Regex::new(&rule.pattern).map_err(|err| {
                ConfigError::Invalid(vec![format!("action pattern `{}`: {err}", rule.pattern)])
            })?;
            let background = match &rule.background {
                Some(tokens) => Some(translator.resolve(tokens.as_slice(), surface)?),
                None => None,
            };
            table.push(
                regex,
                ActionEffect {
                    background,
                    halt: rule.halt,
                    exit: rule.exit,
                },
            );
        }
        Ok(table)
    }

    pub fn push(&mut self, pattern: Regex, effect: ActionEffect) {
        self.rules.push((pattern, effect));
    }

    /// Effect of the first rule whose pattern is found in any of `lines`.
    pub fn evaluate<T: AsRef<str>>(&self, lines: &[T]) -> Option<ActionEffect> {
        self.rules.iter().find_map(|(pattern, effect)| {
            lines
                .iter()
                .any(|line| pattern.is_match(line.as_ref()))
                .then_some(*effect)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
