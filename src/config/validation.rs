//! Configuration checks run before the engine touches the terminal.
//!
//! Every problem is collected so the user sees them all at once.

use std::collections::HashMap;

use regex::Regex;

use crate::error::ConfigError;
use crate::runtime::{PAUSE_KEY, QUIT_KEY};
use crate::style::palette;

use super::{ActionRule, MAX_FREQUENCY, StyleSpec, TileSpec, TilesConfig};

/// Validate a runnable configuration.
pub fn validate(config: &TilesConfig) -> Result<(), ConfigError> {
    let problems = validate_spec(&config.style, config.tiles.iter().map(|tile| &tile.spec));
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(problems))
    }
}

/// Diagnostics for a global style plus tile specs; empty when valid.
pub fn validate_spec<'a, I>(style: &StyleSpec, tiles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a TileSpec>,
{
    let mut problems = Vec::new();
    check_style("style", style, &mut problems);

    let mut toggle_owner: HashMap<char, usize> = HashMap::new();
    let mut positioned = 0usize;
    let mut count = 0usize;

    for (idx, tile) in tiles.into_iter().enumerate() {
        count += 1;
        let label = format!("tile {idx}");

        if tile.period().is_none() {
            problems.push(format!(
                "{label}: frequency must be a positive number of seconds up to {MAX_FREQUENCY}, got {}",
                tile.frequency
            ));
        }

        let geometry = tile.geometry;
        if geometry.height == 0 || geometry.width == 0 {
            problems.push(format!(
                "{label}: geometry must be at least 1x1, got {}x{}",
                geometry.height, geometry.width
            ));
        }
        match (geometry.ypos, geometry.xpos) {
            (Some(_), Some(_)) => positioned += 1,
            (None, None) => {}
            _ => problems.push(format!("{label}: ypos and xpos must be given together")),
        }

        if let Some(key) = tile.toggle_key() {
            if key == QUIT_KEY || key == PAUSE_KEY {
                problems.push(format!("{label}: toggle key {key:?} is reserved"));
            } else if key.is_control() {
                problems.push(format!("{label}: toggle key must be printable"));
            } else if let Some(owner) = toggle_owner.insert(key, idx) {
                problems.push(format!(
                    "{label}: toggle key {key:?} already used by tile {owner}"
                ));
            }
        }

        check_style(&format!("{label} style"), &tile.style, &mut problems);
        for rule in &tile.action {
            check_action(&label, rule, &mut problems);
        }
    }

    if positioned > 0 && positioned < count {
        problems.push(format!(
            "absolute positions given for {positioned} of {count} tiles; position all tiles or none"
        ));
    }

    problems
}

fn check_style(label: &str, style: &StyleSpec, problems: &mut Vec<String>) {
    let named = [
        ("background", &style.background),
        ("title", &style.title),
        ("body", &style.body),
    ];
    for (field, tokens) in named {
        if let Some(tokens) = tokens {
            check_tokens(&format!("{label} {field}"), tokens, problems);
        }
    }
    for rule in &style.patterns {
        check_pattern(label, &rule.pattern, problems);
        check_tokens(&format!("{label} pattern `{}`", rule.pattern), &rule.tokens, problems);
    }
}

fn check_action(label: &str, rule: &ActionRule, problems: &mut Vec<String>) {
    check_pattern(&format!("{label} action"), &rule.pattern, problems);
    if let Some(tokens) = &rule.background {
        check_tokens(
            &format!("{label} action `{}` background", rule.pattern),
            tokens,
            problems,
        );
    }
}

fn check_pattern(label: &str, pattern: &str, problems: &mut Vec<String>) {
    if let Err(err) = Regex::new(pattern) {
        problems.push(format!("{label}: invalid pattern `{pattern}`: {err}"));
    }
}

fn check_tokens(label: &str, tokens: &[String], problems: &mut Vec<String>) {
    if tokens.len() < 2 {
        problems.push(format!("{label}: needs at least 2 colors"));
    }
    if tokens.len() > 3 {
        problems.push(format!("{label}: too many colors/attributes"));
    }
    for color in tokens.iter().take(2) {
        if !palette::is_color(color) {
            problems.push(format!("{label}: invalid color {color}"));
        }
    }
    if let Some(attr) = tokens.get(2) {
        if !palette::is_attr(attr) {
            problems.push(format!("{label}: invalid attribute {attr}"));
        }
    }
}
