//! Tile configuration.
//!
//! The declarative half ([`TilesSpec`]) is plain serde data and can be loaded
//! from JSON. Generators are code, so they are paired with the specs
//! afterwards to form a runnable [`TilesConfig`]. Builders cover the
//! all-in-code case.

mod validation;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::ContentGenerator;

pub use validation::{validate, validate_spec};

/// Style tokens: `[foreground, background, attribute?]`.
pub type StyleTokens = Vec<String>;

fn tokens<I, S>(values: I) -> StyleTokens
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Style block, used both globally and per tile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSpec {
    pub background: Option<StyleTokens>,
    pub title: Option<StyleTokens>,
    pub body: Option<StyleTokens>,
    pub border: Option<bool>,
    pub patterns: Vec<PatternStyle>,
}

impl StyleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.background = Some(tokens(values));
        self
    }

    pub fn with_title<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title = Some(tokens(values));
        self
    }

    pub fn with_body<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = Some(tokens(values));
        self
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_pattern<I, S>(mut self, pattern: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.push(PatternStyle {
            pattern: pattern.into(),
            tokens: tokens(values),
        });
        self
    }
}

/// Style applied to rows in which `pattern` is found.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatternStyle {
    pub pattern: String,
    pub tokens: StyleTokens,
}

/// Trigger fired when `pattern` is found in a tile's content.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActionRule {
    pub pattern: String,
    #[serde(default)]
    pub background: Option<StyleTokens>,
    #[serde(default)]
    pub halt: bool,
    #[serde(default)]
    pub exit: bool,
}

impl ActionRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            background: None,
            halt: false,
            exit: false,
        }
    }

    pub fn with_background<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.background = Some(tokens(values));
        self
    }

    pub fn halting(mut self) -> Self {
        self.halt = true;
        self
    }

    pub fn exiting(mut self) -> Self {
        self.exit = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleSpec {
    #[serde(default)]
    pub key: Option<char>,
    /// Initial visibility.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Tile extent. Positions are only given in absolute-position mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeometrySpec {
    pub height: u16,
    pub width: u16,
    #[serde(default)]
    pub ypos: Option<u16>,
    #[serde(default)]
    pub xpos: Option<u16>,
}

impl GeometrySpec {
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            height,
            width,
            ypos: None,
            xpos: None,
        }
    }

    pub fn position(&self) -> Option<(u16, u16)> {
        self.ypos.zip(self.xpos)
    }
}

pub const DEFAULT_FREQUENCY: f64 = 1.0;
/// Longest accepted period between generator calls, one day.
pub const MAX_FREQUENCY: f64 = 86_400.0;

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TileSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub toggle: Option<ToggleSpec>,
    /// Seconds between generator calls.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    #[serde(default)]
    pub style: StyleSpec,
    #[serde(default)]
    pub action: Vec<ActionRule>,
    pub geometry: GeometrySpec,
}

impl TileSpec {
    pub fn new(geometry: GeometrySpec) -> Self {
        Self {
            title: None,
            toggle: None,
            frequency: DEFAULT_FREQUENCY,
            style: StyleSpec::default(),
            action: Vec::new(),
            geometry,
        }
    }

    pub fn toggle_key(&self) -> Option<char> {
        self.toggle.as_ref().and_then(|toggle| toggle.key)
    }

    pub fn starts_active(&self) -> bool {
        self.toggle.as_ref().is_none_or(|toggle| toggle.active)
    }

    /// Worker period, `None` unless `frequency` lies in `(0, MAX_FREQUENCY]`.
    pub fn period(&self) -> Option<Duration> {
        if self.frequency.is_nan() || self.frequency <= 0.0 || self.frequency > MAX_FREQUENCY {
            return None;
        }
        Duration::try_from_secs_f64(self.frequency).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TilesSpec {
    #[serde(default)]
    pub style: StyleSpec,
    pub tiles: Vec<TileSpec>,
}

impl TilesSpec {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Pair each tile spec with its generator, in order.
    pub fn bind(self, generators: Vec<Box<dyn ContentGenerator>>) -> Result<TilesConfig, ConfigError> {
        if generators.len() != self.tiles.len() {
            return Err(ConfigError::GeneratorCount {
                expected: self.tiles.len(),
                found: generators.len(),
            });
        }
        Ok(TilesConfig {
            style: self.style,
            tiles: self
                .tiles
                .into_iter()
                .zip(generators)
                .map(|(spec, generator)| TileConfig { spec, generator })
                .collect(),
        })
    }
}

/// One runnable tile: its declarative spec plus the generator feeding it.
pub struct TileConfig {
    pub spec: TileSpec,
    pub generator: Box<dyn ContentGenerator>,
}

impl TileConfig {
    pub fn new<G>(height: u16, width: u16, generator: G) -> Self
    where
        G: ContentGenerator + 'static,
    {
        Self {
            spec: TileSpec::new(GeometrySpec::new(height, width)),
            generator: Box::new(generator),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.spec.title = Some(title.into());
        self
    }

    pub fn with_frequency(mut self, seconds: f64) -> Self {
        self.spec.frequency = seconds;
        self
    }

    pub fn with_toggle(mut self, key: char, active: bool) -> Self {
        self.spec.toggle = Some(ToggleSpec {
            key: Some(key),
            active,
        });
        self
    }

    pub fn with_style(mut self, style: StyleSpec) -> Self {
        self.spec.style = style;
        self
    }

    pub fn with_action(mut self, rule: ActionRule) -> Self {
        self.spec.action.push(rule);
        self
    }

    /// Fix the tile at an absolute position.
    pub fn at(mut self, ypos: u16, xpos: u16) -> Self {
        self.spec.geometry.ypos = Some(ypos);
        self.spec.geometry.xpos = Some(xpos);
        self
    }
}

impl std::fmt::Debug for TileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileConfig")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// How tile positions are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// Positions come from the placement grid.
    Auto,
    /// Every tile carries its own `ypos`/`xpos`.
    Absolute,
}

#[derive(Debug, Default)]
pub struct TilesConfig {
    pub style: StyleSpec,
    pub tiles: Vec<TileConfig>,
}

impl TilesConfig {
    pub fn new(style: StyleSpec) -> Self {
        Self {
            style,
            tiles: Vec::new(),
        }
    }

    pub fn with_tile(mut self, tile: TileConfig) -> Self {
        self.tiles.push(tile);
        self
    }

    /// Absolute only when there are tiles and all of them are positioned.
    pub fn placement_mode(&self) -> PlacementMode {
        let positioned = self
            .tiles
            .iter()
            .filter(|tile| tile.spec.geometry.position().is_some())
            .count();
        if positioned > 0 && positioned == self.tiles.len() {
            PlacementMode::Absolute
        } else {
            PlacementMode::Auto
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::fixed_lines;

    const SAMPLE: &str = r#"{
        "style": { "background": ["WHITE", "BLUE"], "title": ["BLUE", "WHITE"], "border": true },
        "tiles": [
            {
                "title": "CALENDAR",
                "frequency": 0.25,
                "geometry": { "height": 15, "width": 24 },
                "style": { "title": ["WHITE", "RED", "BOLD"] },
                "toggle": { "key": "c" }
            },
            {
                "geometry": { "height": 3, "width": 45 },
                "action": [ { "pattern": "[:]10[.]", "background": ["WHITE", "LIME"], "halt": true } ]
            }
        ]
    }"#;

    #[test]
    fn json_spec_fills_defaults() {
        let spec = TilesSpec::from_json_str(SAMPLE).unwrap();
        assert_eq!(spec.style.border, Some(true));
        assert_eq!(spec.tiles.len(), 2);
        assert_eq!(spec.tiles[0].toggle_key(), Some('c'));
        assert!(spec.tiles[0].starts_active());
        assert_eq!(spec.tiles[1].frequency, DEFAULT_FREQUENCY);
        assert!(spec.tiles[1].title.is_none());
        assert!(spec.tiles[1].action[0].halt);
        assert!(!spec.tiles[1].action[0].exit);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = TilesSpec::from_json_str(r#"{ "tiles": [], "colour": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn bind_requires_one_generator_per_tile() {
        let spec = TilesSpec::from_json_str(SAMPLE).unwrap();
        let err = spec
            .clone()
            .bind(vec![Box::new(fixed_lines(["only one"]))])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::GeneratorCount {
                expected: 2,
                found: 1
            }
        ));

        let config = spec
            .bind(vec![
                Box::new(fixed_lines(["a"])),
                Box::new(fixed_lines(["b"])),
            ])
            .unwrap();
        assert_eq!(config.tiles.len(), 2);
        assert_eq!(config.placement_mode(), PlacementMode::Auto);
    }

    #[test]
    fn placement_mode_needs_every_tile_positioned() {
        let partial = TilesConfig::default()
            .with_tile(TileConfig::new(1, 1, fixed_lines(["a"])).at(0, 0))
            .with_tile(TileConfig::new(1, 1, fixed_lines(["b"])));
        assert_eq!(partial.placement_mode(), PlacementMode::Auto);

        let full = TilesConfig::default()
            .with_tile(TileConfig::new(1, 1, fixed_lines(["a"])).at(0, 0))
            .with_tile(TileConfig::new(1, 1, fixed_lines(["b"])).at(0, 2));
        assert_eq!(full.placement_mode(), PlacementMode::Absolute);
    }
}
