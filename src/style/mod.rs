//! Symbolic color tokens to terminal styles.
//!
//! Configuration speaks in curses-era tokens (`["WHITE", "BLUE", "BOLD"]`).
//! [`StyleTranslator`] turns those into [`StyleHandle`]s the surface knows how
//! to paint, and [`StyleTable`] layers global and per-tile assignments.

pub mod palette;
mod table;
mod translator;

pub use palette::{BaseColor, Rgb, TermColor, TextAttr};
pub use table::{KEY_BACKGROUND, KEY_BODY, KEY_BORDER, KEY_TITLE, StyleKey, StyleTable, StyleValue};
pub use translator::{StyleHandle, StyleTranslator, StyleTriple};
