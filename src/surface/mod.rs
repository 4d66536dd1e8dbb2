//! The terminal capability the engine draws on.
//!
//! [`CrosstermSurface`] talks to a real terminal; [`MemorySurface`] keeps a
//! cell grid in memory so the engine can be driven from tests.

mod memory;
mod term;

use std::time::Duration;

use crate::error::Result;
use crate::geometry::Size;
use crate::style::{Rgb, StyleHandle, StyleTriple, TermColor};

pub use memory::{MemorySurface, WriteRecord};
pub use term::CrosstermSurface;

/// Input the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    /// Ctrl-C while the terminal is in raw mode.
    Interrupt,
}

pub trait Surface {
    /// Current extent in cells.
    fn size(&self) -> Result<Size>;

    /// Blank the whole surface using the background style.
    fn clear(&mut self) -> Result<()>;

    /// Write `text` at `row`/`col`, at most `max_len` cells wide. Anything past
    /// the surface edges is dropped silently.
    fn write_clipped(
        &mut self,
        row: u16,
        col: u16,
        text: &str,
        max_len: u16,
        style: StyleHandle,
    ) -> Result<()>;

    fn set_background(&mut self, style: StyleHandle) -> Result<()>;

    /// Next pending key, waiting at most `timeout`. Never blocks longer.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyInput>>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    /// Bind a freshly allocated handle to its resolved style.
    fn register_style(&mut self, handle: StyleHandle, style: StyleTriple) -> Result<()>;

    /// Define a custom true color. `None` when the terminal cannot show it.
    fn define_color(&mut self, rgb: Rgb) -> Option<TermColor>;

    fn flush(&mut self) -> Result<()>;
}
