use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::config::TilesConfig;
use crate::error::TilesError;
use crate::runtime::{Engine, EngineConfig};
use crate::surface::CrosstermSurface;

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("engine error: {0}")]
    Engine(#[from] TilesError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Owns an engine drawing on stdout and manages raw mode + alternate screen
/// transitions around its run loop.
pub struct CliDriver {
    engine: Engine<CrosstermSurface<Stdout>>,
}

impl CliDriver {
    /// Validates `tiles` before the terminal is touched.
    pub fn new(tiles: TilesConfig, config: EngineConfig) -> DriverResult<Self> {
        let engine = Engine::new(tiles, CrosstermSurface::new(io::stdout()), config)?;
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &Engine<CrosstermSurface<Stdout>> {
        &self.engine
    }

    pub fn run(mut self) -> DriverResult<()> {
        let guard = TerminalGuard::enter(io::stdout())?;
        let result = self.engine.run();
        drop(guard);
        result.map_err(CliDriverError::from)
    }
}

/// Restores the terminal when dropped, on every exit path including panics.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> DriverResult<Self> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        let mut guard = Self { out };
        execute!(guard.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        execute!(self.out, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
