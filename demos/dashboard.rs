//! System dashboard - live tiles fed by shell commands
//!
//! Keys:
//! - `Q` or Ctrl-C quits
//! - space pauses and resumes drawing
//! - `p` shows/hides the process list, `f` the fortune tile
//!
//! Set `TILES_LOG=/path/to/file.log` to capture the JSON event log.

use std::error::Error;
use std::time::Duration;

use room_tiles::config::{ActionRule, StyleSpec, TileConfig, TilesConfig};
use room_tiles::generator::{ContentGenerator, GeneratorResult, ShellCommand, Uptime};
use room_tiles::logging::{FileSink, LogLevel, Logger};
use room_tiles::{CliDriver, EngineConfig};

const LOG_LIMIT_BYTES: u64 = 1024 * 1024;

/// `uname` fields, one per line.
struct Platform {
    uname: ShellCommand,
}

impl Default for Platform {
    fn default() -> Self {
        Self {
            uname: ShellCommand::new("uname").args(["-s", "-r", "-m", "-o"]),
        }
    }
}

impl ContentGenerator for Platform {
    fn generate(&mut self) -> GeneratorResult {
        let lines = self.uname.generate()?;
        Ok(lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .map(str::to_string)
            .collect())
    }
}

fn build_tiles() -> TilesConfig {
    let global = StyleSpec::new()
        .with_background(["WHITE", "BLUE"])
        .with_title(["BLUE", "WHITE"]);

    TilesConfig::new(global)
        .with_tile(
            TileConfig::new(1, 45, Uptime::new("Runtime"))
                .with_frequency(0.25)
                .with_style(StyleSpec::new().with_pattern(r"[:]0[0-9][.]", ["MAGENTA", "BLACK", "BOLD"]))
                .with_action(
                    ActionRule::new(r"0:10:00[.]")
                        .with_background(["WHITE", "LIME"])
                        .halting(),
                ),
        )
        .with_tile(
            TileConfig::new(10, 24, ShellCommand::new("cal"))
                .with_title("CALENDAR")
                .with_frequency(0.25)
                .with_style(StyleSpec::new().with_title(["WHITE", "RED", "BOLD"])),
        )
        .with_tile(
            TileConfig::new(8, 24, Platform::default())
                .with_title("PLATFORM")
                .with_frequency(60.0),
        )
        .with_tile(
            TileConfig::new(20, 36, ShellCommand::new("ps").arg("-e"))
                .with_title("PROCESSES")
                .with_frequency(0.25)
                .with_toggle('p', true)
                .with_style(StyleSpec::new().with_pattern("00[:]00[:]00", ["BLACK", "YELLOW", "BOLD"])),
        )
        .with_tile(
            TileConfig::new(20, 56, ShellCommand::new("who"))
                .with_title("ACTIVE USERS")
                .with_frequency(0.25)
                .with_style(StyleSpec::new().with_title(["WHITE", "FUCHSIA"])),
        )
        .with_tile(
            TileConfig::new(5, 56, ShellCommand::new("fortune").skip_blank_lines(true))
                .with_title("FORTUNE")
                .with_frequency(60.0)
                .with_toggle('f', true),
        )
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = EngineConfig {
        metrics_interval: Duration::from_secs(10),
        ..EngineConfig::default()
    };
    if let Ok(path) = std::env::var("TILES_LOG") {
        let sink = FileSink::new(path, LOG_LIMIT_BYTES)?;
        config.logger = Some(Logger::new(sink).with_min_level(LogLevel::Info));
    }

    CliDriver::new(build_tiles(), config)?.run()?;
    Ok(())
}
