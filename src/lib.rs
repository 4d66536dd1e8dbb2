//! Configuration driven terminal tiling engine.
//!
//! Each tile is bound to a content generator that runs on its own worker
//! thread and publishes lines through a single-slot queue. The engine loop
//! drains those queues without blocking, applies style markup and pattern
//! triggered actions, places tiles on a bin-packing grid and draws them on a
//! [`Surface`].

pub mod action;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod queue;
pub mod runtime;
pub mod style;
pub mod surface;
pub mod tile;
pub mod width;
pub mod worker;

pub use action::{ActionEffect, ActionTable};
pub use config::{
    ActionRule, GeometrySpec, PatternStyle, PlacementMode, StyleSpec, TileConfig, TileSpec,
    TilesConfig, TilesSpec, ToggleSpec, validate,
};
pub use error::{ConfigError, GeneratorError, QueueClosed, Result, TilesError};
pub use generator::{ContentGenerator, GeneratorResult, ShellCommand, Uptime};
pub use geometry::{Rect, Size};
pub use layout::{GridError, Placement, PlacementGrid};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{EngineMetrics, MetricSnapshot};
pub use queue::FreshnessQueue;
pub use runtime::driver::cli::{CliDriver, CliDriverError, DriverResult};
pub use runtime::{Engine, EngineConfig, EngineState, PAUSE_KEY, QUIT_KEY};
pub use style::{StyleHandle, StyleKey, StyleTable, StyleTranslator};
pub use surface::{CrosstermSurface, KeyInput, MemorySurface, Surface};
pub use tile::Tile;
pub use width::display_width;
pub use worker::{Payload, Worker, WorkerSettings, WorkerStatus};
