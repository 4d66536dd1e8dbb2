//! Error taxonomy for the tiling engine.

mod types;

pub use types::{ConfigError, GeneratorError, QueueClosed, Result, TilesError};
