use thiserror::Error;

use crate::layout::GridError;

/// Unified result type for the tiling engine.
pub type Result<T> = std::result::Result<T, TilesError>;

/// Errors surfaced by the engine. Style misses, clipping and placement
/// failures are absorbed and never show up here.
#[derive(Debug, Error)]
pub enum TilesError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("placement grid error: {0}")]
    Grid(#[from] GridError),
    #[error("failed to spawn worker for tile {index}: {source}")]
    WorkerSpawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration rejected before the engine starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    Invalid(Vec<String>),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} generators, found {found}")]
    GeneratorCount { expected: usize, found: usize },
}

impl ConfigError {
    /// Diagnostics carried by an `Invalid` error, empty otherwise.
    pub fn problems(&self) -> &[String] {
        match self {
            ConfigError::Invalid(problems) => problems,
            _ => &[],
        }
    }
}

/// Failure reported by a content generator. The worker skips the tick and retries.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GeneratorError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GeneratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Returned when a producer publishes into a queue the consumer already closed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("freshness queue is closed")]
pub struct QueueClosed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_failures_surface_as_io() {
        let err: TilesError = std::io::Error::other("tty gone").into();
        assert!(matches!(err, TilesError::Io(_)));
        assert_eq!(err.to_string(), "tty gone");
    }

    #[test]
    fn worker_spawn_keeps_its_source() {
        let err = TilesError::WorkerSpawn {
            index: 2,
            source: std::io::Error::other("no threads"),
        };
        assert_eq!(
            err.to_string(),
            "failed to spawn worker for tile 2: no threads"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
