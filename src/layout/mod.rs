//! Layout module orchestrator.
//!
//! Tiles are positioned by the bin-packing [`PlacementGrid`]; callers import
//! the public types from here.

pub mod placement;

pub use placement::{GridError, Placement, PlacementGrid, arrange};
