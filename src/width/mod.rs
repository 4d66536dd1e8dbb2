//! Display width helpers shared by the tile renderer.

mod utils;

pub use utils::{display_width, fit_to_width, normalize_line, truncate_to_width};
