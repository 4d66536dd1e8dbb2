//! Adapters that put an [`Engine`](super::Engine) on a real terminal.

pub mod cli;
