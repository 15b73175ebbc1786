//! User interface module.
//!
//! This module handles all terminal rendering using the `ratatui` library:
//! - The backdrop widget compositing every particle and decor surface
//! - The foreground card and key hints
//! - The log pane

type Frame<'a> = ratatui::Frame<'a>;

mod render;
mod widgets;

pub use render::{pixel_size, render, Backdrop};
