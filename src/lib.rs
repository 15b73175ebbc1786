//! Animated particle backdrop.
//!
//! A particle field renderer owns a drawing surface and a fixed set of
//! particles, redrawing them once per frame while mounted and regenerating
//! them whenever the viewport is resized. Decorative layers and a terminal
//! front end are built on top of the same surfaces.

pub mod animation;
pub mod app;
pub mod config;
pub mod decor;
pub mod error;
pub mod events;
pub mod field;
pub mod headless;
pub mod logger;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod surface;
pub mod ui;
pub mod viewport;
