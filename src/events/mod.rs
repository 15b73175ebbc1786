//! Event handling module.
//!
//! Terminal input and resize events are polled on a background thread and
//! forwarded to the main loop.

pub mod terminal;
