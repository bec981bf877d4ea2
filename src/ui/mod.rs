//! Terminal User Interface module.
//!
//! This module provides the TUI for the news player, including:
//! - Main event loop (`run`)
//! - Keyboard input handling
//! - Background task event processing (feed load, audio load)
//! - Rendering for the loading/error/loaded views
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `current` - Current-news card widget
//! - `history` - History list widget with the load-more footer
//! - `status` - Status bar and toast overlay widgets

mod current;
mod events;
mod history;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
