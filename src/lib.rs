//! newscast — a terminal player for a daily-news podcast RSS feed.
//!
//! One feed is fetched per session through a CORS relay, parsed into a
//! channel of episodes, and rendered as a "current episode + history list"
//! view with single-handle audio playback.
//!
//! - [`feed`] - fetching and parsing the RSS channel
//! - [`player`] - the single owned audio handle (`rodio`-backed)
//! - [`app`] - controller state: selection, display window, transients
//! - [`ui`] - ratatui rendering and the crossterm event loop
//! - [`util`] - pure text formatting helpers

pub mod app;
pub mod feed;
pub mod player;
pub mod ui;
pub mod util;
