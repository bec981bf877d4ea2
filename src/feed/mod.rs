//! Feed retrieval and parsing.
//!
//! The pipeline is deliberately small: one HTTP GET through a CORS relay,
//! the body awaited as text, then deserialized into a [`Channel`] of
//! [`Item`]s. There is no caching, no retry logic, and no incremental
//! parsing — the player loads one feed per session.
//!
//! - [`fetcher`] - HTTP retrieval of the feed body and enclosure audio
//! - [`parser`] - RSS XML to typed channel data via `quick-xml`

mod fetcher;
mod parser;

pub use fetcher::{
    fetch_audio, fetch_channel, relay_url, FetchError, DEFAULT_FEED_URL, RELAY_ENDPOINT,
};
pub use parser::{parse_channel, Channel, Enclosure, Item};
