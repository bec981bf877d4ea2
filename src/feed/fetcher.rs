use thiserror::Error;
use url::Url;

use crate::feed::parser::{parse_channel, Channel};

/// Upstream feed for the daily news podcast.
pub const DEFAULT_FEED_URL: &str = "https://data.getpodcast.xyz/data/ximalaya/68589357.xml";

/// CORS-relay endpoint the upstream URL is wrapped in. The upstream host
/// does not matter to the relay; it just mirrors the raw body.
pub const RELAY_ENDPOINT: &str = "https://api.allorigins.win/raw";

const MAX_FEED_BYTES: usize = 10 * 1024 * 1024; // 10MB
const MAX_AUDIO_BYTES: usize = 128 * 1024 * 1024; // 128MB

/// Errors that can occur while fetching the feed or an episode's audio.
///
/// The UI collapses all of these into a single failure state for the feed
/// and a logged-only failure for audio; the distinction exists for logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body could not be parsed as an RSS channel
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Builds the relay-wrapped URL for a feed.
///
/// # Errors
///
/// Returns [`url::ParseError`] if the relay endpoint constant is malformed,
/// which would be a programming error rather than a runtime condition.
pub fn relay_url(feed_url: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(RELAY_ENDPOINT, &[("url", feed_url)])
}

/// Fetches a URL and returns the full response body as text.
///
/// No retries; the request timeout comes from the client configuration.
async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    if body.len() > MAX_FEED_BYTES {
        return Err(FetchError::ResponseTooLarge);
    }
    Ok(body)
}

/// Fetches and parses the podcast channel from `url`.
///
/// This is the single startup fetch: one GET, the whole body awaited as
/// text, then parsed. Every failure mode (network, HTTP status, oversized
/// body, malformed XML) surfaces as a [`FetchError`] that the controller
/// collapses into its terminal error state.
pub async fn fetch_channel(client: &reqwest::Client, url: &str) -> Result<Channel, FetchError> {
    tracing::debug!(url, "Fetching feed");
    let body = fetch_text(client, url).await?;

    let channel = parse_channel(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
    tracing::info!(
        title = %channel.title,
        items = channel.items.len(),
        "Feed fetched"
    );
    Ok(channel)
}

/// Downloads an episode's enclosure audio in full.
///
/// Called when a track is prepared; the decoded bytes are handed to the
/// audio output once the download completes.
pub async fn fetch_audio(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    tracing::debug!(url, "Fetching enclosure audio");
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    if bytes.len() > MAX_AUDIO_BYTES {
        return Err(FetchError::ResponseTooLarge);
    }
    Ok(bytes.to_vec())
}
