//! Background task event processing.
//!
//! Two kinds of events arrive here: the one-shot startup feed load and
//! per-episode enclosure downloads. Both are produced by spawned tasks and
//! consumed on the event-loop thread, which is the only place `App` mutates.

use tokio::sync::mpsc;

use crate::app::{App, AppEvent, FeedState};

/// Handle events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::FeedLoaded(result) => handle_feed_loaded(app, result, event_tx),
        AppEvent::AudioLoaded {
            index,
            generation,
            result,
        } => handle_audio_loaded(app, index, generation, result),
    }
}

/// Resolve the startup fetch: transition to `Loaded` and select the first
/// episode (prepared, not auto-played), or collapse every failure — network,
/// parse, or an empty item list — into the terminal error state.
fn handle_feed_loaded(
    app: &mut App,
    result: Result<crate::feed::Channel, crate::feed::FetchError>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match result {
        Ok(channel) if !channel.items.is_empty() => {
            app.feed = FeedState::Loaded(channel);
            app.select_item(0, false, event_tx);
        }
        Ok(_) => {
            tracing::warn!("Feed loaded but contains no items");
            app.feed = FeedState::Error;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Feed fetch failed");
            app.feed = FeedState::Error;
        }
    }
}

/// Attach downloaded enclosure bytes to the prepared track.
///
/// Stale results — an older generation, or an index the user has navigated
/// away from — are discarded; the download for the current selection is
/// either in flight or already attached.
fn handle_audio_loaded(
    app: &mut App,
    index: usize,
    generation: u64,
    result: Result<Vec<u8>, crate::feed::FetchError>,
) {
    if generation != app.audio_generation || index != app.current_index {
        tracing::debug!(
            index,
            generation,
            current = app.audio_generation,
            "Dropping stale audio load result"
        );
        return;
    }
    app.audio_load_handle = None;

    let bytes = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(index, error = %e, "Enclosure download failed");
            app.pending_autoplay = false;
            return;
        }
    };

    match app.player.attach(bytes) {
        Ok(true) => {
            if app.pending_autoplay {
                // The deferred half of autoplay: sound is attached, start it
                app.pending_autoplay = false;
                app.begin_playback();
            } else if app.is_playing {
                // User toggled play while the download was in flight
                app.player.play();
            }
        }
        Ok(false) => {
            app.pending_autoplay = false;
        }
        Err(e) => {
            tracing::warn!(index, error = %e, "Could not attach audio");
            app.pending_autoplay = false;
        }
    }
}
