use std::borrow::Cow;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

use crate::feed::{fetch_audio, Channel, FetchError, Item};
use crate::player::Player;

/// History entries revealed per "load more" press, and the initial count.
pub const DISPLAY_STEP: usize = 10;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_millis(2000);

/// How long a like marker stays on screen.
pub const HEART_TTL: Duration = Duration::from_millis(800);

/// Tagline appended to shared episode titles.
pub const SHARE_TAGLINE: &str = "每天10分钟，畅晓天下事！";

/// Deep link base for the share action; the episode index rides in `?id=`.
pub const DEEP_LINK_BASE: &str = "https://news.k12go.com/";

/// Fixed category tag shown on the current-news card.
pub const CATEGORY_TAG: &str = "#高考新闻";

/// Fixed message for the terminal fetch-failure state.
pub const FEED_ERROR_MESSAGE: &str = "Failed to load the news feed. Please try again later.";

// ============================================================================
// Feed State Machine
// ============================================================================

/// Lifecycle of the single feed load: loading at startup, then either a
/// terminal error or the loaded channel for the rest of the session.
pub enum FeedState {
    Loading,
    /// Terminal — no retry affordance is offered.
    Error,
    Loaded(Channel),
}

// ============================================================================
// Background Events
// ============================================================================

/// Events from background tasks, delivered over the app's mpsc channel.
pub enum AppEvent {
    /// The startup fetch finished, one way or the other.
    FeedLoaded(Result<Channel, FetchError>),
    /// An enclosure download finished.
    ///
    /// `generation` is compared against the app's counter so a slow download
    /// for an episode the user has already navigated away from is dropped
    /// instead of attaching to the wrong track.
    AudioLoaded {
        index: usize,
        generation: u64,
        result: Result<Vec<u8>, FetchError>,
    },
}

/// A transient notification. Several may coexist; each expires on its own.
pub struct Toast {
    pub message: Cow<'static, str>,
    pub created: Instant,
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state: the controller that owns the feed, the
/// playback handle, and every piece of UI state the renderer reads.
pub struct App {
    pub http_client: reqwest::Client,

    /// Feed lifecycle; all item access goes through [`App::items`].
    pub feed: FeedState,

    /// Index of the episode loaded into the current-news card.
    /// Always a valid index into the item list once the feed is loaded.
    pub current_index: usize,
    /// History-list cursor (keyboard navigation target).
    pub cursor: usize,
    /// First visible history row; reset to the top on selection.
    pub history_offset: usize,
    /// How many history entries are revealed. Monotonically non-decreasing;
    /// rendering clamps it to the item count.
    pub display_count: usize,

    /// Play/pause flag mirrored by the ▶/⏸ glyph.
    pub is_playing: bool,
    /// Whether the description shows the full text or the 300-char preview.
    pub expanded: bool,

    /// The single owned audio handle.
    pub player: Player,
    /// Autoplay request outstanding for the track being downloaded.
    pub pending_autoplay: bool,
    /// Generation counter for enclosure downloads; stale results are dropped.
    pub audio_generation: u64,
    /// Handle to the in-flight enclosure download, aborted on re-selection.
    pub audio_load_handle: Option<tokio::task::JoinHandle<()>>,

    /// Live toasts, pruned by the tick handler.
    pub toasts: Vec<Toast>,
    /// Like markers: spawn times, pruned after [`HEART_TTL`].
    pub hearts: Vec<Instant>,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(player: Player) -> Result<Self> {
        // One client for the feed fetch and enclosure downloads
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            feed: FeedState::Loading,
            current_index: 0,
            cursor: 0,
            history_offset: 0,
            display_count: DISPLAY_STEP,
            is_playing: false,
            expanded: false,
            player,
            pending_autoplay: false,
            audio_generation: 0,
            audio_load_handle: None,
            toasts: Vec::new(),
            hearts: Vec::new(),
            spinner_frame: 0,
            needs_redraw: true,
        })
    }

    // ------------------------------------------------------------------
    // Feed access
    // ------------------------------------------------------------------

    /// All items of the loaded feed, or an empty slice before/without one.
    pub fn items(&self) -> &[Item] {
        match &self.feed {
            FeedState::Loaded(channel) => &channel.items,
            _ => &[],
        }
    }

    /// Channel title for the header, when loaded.
    pub fn channel_title(&self) -> Option<&str> {
        match &self.feed {
            FeedState::Loaded(channel) => Some(channel.title.as_str()),
            _ => None,
        }
    }

    /// The episode currently loaded into the current-news card.
    pub fn current_item(&self) -> Option<&Item> {
        self.items().get(self.current_index)
    }

    /// Number of history rows to render: `display_count` clamped to the
    /// item count.
    pub fn visible_count(&self) -> usize {
        self.display_count.min(self.items().len())
    }

    /// Whether the load-more affordance is still enabled.
    pub fn can_load_more(&self) -> bool {
        self.display_count < self.items().len()
    }

    // ------------------------------------------------------------------
    // Selection and playback
    // ------------------------------------------------------------------

    /// Selects episode `index`: tears down the previous audio handle,
    /// prepares a new one bound to the episode's enclosure URL, resets the
    /// play control to paused, and scrolls the history viewport to the top.
    ///
    /// With `autoplay`, playback begins as soon as the enclosure download
    /// attaches — an explicit async sequence, not a delayed synthetic
    /// press of the play control.
    pub fn select_item(&mut self, index: usize, autoplay: bool, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(item) = self.items().get(index) else {
            tracing::warn!(index, len = self.items().len(), "Selection out of range");
            return;
        };
        let enclosure_url = item.enclosure_url().map(str::to_string);

        self.history_offset = 0;
        self.current_index = index;
        self.cursor = index;
        self.is_playing = false;
        self.pending_autoplay = autoplay;

        match enclosure_url {
            Some(url) => {
                self.player.prepare(&url);
                self.spawn_audio_load(index, url, event_tx);
            }
            None => {
                tracing::warn!(index, "Episode has no enclosure; nothing to play");
                self.player.clear();
                self.pending_autoplay = false;
            }
        }
    }

    /// Spawns the enclosure download for the prepared track.
    ///
    /// Any previous download is aborted and its generation invalidated, so
    /// at most one result can ever attach.
    fn spawn_audio_load(&mut self, index: usize, url: String, event_tx: &mpsc::Sender<AppEvent>) {
        if let Some(handle) = self.audio_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted previous enclosure download");
        }

        self.audio_generation = self.audio_generation.wrapping_add(1);
        let generation = self.audio_generation;

        if self.player.is_muted() {
            // UI-only mode: the track stays prepared-but-silent
            self.pending_autoplay = false;
            return;
        }

        let client = self.http_client.clone();
        let tx = event_tx.clone();

        self.audio_load_handle = Some(tokio::spawn(async move {
            let result = fetch_audio(&client, &url).await;
            let event = AppEvent::AudioLoaded {
                index,
                generation,
                result,
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Failed to deliver audio bytes (receiver dropped)");
            }
        }));
    }

    /// Flips the play/pause flag and drives the audio handle accordingly.
    /// Harmless before the sound attaches; the flag is honored on attach.
    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
        if self.is_playing {
            self.player.play();
        } else {
            self.player.pause();
        }
    }

    /// Starts playback directly, used when a deferred autoplay resolves.
    pub fn begin_playback(&mut self) {
        self.is_playing = true;
        self.player.play();
    }

    // ------------------------------------------------------------------
    // History list
    // ------------------------------------------------------------------

    /// Reveals another [`DISPLAY_STEP`] history entries. Does nothing once
    /// everything is shown — `display_count` never decreases.
    pub fn load_more(&mut self) {
        if self.can_load_more() {
            self.display_count += DISPLAY_STEP;
        }
    }

    /// Move the history cursor up one row.
    pub fn nav_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the history cursor down one row, bounded by the visible window.
    pub fn nav_down(&mut self) {
        if self.visible_count() > 0 {
            self.cursor = (self.cursor + 1).min(self.visible_count() - 1);
        }
    }

    // ------------------------------------------------------------------
    // Card affordances
    // ------------------------------------------------------------------

    /// Toggle between the truncated and full description rendering.
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Spawns a transient heart marker. Rapid presses stack.
    pub fn like(&mut self) {
        self.hearts.push(Instant::now());
    }

    /// Hearts still within their display window.
    pub fn active_hearts(&self) -> usize {
        self.hearts
            .iter()
            .filter(|h| h.elapsed() < HEART_TTL)
            .count()
    }

    /// Composes the share message for the current episode and copies it to
    /// the clipboard. Copy failures are logged, never surfaced.
    pub fn share(&mut self) {
        let Some(item) = self.current_item() else {
            return;
        };
        let payload = format!(
            "{} - {}\n{}?id={}",
            item.title, SHARE_TAGLINE, DEEP_LINK_BASE, self.current_index
        );

        #[cfg(feature = "clipboard-support")]
        {
            use clipboard::{ClipboardContext, ClipboardProvider};
            let result: Result<(), String> = (|| {
                let mut ctx: ClipboardContext =
                    ClipboardProvider::new().map_err(|e| e.to_string())?;
                ctx.set_contents(payload).map_err(|e| e.to_string())
            })();
            match result {
                Ok(()) => self.toast("Share link copied to clipboard"),
                Err(e) => tracing::warn!(error = %e, "Clipboard copy failed"),
            }
        }
        #[cfg(not(feature = "clipboard-support"))]
        {
            tracing::info!(share = %payload, "Clipboard support disabled; share payload logged");
            self.toast("Sharing is unavailable in this build");
        }
    }

    /// The subscription service does not exist yet; say so.
    pub fn subscribe(&mut self) {
        self.toast("Subscriptions are not available yet — stay tuned");
    }

    // ------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------

    /// Queue a transient notification. Toasts stack rather than replace.
    pub fn toast(&mut self, message: impl Into<Cow<'static, str>>) {
        self.toasts.push(Toast {
            message: message.into(),
            created: Instant::now(),
        });
    }

    /// Drops expired toasts and hearts. Returns true when anything was
    /// removed so the caller can schedule a redraw.
    pub fn prune_transients(&mut self) -> bool {
        let before = self.toasts.len() + self.hearts.len();
        self.toasts.retain(|t| t.created.elapsed() < TOAST_TTL);
        self.hearts.retain(|h| h.elapsed() < HEART_TTL);
        before != self.toasts.len() + self.hearts.len()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.audio_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted enclosure download on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::parse_channel;
    use pretty_assertions::assert_eq;
    use tokio::time;

    fn test_channel(items: usize) -> Channel {
        let body: String = (0..items)
            .map(|i| {
                format!(
                    "<item><title>Item {i}</title>\
                     <pubDate>Wed, 04 Jun 2025 22:30:00 +0800</pubDate>\
                     <description>Body {i}</description>\
                     <enclosure url=\"https://cdn.example.com/ep{i}.mp3\" type=\"audio/mpeg\"/>\
                     </item>"
                )
            })
            .collect();
        let xml = format!("<rss><channel><title>测试频道</title>{body}</channel></rss>");
        parse_channel(&xml).unwrap()
    }

    fn loaded_app(items: usize) -> App {
        let mut app = App::new(Player::new(None)).unwrap();
        app.feed = FeedState::Loaded(test_channel(items));
        app
    }

    fn event_channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
        mpsc::channel(8)
    }

    // Display window

    #[tokio::test]
    async fn test_initial_window_shows_ten_of_twenty_five() {
        let app = loaded_app(25);
        assert_eq!(app.visible_count(), 10);
        assert!(app.can_load_more());
    }

    #[tokio::test]
    async fn test_load_more_reveals_in_steps_and_disables() {
        let mut app = loaded_app(25);

        app.load_more();
        assert_eq!(app.visible_count(), 20);
        assert!(app.can_load_more());

        app.load_more();
        assert_eq!(app.visible_count(), 25);
        assert!(!app.can_load_more());

        // Disabled: further presses change nothing
        let count = app.display_count;
        app.load_more();
        assert_eq!(app.display_count, count);
    }

    #[tokio::test]
    async fn test_visible_count_clamped_for_short_feeds() {
        let app = loaded_app(3);
        assert_eq!(app.visible_count(), 3);
        assert!(!app.can_load_more());
    }

    #[tokio::test]
    async fn test_display_count_never_decreases() {
        let mut app = loaded_app(25);
        let mut last = app.display_count;
        for _ in 0..5 {
            app.load_more();
            assert!(app.display_count >= last);
            last = app.display_count;
        }
    }

    // Selection

    #[tokio::test]
    async fn test_select_binds_exactly_one_track_to_item() {
        let mut app = loaded_app(5);
        let (tx, _rx) = event_channel();

        app.select_item(2, false, &tx);
        assert_eq!(app.current_index, 2);
        assert_eq!(
            app.player.current_url(),
            Some("https://cdn.example.com/ep2.mp3")
        );

        // Re-selecting replaces the handle; only the new URL remains
        app.select_item(4, false, &tx);
        assert_eq!(
            app.player.current_url(),
            Some("https://cdn.example.com/ep4.mp3")
        );
    }

    #[tokio::test]
    async fn test_select_resets_play_state_and_viewport() {
        let mut app = loaded_app(5);
        let (tx, _rx) = event_channel();

        app.is_playing = true;
        app.history_offset = 3;
        app.select_item(1, false, &tx);

        assert!(!app.is_playing);
        assert_eq!(app.history_offset, 0);
        assert_eq!(app.cursor, 1);
    }

    #[tokio::test]
    async fn test_select_out_of_range_is_ignored() {
        let mut app = loaded_app(3);
        let (tx, _rx) = event_channel();

        app.select_item(99, true, &tx);
        assert_eq!(app.current_index, 0);
        assert!(!app.pending_autoplay);
    }

    #[tokio::test]
    async fn test_muted_select_clears_autoplay() {
        // No output device: the download is skipped, so autoplay can never fire
        let mut app = loaded_app(3);
        let (tx, _rx) = event_channel();

        app.select_item(1, true, &tx);
        assert!(!app.pending_autoplay);
        assert!(app.audio_load_handle.is_none());
    }

    // Playback toggle

    #[tokio::test]
    async fn test_toggle_play_flips_flag() {
        let mut app = loaded_app(1);
        assert!(!app.is_playing);
        app.toggle_play();
        assert!(app.is_playing);
        app.toggle_play();
        assert!(!app.is_playing);
    }

    // Navigation

    #[tokio::test]
    async fn test_cursor_bounded_by_visible_window() {
        let mut app = loaded_app(25);
        for _ in 0..30 {
            app.nav_down();
        }
        // Only 10 rows are visible; the cursor stops at the last one
        assert_eq!(app.cursor, 9);

        app.nav_up();
        assert_eq!(app.cursor, 8);
    }

    #[tokio::test]
    async fn test_nav_up_saturates_at_zero() {
        let mut app = loaded_app(5);
        app.nav_up();
        assert_eq!(app.cursor, 0);
    }

    // Transients

    #[tokio::test]
    async fn test_toast_expires_after_ttl() {
        let mut app = loaded_app(1);
        time::pause();

        app.toast("hello");
        assert_eq!(app.toasts.len(), 1);

        time::advance(Duration::from_millis(1999)).await;
        app.prune_transients();
        assert_eq!(app.toasts.len(), 1);

        time::advance(Duration::from_millis(2)).await;
        assert!(app.prune_transients());
        assert!(app.toasts.is_empty());
    }

    #[tokio::test]
    async fn test_toasts_coexist() {
        let mut app = loaded_app(1);
        app.subscribe();
        app.subscribe();
        assert_eq!(app.toasts.len(), 2);
    }

    #[tokio::test]
    async fn test_hearts_stack_and_expire() {
        let mut app = loaded_app(1);
        time::pause();

        app.like();
        app.like();
        app.like();
        assert_eq!(app.active_hearts(), 3);

        time::advance(Duration::from_millis(801)).await;
        assert_eq!(app.active_hearts(), 0);
        assert!(app.prune_transients());
    }

    #[tokio::test]
    async fn test_expand_toggle() {
        let mut app = loaded_app(1);
        assert!(!app.expanded);
        app.toggle_expanded();
        assert!(app.expanded);
        app.toggle_expanded();
        assert!(!app.expanded);
    }
}
