//! Input handling for the TUI.
//!
//! Keyboard events map directly onto controller operations. In the loading
//! and error states only quit is honored; the error state is terminal by
//! design, so there is no retry key.

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, FeedState};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Ctrl+C quits from any state
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.feed {
        FeedState::Loading | FeedState::Error => match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::Continue,
        },
        FeedState::Loaded(_) => handle_loaded_input(app, code, event_tx),
    }
}

fn handle_loaded_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,

        // History navigation
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),

        // Explicit selection always requests autoplay
        KeyCode::Enter => app.select_item(app.cursor, true, event_tx),

        // Playback
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play(),

        // Card affordances
        KeyCode::Char('e') => app.toggle_expanded(),
        KeyCode::Char('l') => app.like(),
        KeyCode::Char('s') => app.share(),
        KeyCode::Char('u') => app.subscribe(),

        // Load more history
        KeyCode::Char('m') => app.load_more(),

        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DISPLAY_STEP;
    use crate::feed::parse_channel;
    use crate::player::Player;

    fn loaded_app(items: usize) -> App {
        let body: String = (0..items)
            .map(|i| {
                format!(
                    "<item><title>t{i}</title>\
                     <enclosure url=\"https://cdn.example.com/{i}.mp3\"/></item>"
                )
            })
            .collect();
        let channel = parse_channel(&format!(
            "<rss><channel><title>c</title>{body}</channel></rss>"
        ))
        .unwrap();

        let mut app = App::new(Player::new(None)).unwrap();
        app.feed = FeedState::Loaded(channel);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        let (tx, _rx) = mpsc::channel(8);
        handle_input(app, code, KeyModifiers::NONE, &tx)
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = loaded_app(3);
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Quit));
        assert!(matches!(press(&mut app, KeyCode::Esc), Action::Quit));
    }

    #[tokio::test]
    async fn test_quit_from_error_state() {
        let mut app = App::new(Player::new(None)).unwrap();
        app.feed = FeedState::Error;
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Quit));
        // Everything else is ignored in the terminal error state
        assert!(matches!(
            press(&mut app, KeyCode::Char('m')),
            Action::Continue
        ));
    }

    #[tokio::test]
    async fn test_enter_selects_cursor_item_with_autoplay() {
        let mut app = loaded_app(5);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.current_index, 2);
        // Muted test player: download is skipped, so the request resolves
        assert!(!app.pending_autoplay);
        assert_eq!(
            app.player.current_url(),
            Some("https://cdn.example.com/2.mp3")
        );
    }

    #[tokio::test]
    async fn test_m_loads_more() {
        let mut app = loaded_app(25);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.display_count, DISPLAY_STEP * 2);
    }

    #[tokio::test]
    async fn test_space_toggles_playback() {
        let mut app = loaded_app(1);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.is_playing);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.is_playing);
    }

    #[tokio::test]
    async fn test_like_spawns_heart() {
        let mut app = loaded_app(1);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.active_hearts(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_toasts() {
        let mut app = loaded_app(1);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.toasts.len(), 1);
    }
}
