//! Render functions for the TUI.
//!
//! Dispatches on the feed state machine: a loading placeholder, the
//! terminal error view, or the full loaded layout (header, current-news
//! card, history list, status bar). Toasts overlay whatever is beneath.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, FeedState, FEED_ERROR_MESSAGE};

use super::{current, history, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Frames for the loading spinner animation.
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.feed {
        FeedState::Loading => render_loading(f, app),
        FeedState::Error => render_error(f),
        FeedState::Loaded(_) => render_loaded(f, app),
    }

    // Toasts sit on top of every view
    status::render_toasts(f, app);
}

/// Centered loading placeholder shown until the startup fetch resolves.
fn render_loading(f: &mut Frame, app: &App) {
    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let paragraph = Paragraph::new(format!("{} Loading feed...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));

    f.render_widget(paragraph, centered_line(f));
}

/// The terminal failure view: a fixed message and nothing else — no history
/// list, no retry affordance.
fn render_error(f: &mut Frame) {
    let paragraph = Paragraph::new(FEED_ERROR_MESSAGE)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    f.render_widget(paragraph, centered_line(f));
}

/// A one-line rect vertically centered in the frame.
fn centered_line(f: &Frame) -> ratatui::layout::Rect {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    chunks[1]
}

/// Full layout once the feed is loaded.
fn render_loaded(f: &mut Frame, app: &mut App) {
    // The card grows when the description is expanded
    let card_constraint = if app.expanded {
        Constraint::Percentage(60)
    } else {
        Constraint::Length(14)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            card_constraint,
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    current::render(f, app, chunks[1]);
    history::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);
}

/// Site header: the channel's own title, centered.
fn render_header(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let title = app.channel_title().unwrap_or("News");
    let paragraph = Paragraph::new(format!("\n{}", title))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(paragraph, area);
}
