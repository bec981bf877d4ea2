//! History list widget.
//!
//! Renders the first `display_count` episodes with title and formatted
//! date, flags the active one, and keeps the keyboard cursor inside the
//! window. The footer doubles as the load-more affordance, disabling
//! itself once every episode is visible.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::util::{format_pub_date, truncate_to_width};

/// Render the history list and its load-more footer.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_list(f, app, chunks[0]);
    render_footer(f, app, chunks[1]);
}

fn render_list(f: &mut Frame, app: &mut App, area: Rect) {
    let visible = app.visible_count();
    let rows = area.height.saturating_sub(2) as usize; // borders

    // Keep the cursor inside the scrolled window
    if app.cursor < app.history_offset {
        app.history_offset = app.cursor;
    } else if rows > 0 && app.cursor >= app.history_offset + rows {
        app.history_offset = app.cursor + 1 - rows;
    }

    let date_cols = 21; // "  2025-06-04 22:30:00"
    let title_width = area.width.saturating_sub(4 + date_cols as u16) as usize;

    let items: Vec<ListItem> = app
        .items()
        .iter()
        .enumerate()
        .take(visible)
        .skip(app.history_offset)
        .take(rows.max(1))
        .map(|(i, item)| {
            let is_active = i == app.current_index;
            let is_cursor = i == app.cursor;

            let marker = if is_active { "▸ " } else { "  " };
            let title_style = if is_cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if is_active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let title = truncate_to_width(&item.title, title_width).into_owned();
            let date = format_pub_date(&item.pub_date).into_owned();

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(title, title_style),
                Span::styled(format!("  {}", date), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let title = format!(" History ({}/{}) ", visible, app.items().len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}

/// The load-more affordance: enabled with a count while more episodes
/// remain, disabled and relabeled once everything is shown.
fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if app.can_load_more() {
        (
            format!(
                "[m] Load more ({} of {} shown)",
                app.visible_count(),
                app.items().len()
            ),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (
            "All episodes shown".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
