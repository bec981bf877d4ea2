//! Status bar and toast overlay widgets.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::util::display_width;

/// Render the status bar with keybinding hints.
pub(super) fn render(f: &mut Frame, _app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let hints = "[Space]play/pause [j/k]move [Enter]select [e]expand [m]more [l]ike [s]hare [u]subscribe [q]uit";

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(hints).style(style), area);
}

/// Render live toasts stacked in the bottom-right corner, newest at the
/// bottom. Each toast keeps its own expiry; several may be visible at once.
pub(super) fn render_toasts(f: &mut Frame, app: &App) {
    if app.toasts.is_empty() {
        return;
    }

    let area = f.area();
    let mut y = area.bottom().saturating_sub(2);

    for toast in app.toasts.iter().rev() {
        if y <= area.top() {
            break;
        }
        let width = (display_width(&toast.message) as u16 + 2).min(area.width);
        let x = area.right().saturating_sub(width + 1);
        let rect = Rect::new(x, y, width, 1);

        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(format!(" {} ", toast.message))
                .style(Style::default().bg(Color::Blue).fg(Color::White)),
            rect,
        );
        y = y.saturating_sub(1);
    }
}
