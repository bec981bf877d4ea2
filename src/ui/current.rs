//! Current-news card widget.
//!
//! Shows the selected episode: title, formatted date, category tag, the
//! play control state, like markers, and the description in either its
//! collapsed (300-char preview) or expanded (paragraph-per-line) form.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CATEGORY_TAG};
use crate::util::{
    clean_description, format_pub_date, truncate_chars, DESCRIPTION_PREVIEW_CHARS,
};

/// Render the current-news card.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(item) = app.current_item() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();

    // Title
    lines.push(Line::from(Span::styled(
        item.title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    // Meta: formatted date + fixed category tag
    lines.push(Line::from(vec![
        Span::styled(
            format_pub_date(&item.pub_date).into_owned(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(CATEGORY_TAG, Style::default().fg(Color::Magenta)),
    ]));

    // Controls: play state glyph plus any live like markers
    let (glyph, glyph_style) = if app.is_playing {
        ("⏸ playing", Style::default().fg(Color::Green))
    } else {
        ("▶ paused", Style::default().fg(Color::Gray))
    };
    let mut controls = vec![Span::styled(glyph, glyph_style)];
    let hearts = app.active_hearts();
    if hearts > 0 {
        controls.push(Span::raw("  "));
        controls.push(Span::styled(
            "❤".repeat(hearts),
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(controls));
    lines.push(Line::from(""));

    // Description: preview or full text, one paragraph per newline segment
    let description = clean_description(&item.description);
    if app.expanded {
        for segment in description.split('\n') {
            lines.push(Line::from(segment.to_string()));
        }
    } else {
        lines.push(Line::from(
            truncate_chars(&description, DESCRIPTION_PREVIEW_CHARS).into_owned(),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if app.expanded {
            "[e] collapse"
        } else {
            "[e] show all"
        },
        Style::default().fg(Color::Cyan),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Now Playing "));

    f.render_widget(paragraph, area);
}
