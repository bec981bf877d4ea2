use std::borrow::Cow;

use chrono::DateTime;
use unicode_width::UnicodeWidthStr;

/// Marker that separates the episode body from the boilerplate trailer
/// appended to every description in the upstream feed.
pub const DESCRIPTION_TRAILER_MARKER: &str = "查看节目原文及链接";

/// Default character budget for the collapsed description block.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 300;

/// Formats an RSS `pubDate` string for display as `YYYY-MM-DD HH:mm:ss`.
///
/// Parsing is deliberately loose: RFC 2822 (the RSS convention) is tried
/// first, then RFC 3339. If neither parses, the original string is returned
/// unchanged — a bad date is a display quirk, never an error.
///
/// # Examples
///
/// ```
/// use newscast::util::format_pub_date;
///
/// assert_eq!(
///     format_pub_date("Wed, 04 Jun 2025 22:30:00 +0800"),
///     "2025-06-04 22:30:00"
/// );
/// assert_eq!(format_pub_date("not a date"), "not a date");
/// ```
pub fn format_pub_date(raw: &str) -> Cow<'_, str> {
    let parsed = DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw));

    match parsed {
        Ok(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        Err(_) => Cow::Borrowed(raw),
    }
}

/// Cleans an episode description for rendering.
///
/// Everything at and after [`DESCRIPTION_TRAILER_MARKER`] is discarded, the
/// remainder is whitespace-trimmed, and every `<br>` / `<br/>` / `<br />`
/// token (case-insensitive) becomes a literal newline. Empty input yields an
/// empty string.
pub fn clean_description(description: &str) -> String {
    let body = match description.find(DESCRIPTION_TRAILER_MARKER) {
        Some(idx) => &description[..idx],
        None => description,
    };
    replace_line_breaks(body.trim())
}

/// Replaces `<br>`-style tokens with `\n`.
///
/// A token is `<br`, optional ASCII whitespace, an optional `/`, then `>`,
/// matched case-insensitively. Anything else starting with `<` is copied
/// through untouched.
fn replace_line_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('<') {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        match line_break_token_len(tail) {
            Some(len) => {
                out.push('\n');
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns the byte length of a `<br ...>` token at the start of `s`, if any.
fn line_break_token_len(s: &str) -> Option<usize> {
    // Byte comparison: slicing the str would panic when `<` is followed by
    // a multibyte character
    let bytes = s.as_bytes();
    if bytes.len() < 4 || !bytes[..3].eq_ignore_ascii_case(b"<br") {
        return None;
    }

    let mut i = 3;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'>' {
        Some(i + 1)
    } else {
        None
    }
}

/// Truncates text to at most `max_chars` characters, appending `...` when
/// anything was cut.
///
/// Counts chars, not columns or words — a cut may fall mid-word, matching
/// the collapsed-description behavior of the page this player descends from.
/// Returns `Cow::Borrowed` when the text already fits.
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((byte_idx, _)) => Cow::Owned(format!("{}...", &text[..byte_idx])),
    }
}

/// Calculates the display width of a string in terminal columns.
///
/// CJK characters and emoji count as 2 columns, zero-width characters as 0.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Ellipsis used for column-aware truncation
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns, appending
/// `...` when truncation was needed.
///
/// Unicode-aware: CJK feed titles occupy two columns per character, so byte
/// or char counts would overflow the row. For widths of 3 columns or less
/// there is no room for the ellipsis and we return as many characters as fit.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(widest_prefix(s, max_width).to_string());
    }

    let kept = widest_prefix(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", kept, ELLIPSIS))
}

/// Longest prefix of `s` whose display width fits within `budget` columns.
///
/// Each candidate is measured with the string-level `UnicodeWidthStr`, not
/// a per-char sum: the two disagree on combining and control sequences, and
/// the string-level answer is the one the terminal check uses.
fn widest_prefix(s: &str, budget: usize) -> &str {
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let candidate = idx + c.len_utf8();
        if display_width(&s[..candidate]) > budget {
            break;
        }
        end = candidate;
    }
    &s[..end]
}
