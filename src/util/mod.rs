//! Utility functions for common operations.
//!
//! This module provides the pure text-processing helpers shared by the
//! renderer:
//!
//! - **Date formatting**: loose `pubDate` parsing with a raw-string fallback
//! - **Description cleanup**: trailer removal and `<br>` normalization
//! - **Truncation**: char-count preview truncation and Unicode-aware
//!   terminal-column truncation
//!
//! # Examples
//!
//! ```
//! use newscast::util::{clean_description, format_pub_date, truncate_chars};
//!
//! let cleaned = clean_description("Headline<br/>Body查看节目原文及链接footer");
//! assert_eq!(cleaned, "Headline\nBody");
//!
//! let date = format_pub_date("Wed, 04 Jun 2025 22:30:00 +0800");
//! assert_eq!(date, "2025-06-04 22:30:00");
//!
//! let preview = truncate_chars(&cleaned, 8);
//! assert_eq!(preview, "Headline...");
//! ```

mod text;

pub use text::{
    clean_description, display_width, format_pub_date, truncate_chars, truncate_to_width,
    DESCRIPTION_PREVIEW_CHARS, DESCRIPTION_TRAILER_MARKER,
};
