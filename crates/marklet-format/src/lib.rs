//! Lightweight markup to HTML formatter.
//!
//! This crate converts chat and note text into an HTML fragment using one of
//! three [`FormatMode`]s:
//! - `markdown`: a fixed set of markdown-like constructs
//! - `code`: the whole input as one code block
//! - `text`: escaped text only
//!
//! # Architecture
//!
//! The markdown pipeline runs strictly forward over a single working buffer:
//!
//! 1. [`escape`] the input once (unless HTML is allowed)
//! 2. [`apply_rules`]: ordered passes for fenced code, blockquotes, headers,
//!    horizontal rules, bold, italic, strikethrough, inline code, images,
//!    links and tables, each gated by a [`Feature`]
//! 3. [`parse_lists`]: recursive nested list parsing
//! 4. [`wrap_paragraphs`]: blank-line separated text becomes `<p>` blocks
//!
//! Tags emitted by a pass are held out of the buffer behind placeholders until
//! the end, so later passes never re-match markup produced earlier.
//!
//! The formatter is total: every input produces output and malformed markup
//! degrades to literal escaped text.
//!
//! # Example
//!
//! ```
//! use marklet_format::{FormatMode, FormatOptions, format};
//!
//! let html = format("# Hello\n\n**Bold** text", FormatMode::Markdown, &FormatOptions::default());
//! assert_eq!(html, r#"<h1 id="hello">Hello</h1><p><strong>Bold</strong> text</p>"#);
//! ```

mod document;
mod escape;
mod formatter;
mod html;
mod lists;
mod options;
mod paragraph;
mod rules;
mod slug;
mod table;

pub use escape::{escape, unescape};
pub use formatter::{Formatter, format};
pub use lists::parse_lists;
pub use options::{Feature, Features, FormatMode, FormatOptions, UnknownFeature};
pub use paragraph::wrap_paragraphs;
pub use rules::apply_rules;
pub use slug::slugify;
