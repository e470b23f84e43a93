//! Paragraph wrapping.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;

/// Two or more newlines, allowing whitespace-only lines in between.
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

/// Wrap blank-line separated blocks in `<p>` tags.
///
/// Blocks are trimmed, empty blocks are dropped and the results are
/// concatenated without a separator.
///
/// # Examples
///
/// ```
/// use marklet_format::wrap_paragraphs;
///
/// assert_eq!(wrap_paragraphs("one\n\n\ntwo\nlines"), "<p>one</p><p>two\nlines</p>");
/// assert_eq!(wrap_paragraphs("\n\n"), "");
/// ```
#[must_use]
pub fn wrap_paragraphs(text: &str) -> String {
    wrap_with(text, |_| false)
}

/// Paragraph pass over the pipeline document.
///
/// Lines that start with a block-level element are emitted as they are; only
/// the runs of residual text between them are wrapped.
pub(crate) fn wrap_document(doc: &mut Document) {
    let wrapped = wrap_with(doc.text(), |line| doc.starts_with_block(line));
    doc.set_text(wrapped);
}

fn wrap_with(text: &str, is_block: impl Fn(&str) -> bool) -> String {
    let mut out = String::with_capacity(text.len() + 16);

    for block in BLANK_RUN_RE.split(text) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let mut pending: Vec<&str> = Vec::new();
        for line in block.split('\n') {
            if is_block(line) {
                flush(&mut out, &mut pending);
                out.push_str(line.trim());
            } else {
                pending.push(line);
            }
        }
        flush(&mut out, &mut pending);
    }

    out
}

fn flush(out: &mut String, pending: &mut Vec<&str>) {
    let paragraph = pending.join("\n");
    pending.clear();
    let paragraph = paragraph.trim();
    if !paragraph.is_empty() {
        out.push_str("<p>");
        out.push_str(paragraph);
        out.push_str("</p>");
    }
}
