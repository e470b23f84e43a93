//! Nested list parsing.
//!
//! Recursive descent over lines keyed on indentation width. Each call handles
//! one indentation level and returns the HTML it produced together with the
//! index of the first line it did not consume.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([-*+]|\d+\.)\s+(.+)$").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

/// A line matching the list item pattern.
#[derive(Debug)]
struct Item<'a> {
    indent: usize,
    kind: ListKind,
    content: &'a str,
}

impl<'a> Item<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = ITEM_RE.captures(line)?;
        let marker = caps.get(2)?.as_str();
        Some(Self {
            indent: caps.get(1)?.as_str().chars().count(),
            kind: if marker.ends_with('.') {
                ListKind::Ordered
            } else {
                ListKind::Unordered
            },
            content: caps.get(3)?.as_str().trim(),
        })
    }
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Recursive list parser.
///
/// `emit` turns a structural tag into the text written to the output, which
/// lets the pipeline stash tags while [`parse_lists`] writes them verbatim.
struct ListParser<'a, F> {
    lines: &'a [&'a str],
    emit: F,
}

impl<'a, F> ListParser<'a, F>
where
    F: FnMut(&'static str) -> String,
{
    fn new(lines: &'a [&'a str], emit: F) -> Self {
        Self { lines, emit }
    }

    /// Parse the list starting at `index` whose items sit at `level`.
    fn parse(&mut self, mut index: usize, level: usize) -> (String, usize) {
        let lines = self.lines;
        let mut out = String::new();
        let mut open: Option<ListKind> = None;

        while let Some(item) = lines.get(index).and_then(|line| Item::parse(line)) {
            if item.indent > level {
                let (nested, next) = self.parse(index, item.indent);
                out.push_str(&nested);
                index = next;
                continue;
            }
            if item.indent < level {
                break;
            }

            if open != Some(item.kind) {
                if let Some(kind) = open {
                    out.push_str(&(self.emit)(kind.close_tag()));
                }
                out.push_str(&(self.emit)(item.kind.open_tag()));
                open = Some(item.kind);
            }

            out.push_str(&(self.emit)("<li>"));
            out.push_str(item.content);
            index += 1;

            // Every deeper run nests in this item, even when a later run
            // sits between this level and an earlier nested one.
            while let Some(next_line) = lines.get(index) {
                let next_indent = indent_width(next_line);
                if next_indent <= item.indent {
                    break;
                }
                let (nested, next) = self.parse(index, next_indent);
                if next == index {
                    break;
                }
                out.push_str(&nested);
                index = next;
            }
            out.push_str(&(self.emit)("</li>"));
        }

        if let Some(kind) = open {
            out.push_str(&(self.emit)(kind.close_tag()));
        }
        (out, index)
    }

    /// Replace every run of list lines, passing other lines through.
    fn render(&mut self) -> (Vec<String>, usize) {
        let lines = self.lines;
        let mut out = Vec::with_capacity(lines.len());
        let mut lists = 0;

        let mut index = 0;
        while index < lines.len() {
            if Item::parse(lines[index]).is_some() {
                let (html, next) = self.parse(index, 0);
                if next > index {
                    out.push(html);
                    index = next;
                    lists += 1;
                    continue;
                }
            }
            out.push(lines[index].to_owned());
            index += 1;
        }
        (out, lists)
    }
}

/// Convert list lines to nested `<ul>`/`<ol>` HTML.
///
/// Items at the same indentation form one list; a deeper-indented line nests
/// inside the preceding item. Switching between bullet (`-`, `*`, `+`) and
/// numbered (`1.`) markers at the same level closes the list and opens a new
/// one. Lines that are not list items are kept unchanged and in order.
///
/// # Examples
///
/// ```
/// use marklet_format::parse_lists;
///
/// assert_eq!(
///     parse_lists("- a\n  - b\n- c"),
///     "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"
/// );
/// assert_eq!(parse_lists("no lists here"), "no lists here");
/// ```
#[must_use]
pub fn parse_lists(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let (out, lists) = ListParser::new(&lines, str::to_owned).render();
    if lists == 0 {
        return text.to_owned();
    }
    out.join("\n")
}

/// List pass over the pipeline document, stashing every list tag.
pub(crate) fn render_lists(doc: &mut Document) {
    let text = doc.text().to_owned();
    let lines: Vec<&str> = text.split('\n').collect();
    let (out, lists) = ListParser::new(&lines, |tag| doc.block(tag)).render();
    if lists > 0 {
        tracing::trace!(lists, "Rendered lists");
        doc.set_text(out.join("\n"));
    }
}
