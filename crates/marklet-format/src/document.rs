//! Working buffer threaded through the markdown pipeline.
//!
//! Every tag a pass emits is moved out of the text into a fragment stash and
//! replaced by a placeholder token (`U+E000 index U+E001`). Later passes only
//! ever see placeholders, never tag names or attribute values, so they cannot
//! re-match markup produced earlier. Placeholders are expanded once, at the
//! very end of the pipeline.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// An emitted piece of HTML held out of the working text.
#[derive(Debug)]
struct Fragment {
    html: String,
    /// Markup the fragment replaced, used when flattening.
    source: String,
    /// Whether the fragment opens a block-level element.
    block: bool,
}

/// Text plus the fragments its placeholders refer to.
#[derive(Debug, Default)]
pub(crate) struct Document {
    text: String,
    fragments: Vec<Fragment>,
}

impl Document {
    /// Create a document from (already escaped) text.
    ///
    /// Normalizes line endings to `\n` and strips the placeholder sentinels.
    pub(crate) fn new(text: &str) -> Self {
        let text = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace([OPEN, CLOSE], "");
        Self {
            text,
            fragments: Vec::new(),
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Stash a block-level tag and return its placeholder.
    pub(crate) fn block(&mut self, html: impl Into<String>) -> String {
        self.push(Fragment {
            html: html.into(),
            source: String::new(),
            block: true,
        })
    }

    /// Stash an inline tag that replaced `source` and return its placeholder.
    pub(crate) fn inline(&mut self, html: impl Into<String>, source: impl Into<String>) -> String {
        self.push(Fragment {
            html: html.into(),
            source: source.into(),
            block: false,
        })
    }

    fn push(&mut self, fragment: Fragment) -> String {
        let index = self.fragments.len();
        self.fragments.push(fragment);
        format!("{OPEN}{index}{CLOSE}")
    }

    /// Replace every match of `re` in the text with the output of `replace`.
    ///
    /// The callback gets mutable access to the document so it can stash
    /// fragments while building its replacement.
    pub(crate) fn rewrite<F>(&mut self, re: &Regex, mut replace: F)
    where
        F: FnMut(&mut Self, &Captures<'_>) -> String,
    {
        let text = std::mem::take(&mut self.text);
        let rewritten = re.replace_all(&text, |caps: &Captures<'_>| replace(self, caps));
        self.text = rewritten.into_owned();
    }

    /// Check whether `line` starts with a block-level fragment.
    pub(crate) fn starts_with_block(&self, line: &str) -> bool {
        self.leading_fragment(line.trim_start())
            .is_some_and(|fragment| fragment.block)
    }

    fn leading_fragment(&self, text: &str) -> Option<&Fragment> {
        let rest = text.strip_prefix(OPEN)?;
        let end = rest.find(CLOSE)?;
        let index: usize = rest[..end].parse().ok()?;
        self.fragments.get(index)
    }

    /// Turn placeholders in `text` back into the markup they replaced.
    ///
    /// Used for attribute values and code spans, which must stay literal.
    pub(crate) fn flatten<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(OPEN) {
            return Cow::Borrowed(text);
        }
        PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| {
            self.lookup(caps)
                .map_or_else(String::new, |fragment| fragment.source.clone())
        })
    }

    /// Expand every placeholder and return the final HTML.
    pub(crate) fn into_html(self) -> String {
        if self.fragments.is_empty() {
            return self.text;
        }
        PLACEHOLDER_RE
            .replace_all(&self.text, |caps: &Captures<'_>| {
                self.lookup(caps)
                    .map_or_else(String::new, |fragment| fragment.html.clone())
            })
            .into_owned()
    }

    fn lookup(&self, caps: &Captures<'_>) -> Option<&Fragment> {
        let index: usize = caps[1].parse().ok()?;
        self.fragments.get(index)
    }
}
