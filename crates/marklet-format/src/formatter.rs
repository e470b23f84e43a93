//! Mode dispatch and the markdown pipeline.

use crate::document::Document;
use crate::escape::escape;
use crate::html;
use crate::lists;
use crate::options::{Feature, Features, FormatMode, FormatOptions};
use crate::paragraph;
use crate::rules::Rules;

/// Format `text` as HTML.
///
/// - [`FormatMode::Markdown`]: escape, run the rule passes, parse lists,
///   wrap paragraphs. Fenced code content is escaped a second time.
/// - [`FormatMode::Code`]: escape and wrap in a `<pre><code>` block with the
///   configured language class.
/// - [`FormatMode::PlainText`]: escape only.
///
/// `allow_html` only affects markdown; the code and plain text modes always
/// escape.
///
/// Never fails: malformed markup degrades to literal escaped text.
///
/// # Examples
///
/// ```
/// use marklet_format::{FormatMode, FormatOptions, format};
///
/// let options = FormatOptions::default().with_language("js");
/// assert_eq!(
///     format("a<b>", FormatMode::Code, &options),
///     r#"<pre><code class="language-js">a&lt;b&gt;</code></pre>"#
/// );
/// ```
#[must_use]
pub fn format(text: &str, mode: FormatMode, options: &FormatOptions) -> String {
    tracing::debug!(%mode, input_len = text.len(), "Formatting text");
    match mode {
        FormatMode::Markdown => format_markdown(text, options),
        FormatMode::Code => format_code(text, options),
        FormatMode::PlainText => escape(text, false).into_owned(),
    }
}

fn format_markdown(text: &str, options: &FormatOptions) -> String {
    let features = options.supported_formats;
    let escaped = escape(text, options.allow_html);
    let mut doc = Document::new(&escaped);

    Rules::new(features, options.header_ids, options.allow_html).apply(&mut doc);
    if features.contains(Feature::Lists) {
        lists::render_lists(&mut doc);
    }
    paragraph::wrap_document(&mut doc);

    tracing::debug!(fragments = doc.fragment_count(), "Rendered markdown");
    doc.into_html()
}

fn format_code(text: &str, options: &FormatOptions) -> String {
    html::code_block(Some(&options.language), &escape(text, false))
}

/// Reusable formatter bound to a mode and options.
///
/// # Example
///
/// ```
/// use marklet_format::{Feature, Features, FormatMode, Formatter};
///
/// let formatter = Formatter::new(FormatMode::Markdown)
///     .with_features(Features::none().with(Feature::Bold));
/// assert_eq!(formatter.format("**hi**"), "<p><strong>hi</strong></p>");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    mode: FormatMode,
    options: FormatOptions,
}

impl Formatter {
    /// Create a formatter for `mode` with default options.
    #[must_use]
    pub fn new(mode: FormatMode) -> Self {
        Self {
            mode,
            options: FormatOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict the enabled markdown features.
    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.options.supported_formats = features;
        self
    }

    #[must_use]
    pub fn mode(&self) -> FormatMode {
        self.mode
    }

    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format `text` with the configured mode and options.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        format(text, self.mode, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn markdown(text: &str) -> String {
        format(text, FormatMode::Markdown, &FormatOptions::default())
    }

    fn balanced(html: &str, tags: &[&str]) -> bool {
        tags.iter().all(|tag| {
            html.matches(&format!("<{tag}>")).count() == html.matches(&format!("</{tag}>")).count()
        })
    }

    #[test]
    fn test_escapes_exactly_once() {
        assert_eq!(markdown("<b>&amp;</b>"), "<p>&lt;b&gt;&amp;amp;&lt;/b&gt;</p>");
    }

    #[test]
    fn test_plain_text_mode_escapes_only() {
        assert_eq!(
            format("**a** <i>", FormatMode::PlainText, &FormatOptions::default()),
            "**a** &lt;i&gt;"
        );
    }

    #[test]
    fn test_unknown_mode_name_falls_back_to_text() {
        let mode = FormatMode::from_name("wiki");
        assert_eq!(
            format("# a", mode, &FormatOptions::default()),
            "# a"
        );
    }

    #[test]
    fn test_code_mode() {
        let options = FormatOptions::default().with_language("js");
        assert_eq!(
            format("a<b>", FormatMode::Code, &options),
            r#"<pre><code class="language-js">a&lt;b&gt;</code></pre>"#
        );
    }

    #[test]
    fn test_code_mode_without_language() {
        assert_eq!(
            format("x && y", FormatMode::Code, &FormatOptions::default()),
            "<pre><code>x &amp;&amp; y</code></pre>"
        );
    }

    #[test]
    fn test_code_mode_escapes_even_with_allow_html() {
        let options = FormatOptions::default().with_allow_html(true);
        assert_eq!(
            format("<b>", FormatMode::Code, &options),
            "<pre><code>&lt;b&gt;</code></pre>"
        );
    }

    #[test]
    fn test_plain_text_mode_escapes_even_with_allow_html() {
        let options = FormatOptions::default().with_allow_html(true);
        assert_eq!(
            format("<script>x</script>", FormatMode::PlainText, &options),
            "&lt;script&gt;x&lt;/script&gt;"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(markdown(""), "");
        assert_eq!(format("", FormatMode::Code, &FormatOptions::default()), "<pre><code></code></pre>");
        assert_eq!(format("", FormatMode::PlainText, &FormatOptions::default()), "");
    }

    #[test]
    fn test_malformed_input_degrades_to_text() {
        assert_eq!(markdown("**bold"), "<p>**bold</p>");
        assert_eq!(markdown("```rust\nfn x"), "<p>```rust\nfn x</p>");
        assert_eq!(markdown("[label](unclosed"), "<p>[label](unclosed</p>");
        assert_eq!(markdown("~~"), "<p>~~</p>");
        assert_eq!(markdown("|"), "<p>|</p>");
    }

    #[test]
    fn test_disabled_feature_stays_literal_and_escaped() {
        let options = FormatOptions::default().with_features(Features::none().with(Feature::Headers));
        let html = format("**x** <y>", FormatMode::Markdown, &options);
        assert_eq!(html, "<p>**x** &lt;y&gt;</p>");
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn test_headers_are_not_wrapped_in_paragraphs() {
        assert_eq!(
            markdown("# Title\n\nBody text."),
            r#"<h1 id="title">Title</h1><p>Body text.</p>"#
        );
    }

    #[test]
    fn test_nested_list_document() {
        let html = markdown("- a\n  - b\n- c");
        assert_eq!(html, "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
    }

    #[test]
    fn test_marker_change_document() {
        let html = markdown("- a\n1. b");
        assert!(html.contains("</ul><ol>"));
        assert!(balanced(&html, &["ul", "ol", "li"]));
    }

    #[test]
    fn test_table_document() {
        let html = markdown("|a|b|\n|1|2|");
        assert_eq!(html.matches("<thead>").count(), 1);
        assert_eq!(html.matches("<th>").count(), 2);
        assert_eq!(html.matches("<tbody>").count(), 1);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 2);
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_blockquote_from_escaped_input() {
        assert_eq!(markdown("> wise words"), "<blockquote>wise words</blockquote>");
    }

    #[test]
    fn test_fenced_code_is_escaped_twice() {
        assert_eq!(
            markdown("```\n<b>&amp;\n```"),
            "<pre><code>&amp;lt;b&amp;gt;&amp;amp;amp;\n</code></pre>"
        );
    }

    #[test]
    fn test_fenced_code_with_blank_lines_stays_one_block() {
        assert_eq!(
            markdown("```\na\n\nb\n```"),
            "<pre><code>a\n\nb\n</code></pre>"
        );
    }

    #[test]
    fn test_fenced_code_escaped_when_html_allowed() {
        let options = FormatOptions::default().with_allow_html(true);
        assert_eq!(
            format("<div>\n\n```\n<b>\n```", FormatMode::Markdown, &options),
            "<p><div></p><pre><code>&lt;b&gt;\n</code></pre>"
        );
    }

    #[test]
    fn test_allow_html_passes_markup_through() {
        let options = FormatOptions::default().with_allow_html(true);
        assert_eq!(
            format("<span>**x**</span>", FormatMode::Markdown, &options),
            "<p><span><strong>x</strong></span></p>"
        );
    }

    #[test]
    fn test_quotes_in_link_url_stay_inside_attribute() {
        assert_eq!(
            markdown(r#"[x](a"onmouseover="b)"#),
            r#"<p><a href="a&quot;onmouseover=&quot;b">x</a></p>"#
        );
    }

    #[test]
    fn test_kitchen_sink() {
        let source = "\
# Release Notes

Some **bold**, *italic*, ~~old~~ and `code`.

- first
- second
  1. nested

> quoted

---

|Name|Value|
|----|----:|
|a|1|

```rust
let x = 1;
```";
        let html = markdown(source);
        assert_eq!(
            html,
            "<h1 id=\"release-notes\">Release Notes</h1>\
             <p>Some <strong>bold</strong>, <em>italic</em>, <del>old</del> and <code>code</code>.</p>\
             <ul><li>first</li><li>second<ol><li>nested</li></ol></li></ul>\
             <blockquote>quoted</blockquote>\
             <hr>\
             <table><thead><tr><th>Name</th><th style=\"text-align:right\">Value</th></tr></thead>\
             <tbody><tr><td>a</td><td style=\"text-align:right\">1</td></tr></tbody></table>\
             <pre><code class=\"language-rust\">let x = 1;\n</code></pre>"
        );
        assert!(balanced(&html, &["ul", "ol", "li", "p", "table", "thead", "tbody", "tr"]));
    }

    #[test]
    fn test_formatter_reuse() {
        let formatter = Formatter::new(FormatMode::Markdown)
            .with_options(FormatOptions::default().with_header_ids(false));
        assert_eq!(formatter.format("## A"), "<h2>A</h2>");
        assert_eq!(formatter.format("## B"), "<h2>B</h2>");
        assert_eq!(formatter.mode(), FormatMode::Markdown);
        assert!(!formatter.options().header_ids);
    }

    #[test]
    fn test_formatter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Formatter>();
    }
}
