//! HTML snippets shared by the markdown passes and code mode.
//!
//! Arguments are expected to be escaped already unless noted otherwise.

use std::borrow::Cow;

use crate::escape::escape;

/// Schemes that execute script when followed.
const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Render a `<pre><code>` block.
///
/// The language is attribute-escaped here; `content` is written as given.
pub(crate) fn code_block(lang: Option<&str>, content: &str) -> String {
    match lang.filter(|lang| !lang.is_empty()) {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{content}</code></pre>"#,
            escape(lang, false)
        ),
        None => format!("<pre><code>{content}</code></pre>"),
    }
}

pub(crate) fn image(src: &str, alt: &str) -> String {
    format!(r#"<img src="{src}" alt="{alt}">"#)
}

pub(crate) fn link_open(href: &str) -> String {
    format!(r#"<a href="{href}">"#)
}

/// Neutralize URLs with a script-capable scheme.
///
/// Whitespace and control characters are ignored when detecting the scheme,
/// matching how browsers normalize `href` values.
pub(crate) fn safe_url(url: &str) -> Cow<'_, str> {
    let normalized: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .flat_map(char::to_lowercase)
        .collect();

    if UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        tracing::debug!(url, "Replaced unsafe URL");
        Cow::Borrowed("#")
    } else {
        Cow::Borrowed(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            code_block(Some("rust"), "fn main() {}"),
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(code_block(None, "x"), "<pre><code>x</code></pre>");
        assert_eq!(code_block(Some(""), "x"), "<pre><code>x</code></pre>");
    }

    #[test]
    fn test_code_block_escapes_language() {
        assert_eq!(
            code_block(Some(r#"a"b"#), ""),
            r#"<pre><code class="language-a&quot;b"></code></pre>"#
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            image("cat.png", "A cat"),
            r#"<img src="cat.png" alt="A cat">"#
        );
    }

    #[test]
    fn test_safe_url_passes_regular_urls() {
        assert_eq!(safe_url("https://example.com"), "https://example.com");
        assert_eq!(safe_url("/docs/page"), "/docs/page");
        assert_eq!(safe_url("#section"), "#section");
        assert_eq!(safe_url("mailto:a@example.com"), "mailto:a@example.com");
    }

    #[test]
    fn test_safe_url_blocks_script_schemes() {
        assert_eq!(safe_url("javascript:alert(1)"), "#");
        assert_eq!(safe_url(" JavaScript:alert(1)"), "#");
        assert_eq!(safe_url("java\tscript:alert(1)"), "#");
        assert_eq!(safe_url("vbscript:msgbox"), "#");
        assert_eq!(safe_url("data:text/html;base64,xx"), "#");
    }
}
