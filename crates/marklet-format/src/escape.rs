//! HTML escaping.

use std::borrow::Cow;

/// Escape HTML special characters unless `allow_html` is set.
///
/// Replaces `&`, `<`, `>`, `"` and `'`. Escaping is not idempotent: running it
/// twice double-encodes `&`. Fenced code content is the one place the
/// formatter escapes already escaped text.
///
/// # Examples
///
/// ```
/// use marklet_format::escape;
///
/// assert_eq!(escape("<a href='x'>", false), "&lt;a href=&#039;x&#039;&gt;");
/// assert_eq!(escape("<b>", true), "<b>");
/// ```
#[must_use]
pub fn escape(text: &str, allow_html: bool) -> Cow<'_, str> {
    if allow_html || !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Reverse [`escape`] for the five entities it produces.
///
/// Other entities are left untouched.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#039;", '\''),
    ];

    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, c)) => {
                result.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<script>", false), "&lt;script&gt;");
        assert_eq!(escape("a & b", false), "a &amp; b");
        assert_eq!(escape(r#""quoted""#, false), "&quot;quoted&quot;");
        assert_eq!(escape("it's", false), "it&#039;s");
    }

    #[test]
    fn test_escape_allow_html_is_identity() {
        assert_eq!(escape("<b>&amp;</b>", true), "<b>&amp;</b>");
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("plain text", false), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        let once = escape("&", false).into_owned();
        let twice = escape(&once, false).into_owned();
        assert_eq!(once, "&amp;");
        assert_eq!(twice, "&amp;amp;");
    }

    #[test]
    fn test_unescape_reverses_escape() {
        let source = r#"<p class="x">Tom & Jerry's</p>"#;
        let escaped = escape(source, false);
        assert_eq!(unescape(&escaped), source);
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape("&nbsp;&amp;&"), "&nbsp;&&");
    }
}
