//! Header slugs.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Characters that never survive into a slug (ASCII word chars, whitespace
/// and `-` are kept).
static UNSLUGGABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());

/// Convert header text to a URL-safe slug.
///
/// Lowercases, drops every character that is not an ASCII letter, digit,
/// whitespace, `-` or `_`, turns each run of whitespace, `-` and `_` into a
/// single dash and trims dashes from both ends.
///
/// # Examples
///
/// ```
/// use marklet_format::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  snake_case -- Title "), "snake-case-title");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let kept = UNSLUGGABLE_RE.replace_all(&lower, "");
    let dashed = SEPARATOR_RE.replace_all(&kept, "-");
    dashed.trim_matches('-').to_owned()
}

/// Unique header ids within one document.
///
/// The first header with a given slug keeps it; repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    repeats: HashMap<String, usize>,
}

impl HeadingIds {
    pub(crate) fn next(&mut self, text: &str) -> String {
        let slug = slugify(text);
        if let Some(repeat) = self.repeats.get_mut(&slug) {
            *repeat += 1;
            return format!("{slug}-{repeat}");
        }
        self.repeats.insert(slug.clone(), 0);
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Menü"), "caf-men");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_only_punctuation() {
        assert_eq!(slugify("?!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Release Notes 2.0"), slugify("Release Notes 2.0"));
        assert_eq!(slugify("Release Notes 2.0"), "release-notes-20");
    }

    #[test]
    fn test_heading_ids_deduplicate() {
        let mut ids = HeadingIds::default();
        assert_eq!(ids.next("Intro"), "intro");
        assert_eq!(ids.next("Usage"), "usage");
        assert_eq!(ids.next("Intro"), "intro-1");
        assert_eq!(ids.next("intro"), "intro-2");
    }
}
