//! Ordered block and inline substitution passes.
//!
//! Each pass is gated by one [`Feature`] and runs in a fixed order. Passes
//! stash the tags they emit in the [`Document`], so a later pass never sees
//! an earlier pass's tag names or attribute values. Fenced code blocks, code
//! spans and images are stashed whole and stay inert for the rest of the
//! pipeline.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::Document;
use crate::escape::{escape, unescape};
use crate::html;
use crate::options::{Feature, Features};
use crate::slug::HeadingIds;
use crate::table;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^```(\w+)?[ \t]*\n(.*?)```").unwrap());

static BLOCKQUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:&gt;|>) (.+)$").unwrap());

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6}) (.+)$").unwrap());

static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:\*\*\*|---|___)[ \t]*$").unwrap());

// Spans may not start or end with whitespace or the delimiter character.
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^\s*]|[^\s*].*?[^\s*])\*\*|__([^\s_]|[^\s_].*?[^\s_])__").unwrap()
});

static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*([^\s*]|[^\s*].*?[^\s*])\*|_([^\s_]|[^\s_].*?[^\s_])_").unwrap()
});

static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// One gated stage of the rule engine.
struct Pass {
    name: &'static str,
    feature: Feature,
    run: fn(&Rules, &mut Document),
}

/// Passes in application order.
const PASSES: [Pass; 11] = [
    Pass {
        name: "fenced_code",
        feature: Feature::FencedCode,
        run: Rules::fenced_code,
    },
    Pass {
        name: "blockquote",
        feature: Feature::Blockquote,
        run: Rules::blockquote,
    },
    Pass {
        name: "headers",
        feature: Feature::Headers,
        run: Rules::headers,
    },
    Pass {
        name: "horizontal_rule",
        feature: Feature::HorizontalRule,
        run: Rules::horizontal_rule,
    },
    Pass {
        name: "bold",
        feature: Feature::Bold,
        run: Rules::bold,
    },
    Pass {
        name: "italic",
        feature: Feature::Italic,
        run: Rules::italic,
    },
    Pass {
        name: "strikethrough",
        feature: Feature::Strikethrough,
        run: Rules::strikethrough,
    },
    Pass {
        name: "code",
        feature: Feature::Code,
        run: Rules::code_span,
    },
    Pass {
        name: "images",
        feature: Feature::Images,
        run: Rules::images,
    },
    Pass {
        name: "links",
        feature: Feature::Links,
        run: Rules::links,
    },
    Pass {
        name: "tables",
        feature: Feature::Tables,
        run: Rules::tables,
    },
];

/// Rule engine configuration for one document.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rules {
    features: Features,
    header_ids: bool,
    allow_html: bool,
}

impl Rules {
    pub(crate) fn new(features: Features, header_ids: bool, allow_html: bool) -> Self {
        Self {
            features,
            header_ids,
            allow_html,
        }
    }

    /// Run every enabled pass in order.
    pub(crate) fn apply(&self, doc: &mut Document) {
        for pass in &PASSES {
            if self.features.contains(pass.feature) {
                (pass.run)(self, doc);
                tracing::trace!(
                    pass = pass.name,
                    fragments = doc.fragment_count(),
                    "Applied pass"
                );
            }
        }
    }

    /// Attribute value from document text.
    ///
    /// Escaped documents are already attribute-safe.
    fn attr<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.allow_html {
            escape(value, false)
        } else {
            Cow::Borrowed(value)
        }
    }

    fn url<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if self.allow_html {
            escape(value, false)
        } else {
            html::safe_url(value)
        }
    }

    fn fenced_code(&self, doc: &mut Document) {
        doc.rewrite(&FENCE_RE, |doc, caps| {
            let lang = caps.get(1).map(|m| m.as_str());
            // Fence content is escaped again on top of the document escape.
            doc.block(html::code_block(lang, &escape(&caps[2], false)))
        });
    }

    fn blockquote(&self, doc: &mut Document) {
        doc.rewrite(&BLOCKQUOTE_RE, |doc, caps| {
            let open = doc.block("<blockquote>");
            let close = doc.block("</blockquote>");
            format!("{open}{}{close}", &caps[1])
        });
    }

    fn headers(&self, doc: &mut Document) {
        let mut ids = HeadingIds::default();
        doc.rewrite(&HEADER_RE, |doc, caps| {
            let level = caps[1].len();
            let content = caps[2].trim();

            let mut id_attr = String::new();
            if self.header_ids {
                let id = ids.next(&unescape(&doc.flatten(content)));
                if !id.is_empty() {
                    id_attr = format!(r#" id="{id}""#);
                }
            }

            let open = doc.block(format!("<h{level}{id_attr}>"));
            let close = doc.block(format!("</h{level}>"));
            format!("{open}{content}{close}")
        });
    }

    fn horizontal_rule(&self, doc: &mut Document) {
        doc.rewrite(&RULE_RE, |doc, _| doc.block("<hr>"));
    }

    fn bold(&self, doc: &mut Document) {
        wrap_delimited(doc, &BOLD_RE, "strong", ["**", "__"]);
    }

    fn italic(&self, doc: &mut Document) {
        wrap_delimited(doc, &ITALIC_RE, "em", ["*", "_"]);
    }

    fn strikethrough(&self, doc: &mut Document) {
        wrap_delimited(doc, &STRIKE_RE, "del", ["~~", "~~"]);
    }

    fn code_span(&self, doc: &mut Document) {
        doc.rewrite(&CODE_SPAN_RE, |doc, caps| {
            let content = doc.flatten(&caps[1]).into_owned();
            let source = doc.flatten(&caps[0]).into_owned();
            doc.inline(format!("<code>{content}</code>"), source)
        });
    }

    fn images(&self, doc: &mut Document) {
        doc.rewrite(&IMAGE_RE, |doc, caps| {
            let alt = doc.flatten(&caps[1]).into_owned();
            let src = doc.flatten(&caps[2]).into_owned();
            let source = doc.flatten(&caps[0]).into_owned();
            let html = html::image(&self.url(src.trim()), &self.attr(&alt));
            doc.inline(html, source)
        });
    }

    fn links(&self, doc: &mut Document) {
        doc.rewrite(&LINK_RE, |doc, caps| {
            let href = doc.flatten(&caps[2]).into_owned();
            let open = doc.inline(html::link_open(&self.url(href.trim())), "[");
            let close = doc.inline("</a>", format!("]({href})"));
            format!("{open}{}{close}", &caps[1])
        });
    }

    fn tables(&self, doc: &mut Document) {
        table::render_tables(doc);
    }
}

/// Wrap each delimited span matched by `re` in `<tag>`.
///
/// Alternative `n` of the pattern captures into group `n + 1` and uses
/// `delimiters[n]`.
fn wrap_delimited(doc: &mut Document, re: &Regex, tag: &str, delimiters: [&str; 2]) {
    doc.rewrite(re, |doc, caps| {
        let Some((n, inner)) = (1..caps.len())
            .find_map(|group| caps.get(group).map(|m| (group - 1, m.as_str())))
        else {
            return caps[0].to_owned();
        };
        let delimiter = delimiters[n.min(1)];
        let open = doc.inline(format!("<{tag}>"), delimiter);
        let close = doc.inline(format!("</{tag}>"), delimiter);
        format!("{open}{inner}{close}")
    });
}

/// Apply the rule passes to already escaped text.
///
/// Returns the text with every enabled construct replaced by HTML. Constructs
/// whose feature is disabled are left as literal text.
///
/// # Examples
///
/// ```
/// use marklet_format::{Feature, Features, apply_rules};
///
/// let html = apply_rules("## Intro", Features::all(), true);
/// assert_eq!(html, r#"<h2 id="intro">Intro</h2>"#);
///
/// let html = apply_rules("**x**", Features::none().with(Feature::Headers), true);
/// assert_eq!(html, "**x**");
/// ```
#[must_use]
pub fn apply_rules(escaped_text: &str, enabled: Features, header_ids: bool) -> String {
    let mut doc = Document::new(escaped_text);
    Rules::new(enabled, header_ids, false).apply(&mut doc);
    doc.into_html()
}
