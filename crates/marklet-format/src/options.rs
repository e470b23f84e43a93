//! Format modes, feature tags and formatter options.

use std::fmt;
use std::str::FromStr;

/// Output mode selecting the formatting pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "&'static str")
)]
pub enum FormatMode {
    /// Escape only.
    #[default]
    PlainText,
    /// Full markdown pipeline.
    Markdown,
    /// Escape and wrap in a code block.
    Code,
}

impl FormatMode {
    /// Resolve a mode name (`text`, `markdown`, `code`).
    ///
    /// Matching ignores case and surrounding whitespace. Unknown names fall
    /// back to [`FormatMode::PlainText`].
    ///
    /// ```
    /// use marklet_format::FormatMode;
    ///
    /// assert_eq!(FormatMode::from_name("Markdown"), FormatMode::Markdown);
    /// assert_eq!(FormatMode::from_name("rtf"), FormatMode::PlainText);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("markdown") {
            Self::Markdown
        } else if name.eq_ignore_ascii_case("code") {
            Self::Code
        } else {
            Self::PlainText
        }
    }

    /// Canonical mode name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for FormatMode {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for FormatMode {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<FormatMode> for &'static str {
    fn from(mode: FormatMode) -> Self {
        mode.name()
    }
}

/// A markdown construct that can be switched on or off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "&'static str")
)]
pub enum Feature {
    Headers,
    Bold,
    Italic,
    Strikethrough,
    Code,
    FencedCode,
    Blockquote,
    Lists,
    Images,
    Links,
    HorizontalRule,
    Tables,
}

impl Feature {
    /// Every feature, in canonical order.
    pub const ALL: [Feature; 12] = [
        Feature::Headers,
        Feature::Bold,
        Feature::Italic,
        Feature::Strikethrough,
        Feature::Code,
        Feature::FencedCode,
        Feature::Blockquote,
        Feature::Lists,
        Feature::Images,
        Feature::Links,
        Feature::HorizontalRule,
        Feature::Tables,
    ];

    /// Canonical (camelCase) feature name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Headers => "headers",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Strikethrough => "strikethrough",
            Self::Code => "code",
            Self::FencedCode => "fencedCode",
            Self::Blockquote => "blockquote",
            Self::Lists => "lists",
            Self::Images => "images",
            Self::Links => "links",
            Self::HorizontalRule => "horizontalRule",
            Self::Tables => "tables",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognized feature name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature '{0}' (expected one of: {expected})", expected = feature_names())]
pub struct UnknownFeature(pub String);

fn feature_names() -> String {
    Feature::ALL.map(Feature::name).join(", ")
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    /// Parse a feature name.
    ///
    /// Accepts the canonical camelCase spelling as well as kebab-case and
    /// snake_case variants (`fenced-code`, `horizontal_rule`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Feature::ALL
            .into_iter()
            .find(|feature| feature.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| UnknownFeature(s.trim().to_owned()))
    }
}

impl TryFrom<String> for Feature {
    type Error = UnknownFeature;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Feature> for &'static str {
    fn from(feature: Feature) -> Self {
        feature.name()
    }
}

/// Set of enabled features.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Feature>", into = "Vec<Feature>")
)]
pub struct Features(u16);

impl Features {
    /// Set with every feature enabled.
    #[must_use]
    pub fn all() -> Self {
        Feature::ALL.into_iter().collect()
    }

    /// Empty set.
    #[must_use]
    pub fn none() -> Self {
        Self(0)
    }

    /// Check whether `feature` is enabled.
    #[must_use]
    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Enable a feature.
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    /// Disable a feature.
    pub fn remove(&mut self, feature: Feature) {
        self.0 &= !feature.bit();
    }

    /// Return a copy with `feature` enabled.
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        self.insert(feature);
        self
    }

    /// Return a copy with `feature` disabled.
    #[must_use]
    pub fn without(mut self, feature: Feature) -> Self {
        self.remove(feature);
        self
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate enabled features in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = Self::none();
        set.extend(iter);
        set
    }
}

impl Extend<Feature> for Features {
    fn extend<I: IntoIterator<Item = Feature>>(&mut self, iter: I) {
        for feature in iter {
            self.insert(feature);
        }
    }
}

impl From<Vec<Feature>> for Features {
    fn from(features: Vec<Feature>) -> Self {
        features.into_iter().collect()
    }
}

impl From<Features> for Vec<Feature> {
    fn from(features: Features) -> Self {
        features.iter().collect()
    }
}

/// Formatter configuration.
///
/// Every field has a default, so partially specified options (including
/// deserialized ones with the `serde` feature) always resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct FormatOptions {
    /// Emit a slug `id` attribute on headers.
    pub header_ids: bool,
    /// Skip escaping and trust caller-provided HTML.
    pub allow_html: bool,
    /// Enabled markdown constructs.
    pub supported_formats: Features,
    /// Language class for code mode (empty omits the class).
    pub language: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            header_ids: true,
            allow_html: false,
            supported_formats: Features::all(),
            language: String::new(),
        }
    }
}

impl FormatOptions {
    #[must_use]
    pub fn with_header_ids(mut self, enabled: bool) -> Self {
        self.header_ids = enabled;
        self
    }

    /// Trust the input and skip HTML escaping.
    #[must_use]
    pub fn with_allow_html(mut self, allowed: bool) -> Self {
        self.allow_html = allowed;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.supported_formats = features;
        self
    }

    /// Set the language used for the code mode class attribute.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
