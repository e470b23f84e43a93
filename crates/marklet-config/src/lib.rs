//! Configuration management for Marklet.
//!
//! Parses `marklet.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [format]
//! mode = "markdown"
//! header_ids = true
//! allow_html = false
//! language = "${MARKLET_LANG:-}"
//! features = ["headers", "bold", "italic", "lists"]
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `format.mode` and `format.language` support `$VAR`, `${VAR}` and
//! `${VAR:-default}` expansion.

mod expand;

use std::path::{Path, PathBuf};

use marklet_format::{Feature, Features, FormatMode, FormatOptions};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Clone, Default)]
pub struct CliSettings {
    /// Override output mode.
    pub mode: Option<FormatMode>,
    /// Override code block language.
    pub language: Option<String>,
    /// Override HTML passthrough.
    pub allow_html: Option<bool>,
    /// Override header id generation.
    pub header_ids: Option<bool>,
    /// Override enabled markdown features.
    pub features: Option<Features>,
}

impl CliSettings {
    /// Check if all override fields are None (no overrides specified).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.language.is_none()
            && self.allow_html.is_none()
            && self.header_ids.is_none()
            && self.features.is_none()
    }
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "marklet.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Formatting section as written in TOML.
    format: FormatConfigRaw,

    /// Resolved output mode (set after loading).
    #[serde(skip)]
    pub mode: FormatMode,
    /// Resolved formatter options (set after loading).
    #[serde(skip)]
    pub options: FormatOptions,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw `[format]` section as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FormatConfigRaw {
    mode: Option<String>,
    header_ids: Option<bool>,
    allow_html: Option<bool>,
    language: Option<String>,
    /// Feature names in any spelling `Feature` accepts.
    features: Option<Features>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`format.language`").
        field: String,
        /// Error message (e.g., "${`MARKLET_LANG`} not set").
        message: String,
    },
}

const MODE_NAMES: [&str; 3] = ["text", "markdown", "code"];

/// Parse a mode name strictly.
///
/// Unlike [`FormatMode::from_name`], unknown names are an error.
fn parse_mode(name: &str, field: &str) -> Result<FormatMode, ConfigError> {
    let trimmed = name.trim();
    if MODE_NAMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(trimmed))
    {
        Ok(FormatMode::from_name(trimmed))
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be one of {}, got '{name}'",
            MODE_NAMES.join(", ")
        )))
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `marklet.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            tracing::debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(mode) = settings.mode {
            self.mode = mode;
        }
        if let Some(language) = &settings.language {
            self.options.language.clone_from(language);
        }
        if let Some(allow_html) = settings.allow_html {
            self.options.allow_html = allow_html;
        }
        if let Some(header_ids) = settings.header_ids {
            self.options.header_ids = header_ids;
        }
        if let Some(features) = settings.features {
            self.options.supported_formats = features;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before resolution
        config.expand_env_vars()?;
        config.resolve()?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            mode = %config.mode,
            features = config.options.supported_formats.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mode) = self.format.mode {
            self.format.mode = Some(expand::expand_vars(mode, "format.mode")?);
        }
        if let Some(ref language) = self.format.language {
            self.format.language = Some(expand::expand_vars(language, "format.language")?);
        }
        Ok(())
    }

    /// Resolve and validate the raw `[format]` section.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let raw = &self.format;
        let defaults = FormatOptions::default();

        self.mode = match raw.mode.as_deref() {
            Some(mode) => parse_mode(mode, "format.mode")?,
            None => FormatMode::default(),
        };

        let supported_formats = raw.features.unwrap_or(defaults.supported_formats);

        self.options = FormatOptions {
            header_ids: raw.header_ids.unwrap_or(defaults.header_ids),
            allow_html: raw.allow_html.unwrap_or(defaults.allow_html),
            supported_formats,
            language: raw.language.clone().unwrap_or(defaults.language),
        };

        if self.options.allow_html {
            tracing::warn!("format.allow_html is enabled; input HTML is not escaped");
        }

        Ok(())
    }
}

/// Parse a comma-separated feature list (e.g. from a CLI flag).
///
/// # Errors
///
/// Returns `ConfigError::Validation` naming the first unknown feature.
pub fn parse_feature_list(list: &str) -> Result<Features, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Feature>()
                .map_err(|e| ConfigError::Validation(format!("--features: {e}")))
        })
        .collect()
}
