//! `marklet render` command implementation.

use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use marklet_config::{CliSettings, Config, parse_feature_list};
use marklet_format::{FormatMode, format};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Input file (default: stdin, `-` also reads stdin).
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output mode (overrides config).
    #[arg(short, long, value_parser = ["text", "markdown", "code"], ignore_case = true)]
    mode: Option<String>,

    /// Language class for the code block in code mode (overrides config).
    #[arg(short, long)]
    language: Option<String>,

    /// Comma-separated list of enabled markdown features (overrides config).
    #[arg(long, value_name = "LIST")]
    features: Option<String>,

    /// Pass HTML in the input through unescaped.
    #[arg(long)]
    allow_html: bool,

    /// Do not add id attributes to headers.
    #[arg(long)]
    no_header_ids: bool,

    /// Path to configuration file (default: auto-discover marklet.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (debug logs for every formatting pass).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or input/output cannot be accessed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings()?;
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let text = self.read_input(&output)?;
        let html = format(&text, config.mode, &config.options);

        match self.output.as_deref() {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }

        Ok(())
    }

    /// Build config overrides from flags.
    fn cli_settings(&self) -> Result<CliSettings, CliError> {
        let features = self
            .features
            .as_deref()
            .map(parse_feature_list)
            .transpose()?;

        Ok(CliSettings {
            mode: self.mode.as_deref().map(FormatMode::from_name),
            language: self.language.clone(),
            allow_html: self.allow_html.then_some(true),
            header_ids: self.no_header_ids.then_some(false),
            features,
        })
    }

    /// Read the input file, or stdin when no file (or `-`) is given.
    fn read_input(&self, output: &Output) -> io::Result<String> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
            _ => {
                let stdin = io::stdin();
                if stdin.is_terminal() {
                    output.warning("Reading from stdin (finish with Ctrl-D)");
                }
                let mut text = String::new();
                stdin.lock().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}
