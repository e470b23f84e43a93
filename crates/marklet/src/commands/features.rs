//! `marklet features` command implementation.

use std::path::PathBuf;

use clap::Args;
use marklet_config::Config;
use marklet_format::{Feature, Features};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the features command.
#[derive(Args)]
pub(crate) struct FeaturesArgs {
    /// Path to configuration file (default: auto-discover marklet.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl FeaturesArgs {
    /// Execute the features command.
    ///
    /// Prints every feature name in canonical order, dimming the ones the
    /// loaded configuration disables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let enabled = config.options.supported_formats;

        for line in feature_lines(enabled) {
            match line {
                (name, true) => output.print(name),
                (name, false) => output.print(&output.dimmed(&format!("{name} (disabled)"))),
            }
        }
        Ok(())
    }
}

fn feature_lines(enabled: Features) -> Vec<(&'static str, bool)> {
    Feature::ALL
        .iter()
        .map(|&feature| (feature.name(), enabled.contains(feature)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_all_features_listed_in_order() {
        let lines = feature_lines(Features::all());
        assert_eq!(lines.len(), Feature::ALL.len());
        assert_eq!(lines[0], ("headers", true));
        assert_eq!(lines[5], ("fencedCode", true));
        assert_eq!(lines[11], ("tables", true));
        assert!(lines.iter().all(|(_, on)| *on));
    }

    #[test]
    fn test_disabled_features_marked() {
        let lines = feature_lines(Features::none().with(Feature::Tables));
        let enabled: Vec<&str> = lines
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(enabled, vec!["tables"]);
    }
}
