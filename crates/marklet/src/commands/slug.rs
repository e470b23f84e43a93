//! `marklet slug` command implementation.

use clap::Args;
use marklet_format::slugify;

use crate::output::Output;

/// Arguments for the slug command.
#[derive(Args)]
pub(crate) struct SlugArgs {
    /// Heading texts; one slug is printed per argument.
    #[arg(required = true)]
    text: Vec<String>,
}

impl SlugArgs {
    /// Execute the slug command.
    pub(crate) fn execute(self) {
        let output = Output::new();
        for slug in self.slugs() {
            output.print(&slug);
        }
    }

    fn slugs(&self) -> impl Iterator<Item = String> + '_ {
        self.text.iter().map(String::as_str).map(slugify)
    }
}
