use super::common::{load_compose, load_domains};
use super::error::CliError;
use super::parser::Cli;
use super::ui;
use crate::composer::domains::assert_domains_match_services;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct Check {
    /// Compose file whose services the domains must point at
    #[arg(required = true)]
    file: PathBuf,

    /// JSON file with domain records
    #[arg(short, long, required = true)]
    domains: PathBuf,
}

impl Check {
    pub async fn run(&self, _cli_args: &Cli) -> Result<(), CliError> {
        let document = load_compose(&self.file).await?;
        let domains = load_domains(&self.domains).await?;

        assert_domains_match_services(&document, &domains)?;

        println!(
            "{}",
            ui::format_success(&format!(
                "All {} domain(s) point at services defined in {}",
                domains.len(),
                self.file.display()
            ))
        );
        Ok(())
    }
}
