use super::common::{load_compose, print_rename_table, NamingArgs};
use super::error::CliError;
use super::parser::Cli;
use crate::composer::{types::RewriteConfig, ComposeRewriter};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct Plan {
    /// Compose file to inspect
    #[arg(required = true)]
    file: PathBuf,

    #[command(flatten)]
    naming: NamingArgs,
}

impl Plan {
    pub async fn run(&self, _cli_args: &Cli) -> Result<(), CliError> {
        info!("Planning renames for {}", self.file.display());

        let token = self.naming.resolve_token();
        let document = load_compose(&self.file).await?;

        let mut config = RewriteConfig::new(token, self.naming.mode);
        config.inject_managed_network = false;
        let rewriter = ComposeRewriter::try_new(config)?;
        let output = rewriter.rewrite(document)?;

        print_rename_table(&rewriter.config().token, &output.renames);
        Ok(())
    }
}
