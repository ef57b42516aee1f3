use super::common::{
    load_compose, load_domains, render, translate_domains, write_output, NamingArgs, OutputFormat,
};
use super::error::CliError;
use super::parser::Cli;
use super::ui;
use crate::composer::{
    domains::{add_domains_to_compose, DomainLabelOptions},
    types::{ComposeType, RewriteConfig},
    ComposeRewriter,
};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Args)]
pub struct Rewrite {
    /// Compose file to rewrite
    #[arg(required = true)]
    file: PathBuf,

    #[command(flatten)]
    naming: NamingArgs,

    /// Do not attach services to the managed network (isolated deployment)
    #[arg(long)]
    no_network: bool,

    /// JSON file with domain records to turn into Traefik labels
    #[arg(short, long)]
    domains: Option<PathBuf>,

    /// Application name used in Traefik router names
    #[arg(long, default_value = "app")]
    app_name: String,

    /// Put labels under deploy.labels for `docker stack deploy`
    #[arg(long)]
    stack: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Rewrite {
    #[instrument(name = "rewrite", skip(self, _cli_args), fields(file = %self.file.display()))]
    pub async fn run(&self, _cli_args: &Cli) -> Result<(), CliError> {
        let token = self.naming.resolve_token();
        let document = load_compose(&self.file).await?;

        let mut config = RewriteConfig::new(token, self.naming.mode);
        config.inject_managed_network = !self.no_network;
        let rewriter = ComposeRewriter::try_new(config)?;
        let mut output = rewriter.rewrite(document)?;

        if let Some(path) = &self.domains {
            let domains = load_domains(path).await?;
            // records may still use the names from before the rewrite
            let domains = translate_domains(domains, &output.renames.services);
            let options = DomainLabelOptions {
                app_name: self.app_name.clone(),
                compose_type: if self.stack {
                    ComposeType::Stack
                } else {
                    ComposeType::DockerCompose
                },
                isolated: self.no_network,
            };
            add_domains_to_compose(&mut output.document, &domains, &options)?;
            info!("Added labels for {} domain(s)", domains.len());
        }

        let rendered = render(&output.document, self.format)?;
        write_output(&rendered, self.output.as_deref()).await?;

        // stdout carries the document when no output file is given
        if self.output.is_some() {
            for (section, renames) in output.renames.sections() {
                for (old, new) in renames.iter() {
                    println!("  {:<9} {}", section, ui::format_rename(old, new));
                }
            }
            println!(
                "{}",
                ui::format_success(&format!("Rewrote {} name(s)", output.renames.total()))
            );
        }
        Ok(())
    }
}
