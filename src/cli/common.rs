use super::error::CliError;
use super::ui;
use crate::composer::{
    token::generate_token,
    types::{Domain, RenameSummary, Renames, RewriteMode},
};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde_yaml::Value;
use std::path::Path;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};
use tracing::{debug, info};

/// Token and placement flags shared by every command that renames.
#[derive(Debug, Args)]
pub struct NamingArgs {
    /// Disambiguation token (a random 8-character token is generated when omitted)
    #[arg(short, long, env = "DCR_TOKEN")]
    pub token: Option<String>,

    /// Where the token goes: suffix (`name-token`) or prefix (`token-name`)
    #[arg(short, long, default_value_t = RewriteMode::Suffix)]
    pub mode: RewriteMode,
}

impl NamingArgs {
    pub fn resolve_token(&self) -> String {
        match &self.token {
            Some(token) => token.clone(),
            None => {
                let token = generate_token();
                info!("Generated token {}", ui::format_highlight(&token));
                token
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub async fn load_compose(path: &Path) -> Result<Value> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read compose file '{}'", path.display()))?;
    let document: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse compose file '{}'", path.display()))?;
    debug!("Loaded compose file {}", path.display());
    Ok(document)
}

/// Reads a JSON array of domain records.
pub async fn load_domains(path: &Path) -> Result<Vec<Domain>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read domains file '{}'", path.display()))?;
    let domains: Vec<Domain> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse domains file '{}'", path.display()))?;
    debug!("Loaded {} domain(s) from {}", domains.len(), path.display());
    Ok(domains)
}

pub fn render(document: &Value, format: OutputFormat) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(document).map_err(|e| {
            CliError::OperationFailed(format!("Failed to serialize YAML: {}", e))
        })?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document).map_err(|e| {
                CliError::OperationFailed(format!("Failed to serialize JSON: {}", e))
            })?;
            json.push('\n');
            json
        }
    };
    Ok(rendered)
}

/// Writes to `output`, or to stdout when no path is given.
pub async fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!("Wrote {}", ui::format_highlight(&path.display().to_string()));
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Points domain records at the renamed services. Records naming a service that was
/// not renamed are kept as they are so the consistency check can report them.
pub fn translate_domains(domains: Vec<Domain>, services: &Renames) -> Vec<Domain> {
    domains
        .into_iter()
        .map(|mut domain| {
            if let Some(new) = domain.service_name.as_deref().and_then(|s| services.get(s)) {
                domain.service_name = Some(new.to_string());
            }
            domain
        })
        .collect()
}

#[derive(Tabled)]
struct RenameRow<'a> {
    #[tabled(rename = "Section")]
    section: &'a str,
    #[tabled(rename = "Original")]
    original: &'a str,
    #[tabled(rename = "Rewritten")]
    rewritten: String,
}

pub fn print_rename_table(token: &str, summary: &RenameSummary) {
    println!(
        "\n{}: {}",
        ui::format_header("Token"),
        ui::format_highlight(token)
    );

    if summary.total() == 0 {
        println!("\n  {}", ui::format_warning("(Nothing to rename)"));
        return;
    }

    let data: Vec<_> = summary
        .sections()
        .into_iter()
        .flat_map(|(section, renames)| {
            renames.iter().map(move |(original, rewritten)| RenameRow {
                section,
                original,
                rewritten: ui::format_highlight(rewritten),
            })
        })
        .collect();

    let mut table = Table::new(data);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_GREEN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    println!("\n{}", table);
}
