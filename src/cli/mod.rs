mod check;
mod common;
mod error;
pub mod parser;
mod plan;
mod rewrite;
mod token;
mod ui;

use clap::Parser;
pub use error::CliError;
use parser::Cli;

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        parser::Commands::Rewrite(cmd) => cmd.run(&cli).await,
        parser::Commands::Plan(cmd) => cmd.run(&cli).await,
        parser::Commands::Check(cmd) => cmd.run(&cli).await,
        parser::Commands::Token(cmd) => cmd.run(&cli).await,
    }
}
