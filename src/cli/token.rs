use super::error::CliError;
use super::parser::Cli;
use crate::composer::token::generate_token;
use clap::Args;

#[derive(Debug, Args)]
pub struct Token {
    /// How many tokens to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
}

impl Token {
    pub async fn run(&self, _cli_args: &Cli) -> Result<(), CliError> {
        if self.count == 0 {
            return Err(CliError::ConfigError("--count must be at least 1".into()));
        }
        for _ in 0..self.count {
            println!("{}", generate_token());
        }
        Ok(())
    }
}
