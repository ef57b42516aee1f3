use super::{check, plan, rewrite, token};
use clap::{ArgAction, Parser, Subcommand};

const VERSION_INFO: &str = env!("DCR_BUILD_VERSION");

#[derive(Parser, Debug)]
#[command(name = "dcr")]
#[command(about = "Docker Compose name rewriter for shared Swarm hosts", long_about = None, version = VERSION_INFO)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite service, volume, secret, config and network names with a token
    Rewrite(rewrite::Rewrite),

    /// Show the renames a rewrite would apply without printing the document
    Plan(plan::Plan),

    /// Verify that domain records point at services defined in a compose file
    Check(check::Check),

    /// Generate random disambiguation tokens
    Token(token::Token),
}
