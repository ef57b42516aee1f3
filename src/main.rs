use colored::*;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli_args = dcr::cli::parse_args();

    let default_level = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("DCR_LOG")
        .from_env_lossy();

    // stdout is reserved for the rewritten document
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dcr::cli::run(cli_args).await {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
