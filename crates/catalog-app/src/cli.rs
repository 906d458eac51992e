use std::path::PathBuf;

use clap::Parser;

/// Catalog assistant: password-gated chat over a product catalog.
#[derive(Parser, Debug)]
#[command(name = "catalog", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Secrets file path override (PASSWORD, GOOGLE_API_KEY).
    #[arg(long)]
    pub secrets: Option<PathBuf>,

    /// Reference document override.
    #[arg(short = 'd', long)]
    pub document: Option<PathBuf>,

    /// Log level override (debug, info, warn, error) or a full filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Wait for complete answers instead of streaming them.
    #[arg(long)]
    pub no_stream: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
