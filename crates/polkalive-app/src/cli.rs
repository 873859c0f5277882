use std::path::PathBuf;

use clap::Parser;
use polkalive_common::PlatformVariant;

/// polkalive: headless host for the multi-window communication fabric.
#[derive(Parser, Debug)]
#[command(name = "polkalive", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug`, `polkalive_host=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Adapter variant, overriding `[platform] variant`.
    #[arg(long, value_name = "direct|extension")]
    pub platform: Option<PlatformVariant>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
