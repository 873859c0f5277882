mod cli;

use std::process::ExitCode;

use polkalive_config::schema::LogLevel;
use polkalive_config::LiveConfig;
use polkalive_host::Shell;
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("polkalive panicked: {info}");
        default_hook(info);
    }));
}

/// `--log-level` wins, then `RUST_LOG`, then the configured level.
fn init_logging(cli_directive: Option<&str>, level: LogLevel) {
    let fallback = || EnvFilter::new(level.as_directive());
    let filter = match cli_directive {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("invalid --log-level {directive:?}: {e}");
            fallback()
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &cli::Args) -> (LiveConfig, Option<String>) {
    let loaded = match &args.config {
        Some(path) => polkalive_config::load_config_from(path),
        None => polkalive_config::load_config(),
    };
    let (mut config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (LiveConfig::default(), Some(e.to_string())),
    };
    if let Some(variant) = args.platform {
        config.platform.variant = variant;
    }
    (config, error)
}

#[tokio::main]
async fn main() -> ExitCode {
    install_panic_hook();
    let args = cli::parse();

    // Config is read before logging starts; its error is reported once the
    // subscriber is up.
    let (config, config_error) = load_config(&args);
    init_logging(args.log_level.as_deref(), config.logging.level);

    tracing::info!("polkalive v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.print_config {
        println!("{}", polkalive_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let shell = match Shell::bootstrap(&config).await {
        Ok(shell) => shell,
        Err(e) => {
            tracing::error!("Bootstrap failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(variant = ?shell.variant(), "Fabric running, press Ctrl-C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    shell.shutdown();
    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
