use clap::Parser;
use duovox::{ErrorCode, cli, logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    // Configuration first so its log level applies from the start
    let config = match cli::load_config(cli_args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {:#}", e);
            return ExitCode::from(ErrorCode::Config.exit_code() as u8);
        }
    };

    let log_dir = config.logging.log_dir();
    let log_config = logging::LogConfig::new()
        .with_debug_mode(cli_args.debug)
        .with_log_dir(log_dir.clone())
        .with_level(config.logging.level.clone());

    let _guard = match logging::init_logging(log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ Failed to initialize logging: {:#}", e);
            return ExitCode::from(ErrorCode::Internal.exit_code() as u8);
        }
    };

    // Clean up old log files (keep last 7 days)
    if cli_args.debug
        && let Ok(removed) = logging::cleanup_old_logs(&log_dir, 7)
        && removed > 0
    {
        tracing::info!("🧹 Cleaned up {} old log file(s)", removed);
    }

    match cli::run(cli_args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::from(ErrorCode::for_error(&e).exit_code() as u8)
        }
    }
}
