use clap::Parser;
use gme_core::error::AppError;
use gme_core::storage::config::Config;
use gme_core::utils::logging::log_warning;
use std::path::PathBuf;

mod cli;

use cli::dispatcher::Dispatcher;
use cli::main_types::Cli;

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("gme_core", level)
        .filter_module("gme_cli", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn report_error(err: &AppError) {
    eprintln!("{} Error: {}", err.severity().emoji(), err);
    if let Some(hint) = err.troubleshooting_hint() {
        eprintln!("Hint: {}", hint);
    }
    if let AppError::Aborted(abort) = err
        && abort.is_partial()
    {
        log_warning(&format!(
            "{} asset(s) were deleted before the failure; the asset graph is now partially deleted",
            abort.deleted.len()
        ));
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(config_dir) = &cli.config_dir {
        log::debug!("Using config directory: {}", config_dir);
    }

    let dispatcher = Dispatcher::new(config, config_path, cli.verbose, cli.access_token);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        report_error(&e);
        std::process::exit(1);
    }
}
