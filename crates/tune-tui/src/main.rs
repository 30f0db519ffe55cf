mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use tune_core::api::HttpSongApi;
use tune_core::config::Config;
use tune_core::token::FileTokenStore;

#[derive(Debug, Parser)]
#[command(name = "tune", version, about = "Search and play songs from the terminal")]
struct Cli {
    /// Backend base URL, overriding `api.base_url` from the config file.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Without a subcommand the interactive UI starts.
    #[command(subcommand)]
    command: Option<cli::Command>,
}

/// Default filter: debug for app code, connection-level noise from the HTTP
/// client internals suppressed.
const TUI_LOG_FILTER: &str = "debug,hyper_util=warn,reqwest=warn,hyper=warn";
const CLI_LOG_FILTER: &str = "warn";

fn log_filter(default: &str) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string())
}

/// The UI owns the terminal, so logs go to a file.
fn init_file_logging() -> anyhow::Result<()> {
    let data_dir = tune_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let log_path = data_dir.join("tune.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter(TUI_LOG_FILTER).as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so it can be tailed immediately.
    eprintln!("tune log: {}", log_path.display());
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(CLI_LOG_FILTER).as_str())
        .init();
}

fn load_config(api_url: Option<String>) -> Config {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("config load failed, using defaults: {:#}", e);
            Config::default()
        }
    };
    if let Some(url) = api_url {
        config.api.base_url = url;
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    match args.command {
        Some(command) => {
            init_stderr_logging();
            let config = load_config(args.api_url);
            cli::run(command, &config).await
        }
        None => {
            init_file_logging()?;
            tracing::info!("tune starting…");
            let config = load_config(args.api_url);

            let api = HttpSongApi::from_config(&config.api).context("building HTTP client")?;
            let tokens = FileTokenStore::new(config.paths.token_file.clone());
            tracing::info!(
                "backend {}, token file {}",
                api.base_url(),
                tokens.path().display()
            );

            let (app, channels) = app::App::new(&config, Arc::new(api), Arc::new(tokens));
            app.run(channels).await
        }
    }
}
