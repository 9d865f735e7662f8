use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Args, Config},
    notify::{Notifier, NotifyHandler},
};

mod artwork;
mod async_client;
mod config;
mod ext;
mod mpd_ext;
mod notify;
mod watch;
mod watcher;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(err) => {
            error!(err = ?err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let notifier = match Notifier::new(config.clone()).await {
        Ok(notifier) => notifier,
        Err(err) => {
            error!(err = ?err, "Failed to connect to the session bus");
            return ExitCode::FAILURE;
        }
    };
    let mut handler = NotifyHandler::new(notifier, config.clone());

    let errs = watch::watch(&config, &mut handler).await;
    if errs.is_empty() {
        return ExitCode::SUCCESS;
    }
    for err in &errs {
        error!("While watching MPD: {err:#}");
    }
    ExitCode::FAILURE
}
