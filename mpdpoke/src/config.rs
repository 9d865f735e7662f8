use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use mpdpoke_mpd::address::{self, MpdAddress, MpdPassword};
use mpdpoke_shared::paths::config_paths;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "mpdpoke", about = "Notify when tracks are played by MPD", version)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// MPD address, takes precedence over $MPD_HOST and the config file
    #[arg(long)]
    pub address: Option<String>,
    /// MPD password, takes precedence over $MPD_HOST and the config file
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    address: String,
    password: Option<String>,
    /// Seconds between keep-alive pings on the command connection.
    keepalive_interval: u64,
    /// Milliseconds before a notification expires on its own.
    notification_timeout: u64,
    playing_glyph: String,
    paused_glyph: String,
    notification_icon: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6600".to_string(),
            password: None,
            keepalive_interval: 60,
            notification_timeout: 5000,
            playing_glyph: "▶".to_string(),
            paused_glyph: "⏸".to_string(),
            notification_icon: "audio-x-generic".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: MpdAddress,
    pub password: Option<MpdPassword>,
    pub keepalive_interval: Duration,
    pub notification_timeout: Duration,
    pub playing_glyph: String,
    pub paused_glyph: String,
    pub notification_icon: String,
}

impl Config {
    pub fn load(args: &Args) -> Result<Self> {
        let paths = config_paths(args.config.as_deref());
        Ok(ConfigFile::read(&paths)?.into_config(args))
    }
}

impl ConfigFile {
    fn read(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(err)
                        .context(format!("Failed to read config file '{}'", path.display()));
                }
            };

            info!(path = %path.display(), "Using config file");
            return ron::from_str(&content)
                .context(format!("Failed to parse config file '{}'", path.display()));
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn into_config(self, args: &Args) -> Config {
        let (address, password) = address::resolve(
            args.address.clone(),
            args.password.clone(),
            &self.address,
            self.password,
        );

        Config {
            address,
            password,
            keepalive_interval: Duration::from_secs(self.keepalive_interval),
            notification_timeout: Duration::from_millis(self.notification_timeout),
            playing_glyph: self.playing_glyph,
            paused_glyph: self.paused_glyph,
            notification_icon: self.notification_icon,
        }
    }
}
