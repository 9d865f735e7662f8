use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use image::DynamicImage;
use mpdpoke_mpd::{
    client::Client,
    commands::{IdleEvent, Song, Status},
    mpd_client::MpdClient as _,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    artwork,
    async_client::AsyncClient,
    config::Config,
    mpd_ext::MpdExt as _,
    watcher::{IdleWatcher, WatcherEvent},
};

pub enum HandlerOutcome {
    Continue,
    Stop,
}

/// Called once per qualifying player event. Returning
/// [`HandlerOutcome::Stop`] shuts the watch down cleanly; an error tears it
/// down and surfaces to the caller.
#[allow(async_fn_in_trait)]
pub trait TrackHandler {
    async fn on_track(
        &mut self,
        song: &Song,
        status: &Status,
        art: Option<&DynamicImage>,
    ) -> anyhow::Result<HandlerOutcome>;
}

/// Watches the player subsystem until the handler asks to stop or the
/// subscription dies. Returns every error collected along the way, teardown
/// failures included; an empty vec is a clean stop.
pub async fn watch(config: &Config, handler: &mut impl TrackHandler) -> Vec<anyhow::Error> {
    let client = match Client::init(config.address.clone(), config.password.clone(), "command") {
        Ok(client) => client,
        Err(err) => return vec![anyhow::Error::new(err).context("Failed to connect to MPD")],
    };
    let client = Arc::new(AsyncClient::new(client));

    let mut watcher = match IdleWatcher::connect(
        config.address.clone(),
        config.password.clone(),
        IdleEvent::Player,
    ) {
        Ok(watcher) => watcher,
        Err(err) => {
            let mut errs =
                vec![anyhow::Error::new(err).context("Failed to subscribe to MPD events")];
            if let Err(err) = client.shutdown().await {
                errs.push(anyhow::Error::new(err).context("Failed to close command connection"));
            }
            return errs;
        }
    };

    let keepalive = spawn_keepalive(client.clone(), config.keepalive_interval);

    let result = run(&client, &mut watcher, handler).await;

    keepalive.cancel();
    let mut errs = Vec::new();
    if let Err(err) = result {
        errs.push(err);
    }
    if let Err(err) = client.shutdown().await {
        errs.push(anyhow::Error::new(err).context("Failed to close command connection"));
    }
    if let Err(err) = watcher.close() {
        errs.push(anyhow::Error::new(err).context("Failed to close idle connection"));
    }

    errs
}

async fn run(
    client: &Arc<AsyncClient>,
    watcher: &mut IdleWatcher,
    handler: &mut impl TrackHandler,
) -> anyhow::Result<()> {
    loop {
        let subsystem = match watcher.next().await {
            Some(WatcherEvent::Changed(subsystem)) => subsystem,
            Some(WatcherEvent::Closed(err)) => {
                return Err(anyhow::Error::new(err).context("Event subscription ended"));
            }
            None => return Err(anyhow!("Event subscription ended unexpectedly")),
        };

        if subsystem != IdleEvent::Player {
            debug!(subsystem = %subsystem, "Ignoring event for unwatched subsystem");
            continue;
        }

        // The event can outrun the data it announces; a failed query here is
        // a skipped cycle, not a reason to tear the connection down.
        let song = match client.run(|c| c.get_current_song()).await {
            Ok(Some(song)) => song,
            Ok(None) => {
                debug!("No current song, skipping cycle");
                continue;
            }
            Err(err) => {
                warn!(err = %err, "Failed to query current song, skipping cycle");
                continue;
            }
        };
        let status = match client.run(|c| c.get_status()).await {
            Ok(status) => status,
            Err(err) => {
                warn!(err = %err, "Failed to query status, skipping cycle");
                continue;
            }
        };

        let art = fetch_artwork(client, &song).await;

        match handler.on_track(&song, &status, art.as_ref()).await {
            Ok(HandlerOutcome::Continue) => {}
            Ok(HandlerOutcome::Stop) => {
                info!("Handler requested stop");
                return Ok(());
            }
            Err(err) => return Err(err.context("Event handler failed")),
        }
    }
}

/// Missing or undecodable artwork never fails a cycle, the notification just
/// goes out without an image.
async fn fetch_artwork(client: &Arc<AsyncClient>, song: &Song) -> Option<DynamicImage> {
    if song.file.is_empty() {
        return None;
    }

    let uri = song.file.clone();
    let bytes = match client.run(move |c| c.find_album_art(&uri)).await {
        Ok(bytes) => bytes?,
        Err(err) => {
            warn!(err = %err, file = song.file.as_str(), "Failed to fetch album art");
            return None;
        }
    };

    match artwork::decode(&bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(err = %err, file = song.file.as_str(), "Failed to decode album art");
            None
        }
    }
}

fn spawn_keepalive(client: Arc<AsyncClient>, period: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let guard = token.clone();

    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        loop {
            tokio::select! {
                () = guard.cancelled() => break,
                _ = interval.tick() => {
                    debug!("Pinging MPD");
                    if let Err(err) = client.run(|c| c.ping()).await {
                        warn!(err = %err, "Keep-alive ping failed");
                    }
                }
            }
        }
    });

    token
}
