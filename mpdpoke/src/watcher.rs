use std::thread;

use mpdpoke_mpd::{
    address::{MpdAddress, MpdPassword},
    client::{Client, TcpOrUnixStream},
    commands::IdleEvent,
    errors::MpdError,
    mpd_client::MpdClient as _,
};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::debug;

use crate::ext::SenderExt;

/// The subscription's event and error channels collapsed into one ordered
/// stream. No events follow a `Closed`.
#[derive(Debug)]
pub enum WatcherEvent {
    Changed(IdleEvent),
    Closed(MpdError),
}

/// A dedicated connection parked in `idle`, reporting changes to the watched
/// subsystem. MPD filters server-side but may still name other subsystems;
/// those come through as-is and are the caller's to skip.
pub struct IdleWatcher {
    rx: UnboundedReceiver<WatcherEvent>,
    stream: TcpOrUnixStream,
}

impl IdleWatcher {
    pub fn connect(
        addr: MpdAddress,
        password: Option<MpdPassword>,
        subsystem: IdleEvent,
    ) -> Result<Self, MpdError> {
        let mut client = Client::init(addr, password, "idle")?;
        let stream = client.stream.try_clone()?;
        let (tx, rx) = unbounded_channel();

        thread::spawn(move || {
            loop {
                match client.idle(Some(subsystem.clone())) {
                    Ok(events) => {
                        for event in events {
                            tx.send_safe(WatcherEvent::Changed(event));
                        }
                    }
                    Err(err) => {
                        tx.send_safe(WatcherEvent::Closed(err));
                        break;
                    }
                }
            }
        });

        Ok(Self { rx, stream })
    }

    /// The next event in delivery order; `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<WatcherEvent> {
        self.rx.recv().await
    }

    /// Unblocks and ends the worker by shutting the socket down.
    pub fn close(&mut self) -> std::io::Result<()> {
        debug!("Closing idle connection");
        self.stream.shutdown_both()
    }
}
