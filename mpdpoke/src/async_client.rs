use std::thread;

use mpdpoke_mpd::errors::MpdError;
use tokio::sync::{mpsc, oneshot};

pub type MpdClient = mpdpoke_mpd::client::Client<'static>;

type CmdFn = Box<dyn FnOnce(&mut MpdClient) -> Result<(), MpdError> + Send + 'static>;

enum Msg {
    Run { f: CmdFn, done: oneshot::Sender<Result<(), MpdError>> },
    Shutdown { done: oneshot::Sender<Result<(), MpdError>> },
}

fn worker_loop(mut client: MpdClient, mut rx: mpsc::Receiver<Msg>) {
    thread::spawn(move || {
        while let Some(msg) = rx.blocking_recv() {
            match msg {
                Msg::Run { f, done } => {
                    let r = f(&mut client);
                    let _ = done.send(r);
                }
                Msg::Shutdown { done } => {
                    let _ = done.send(client.shutdown().map_err(MpdError::from));
                    break;
                }
            }
        }
    });
}

/// Async facade over the blocking command connection. A single worker thread
/// owns the client and serves requests strictly one at a time, which keeps
/// keep-alive pings and on-demand queries from interleaving on the wire.
#[derive(Debug)]
pub struct AsyncClient {
    tx: mpsc::Sender<Msg>,
}

impl AsyncClient {
    pub fn new(client: MpdClient) -> Self {
        let (tx, rx) = mpsc::channel(64);

        worker_loop(client, rx);

        Self { tx }
    }

    pub async fn run<F, T>(&self, f: F) -> Result<T, MpdError>
    where
        F: FnOnce(&mut MpdClient) -> Result<T, MpdError> + Send + 'static,
        T: Send + 'static,
    {
        let (typed_tx, typed_rx) = oneshot::channel::<Result<T, MpdError>>();
        let wrapper = Box::new(move |client: &mut MpdClient| -> Result<(), MpdError> {
            let r = f(client);
            let _ = typed_tx.send(r);
            Ok(())
        });

        let (done_tx, done_rx) = oneshot::channel();

        self.tx
            .send(Msg::Run { f: wrapper, done: done_tx })
            .await
            .map_err(|_| MpdError::ClientClosed)?;

        done_rx.await.map_err(|_| MpdError::ClientClosed)??;
        typed_rx.await.map_err(|_| MpdError::ClientClosed)?
    }

    /// Closes the connection and stops the worker. Requests issued afterwards
    /// fail with [`MpdError::ClientClosed`].
    pub async fn shutdown(&self) -> Result<(), MpdError> {
        let (done_tx, done_rx) = oneshot::channel();

        self.tx.send(Msg::Shutdown { done: done_tx }).await.map_err(|_| MpdError::ClientClosed)?;

        done_rx.await.map_err(|_| MpdError::ClientClosed)?
    }
}
