//! Generic long-lived subscription over one [`Connection`].
//!
//! Each `Stream<T>` runs as one tokio task (the *pump*) that:
//! 1. Reads the next frame from the connection.
//! 2. Decodes it into `T`.
//! 3. Hands the value to the consumer, racing the stop signal.
//!
//! The pump is the only sender on the delivery channel and the only owner of
//! the connection. On exit (stop, read failure, decode failure) it records
//! the terminal error, closes the connection, drops the sender, and then
//! flips the completion signal. [`Stream::close`] flips the stop signal once
//! and waits for that completion.
//!
//! # Limitation
//!
//! Stop is observed only at the delivery point or after a frame read
//! returns; an in-flight `next_frame` is never interrupted. `close()` latency
//! is therefore bounded by how quickly the transport yields its next frame
//! or error.

use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use coincap_core::{CoinCapError, Result};
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::connection::{Connection, Connector};

/// Turns one frame into a value.
pub type Decoder<T> = fn(&[u8]) -> Result<T>;

/// State shared between the pump and every [`Closer`].
struct Shared {
    /// One-shot stop request, set by `close()` or by dropping the stream.
    stop: watch::Sender<bool>,
    /// One-shot completion, set by the pump after releasing everything.
    done: watch::Receiver<bool>,
    /// Terminal error; written once by the pump before the channel closes.
    error: Mutex<Option<CoinCapError>>,
    label: String,
}

impl Shared {
    /// Returns `true` only for the call that actually set the flag.
    fn request_stop(&self) -> bool {
        self.stop.send_if_modified(|stopped| !std::mem::replace(stopped, true))
    }

    async fn wait_done(&self) {
        let mut done = self.done.clone();
        // Err means the pump task is gone without signalling (runtime
        // shutdown or panic); either way there is nothing left to wait for.
        let _ = done.wait_for(|finished| *finished).await;
    }

    fn last_error(&self) -> Option<CoinCapError> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// A live subscription yielding decoded values of `T`.
///
/// Values arrive in frame order. The sequence ends when the pump stops,
/// after which [`last_error`](Self::last_error) tells whether it stopped
/// because of a transport or decode failure.
pub struct Stream<T> {
    values: mpsc::Receiver<T>,
    shared: Arc<Shared>,
}

/// Cloneable handle that closes a [`Stream`] from another task.
#[derive(Clone)]
pub struct Closer {
    shared: Arc<Shared>,
}

impl<T: Send + 'static> Stream<T> {
    /// Connect to `url` and decode every frame as JSON.
    pub async fn open<C: Connector + ?Sized>(connector: &C, url: &str) -> Result<Self>
    where
        T: DeserializeOwned,
    {
        Self::open_with(connector, url, decode_json::<T>).await
    }

    /// Connect to `url` and decode frames with `decode`.
    pub async fn open_with<C: Connector + ?Sized>(
        connector: &C,
        url: &str,
        decode: Decoder<T>,
    ) -> Result<Self> {
        let conn = connector.open(url).await?;
        info!("[stream] connected to {url}");
        Ok(Self::spawn(conn, decode, url))
    }

    /// Start the pump over an already-open connection.
    pub fn spawn<N: Connection>(conn: N, decode: Decoder<T>, label: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            stop: stop_tx,
            done: done_rx,
            error: Mutex::new(None),
            label: label.into(),
        });

        tokio::spawn(pump(conn, decode, tx, stop_rx, done_tx, Arc::clone(&shared)));

        Self { values: rx, shared }
    }
}

impl<T> Stream<T> {
    /// Next value, or `None` once the pump has terminated.
    pub async fn next(&mut self) -> Option<T> {
        self.values.recv().await
    }

    /// The value sequence as a [`futures_util::Stream`], borrowing this
    /// stream so `close()` stays the only way to end it early.
    pub fn values(&mut self) -> impl futures_util::Stream<Item = T> + '_ {
        self
    }

    /// Handle for closing this stream from elsewhere.
    pub fn closer(&self) -> Closer {
        Closer { shared: Arc::clone(&self.shared) }
    }

    /// Stop the pump and wait until it has released the connection.
    ///
    /// Safe to call repeatedly. A value the pump had already handed over
    /// but the consumer had not yet taken is discarded, so `next()` returns
    /// `None` right after this.
    pub async fn close(&mut self) {
        self.closer().close().await;
        self.values.close();
        while self.values.try_recv().is_ok() {}
    }

    /// Terminal error once the sequence is exhausted; `None` after a clean
    /// close.
    pub fn last_error(&self) -> Option<CoinCapError> {
        self.shared.last_error()
    }

    /// Whether the pump has finished and released the connection.
    pub fn is_finished(&self) -> bool {
        *self.shared.done.borrow()
    }

    /// URL (or label) the stream was opened with.
    pub fn label(&self) -> &str {
        &self.shared.label
    }
}

impl Closer {
    /// Request stop (once) and wait for the pump to finish.
    pub async fn close(&self) {
        if self.shared.request_stop() {
            debug!("[stream] {} stop requested", self.shared.label);
        }
        self.shared.wait_done().await;
    }

    pub fn is_finished(&self) -> bool {
        *self.shared.done.borrow()
    }
}

impl<T> Drop for Stream<T> {
    fn drop(&mut self) {
        // The pump notices at its next delivery attempt.
        self.shared.request_stop();
    }
}

impl<T> Unpin for Stream<T> {}

impl<T> futures_util::Stream for Stream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().values.poll_recv(cx)
    }
}

/// Resolves once stop is requested (or every stop sender is gone).
async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

fn decode_json<T: DeserializeOwned>(frame: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(frame)?)
}

/// Read → decode → deliver, until stopped or failed.
async fn pump<N: Connection, T: Send + 'static>(
    mut conn: N,
    decode: Decoder<T>,
    tx: mpsc::Sender<T>,
    mut stop: watch::Receiver<bool>,
    done: watch::Sender<bool>,
    shared: Arc<Shared>,
) {
    let label = shared.label.as_str();

    let failure = loop {
        let frame = match conn.next_frame().await {
            Ok(frame) => frame,
            Err(e) => break Some(e),
        };
        let value = match decode(&frame) {
            Ok(value) => value,
            Err(e) => break Some(e),
        };

        tokio::select! {
            biased;

            () = stopped(&mut stop) => {
                debug!("[stream] {label} stop observed at delivery");
                break None;
            }

            sent = tx.send(value) => {
                if sent.is_err() {
                    debug!("[stream] {label} consumer gone");
                    break None;
                }
            }
        }
    };

    // A stop requested before the failure was observed wins.
    let failure = failure.filter(|_| !*stop.borrow());
    match &failure {
        Some(e) => warn!("[stream] {label} terminated: {e}"),
        None => info!("[stream] {label} closed"),
    }
    *shared.error.lock().unwrap_or_else(PoisonError::into_inner) = failure;

    conn.close().await;
    drop(tx);
    done.send_replace(true);
}
