//! In-memory transports for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coincap_core::{CoinCapError, Result};
use tokio::sync::mpsc;

use crate::connection::{Connection, Connector};

pub(crate) type Script = mpsc::UnboundedSender<Result<Vec<u8>>>;

/// Connection fed frame-by-frame from a test.
pub(crate) struct ScriptedConnection {
    frames: mpsc::UnboundedReceiver<Result<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn next_frame(&mut self) -> Result<Vec<u8>> {
        match self.frames.recv().await {
            Some(frame) => frame,
            None => Err(CoinCapError::Read("script ended".into())),
        }
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out one [`ScriptedConnection`] and records every URL it is asked
/// to open.
pub(crate) struct ScriptedConnector {
    conn: Mutex<Option<ScriptedConnection>>,
    pub opened: Mutex<Vec<String>>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedConnector {
    pub fn new() -> (Self, Script) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closes = Arc::new(AtomicUsize::new(0));
        let conn = ScriptedConnection { frames: rx, closes: Arc::clone(&closes) };
        let connector =
            Self { conn: Mutex::new(Some(conn)), opened: Mutex::new(Vec::new()), closes };
        (connector, tx)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Conn = ScriptedConnection;

    async fn open(&self, url: &str) -> Result<ScriptedConnection> {
        self.opened.lock().unwrap().push(url.to_string());
        self.conn
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| CoinCapError::Connect("already opened".into()))
    }
}

/// Connector whose handshake always fails.
pub(crate) struct RefusingConnector;

#[async_trait]
impl Connector for RefusingConnector {
    type Conn = ScriptedConnection;

    async fn open(&self, url: &str) -> Result<ScriptedConnection> {
        Err(CoinCapError::Connect(format!("{url}: connection refused")))
    }
}

/// Endless feed of `0, 1, 2, ...` JSON frames, yielding between frames.
pub(crate) struct CountingConnection {
    next: u64,
    pub closes: Arc<AtomicUsize>,
}

impl CountingConnection {
    pub fn new() -> Self {
        Self { next: 0, closes: Arc::new(AtomicUsize::new(0)) }
    }
}

#[async_trait]
impl Connection for CountingConnection {
    async fn next_frame(&mut self) -> Result<Vec<u8>> {
        tokio::task::yield_now().await;
        let n = self.next;
        self.next += 1;
        Ok(n.to_string().into_bytes())
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
