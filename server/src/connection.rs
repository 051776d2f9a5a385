//! Transport-independent duplex channel for one client.
//!
//! The transport (a WebSocket task, or a test) owns the receiving end of the
//! outbound queue and feeds inbound traffic through `deliver_message` and
//! `deliver_close`. Game code only sees `send`, `close` and the two hooks.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::mpsc;

use common::{Event, PlayerId, log, trace};

pub type MessageHook = Arc<dyn Fn(Value) -> BoxFuture<'static, ()> + Send + Sync>;
pub type CloseHook = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// What the transport should do next on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Event(Event),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionClosed;

impl fmt::Display for ConnectionClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection is closed")
    }
}

impl std::error::Error for ConnectionClosed {}

#[derive(Default)]
struct Hooks {
    closed: bool,
    on_message: Option<MessageHook>,
    on_close: Option<CloseHook>,
}

struct ConnectionInner {
    label: Mutex<String>,
    outbound: mpsc::UnboundedSender<Outbound>,
    hooks: Mutex<Hooks>,
}

#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("label", &*lock(&self.inner.label))
            .field("closed", &self.is_closed())
            .finish()
    }
}

// Hook state is only touched in short non-awaiting sections, so a poisoned
// lock still holds consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Connection {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection = Self {
            inner: Arc::new(ConnectionInner {
                label: Mutex::new("unassigned".to_string()),
                outbound: tx,
                hooks: Mutex::new(Hooks::default()),
            }),
        };
        (connection, rx)
    }

    /// Tags log lines with the player that owns this connection.
    pub fn assign_player(&self, player_id: &PlayerId) {
        *lock(&self.inner.label) = player_id.to_string();
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner.hooks).closed
    }

    pub fn send(&self, event: &Event) {
        if self.is_closed() {
            trace!("[conn:{}] Not sending {} on a closed connection", lock(&self.inner.label), event.type_name());
            return;
        }
        if let Err(e) = self.inner.outbound.send(Outbound::Event(event.clone())) {
            log!(
                "[conn:{}] Dropped {}: transport is gone ({})",
                lock(&self.inner.label),
                event.type_name(),
                e
            );
        }
    }

    /// Server-side close. Hooks are dropped without running.
    pub fn close(&self) {
        {
            let mut hooks = lock(&self.inner.hooks);
            if hooks.closed {
                return;
            }
            hooks.closed = true;
            hooks.on_message = None;
            hooks.on_close = None;
        }
        let _ = self.inner.outbound.send(Outbound::Close);
        trace!("[conn:{}] Closed by server", lock(&self.inner.label));
    }

    pub fn on_message(&self, hook: MessageHook) -> Result<(), ConnectionClosed> {
        let mut hooks = lock(&self.inner.hooks);
        if hooks.closed {
            return Err(ConnectionClosed);
        }
        hooks.on_message = Some(hook);
        Ok(())
    }

    pub fn on_close(&self, hook: CloseHook) -> Result<(), ConnectionClosed> {
        let mut hooks = lock(&self.inner.hooks);
        if hooks.closed {
            return Err(ConnectionClosed);
        }
        hooks.on_close = Some(hook);
        Ok(())
    }

    /// Called by the transport for every inbound message, one at a time.
    pub async fn deliver_message(&self, raw: Value) {
        let hook = {
            let hooks = lock(&self.inner.hooks);
            if hooks.closed {
                None
            } else {
                hooks.on_message.clone()
            }
        };
        match hook {
            Some(hook) => hook(raw).await,
            None => {
                trace!("[conn:{}] Ignoring message {}", lock(&self.inner.label), raw);
            }
        }
    }

    /// Called by the transport once the peer is gone. Runs the close hook at
    /// most once, and never after a server-side close.
    pub async fn deliver_close(&self) {
        let hook = {
            let mut hooks = lock(&self.inner.hooks);
            if hooks.closed {
                return;
            }
            hooks.closed = true;
            hooks.on_message = None;
            hooks.on_close.take()
        };
        trace!("[conn:{}] Closed by peer", lock(&self.inner.label));
        if let Some(hook) = hook {
            hook().await;
        }
    }
}
