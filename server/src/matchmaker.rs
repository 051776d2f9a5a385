use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::sync::Mutex;

use common::{Event, PlayerId, SessionId, trace};

use crate::connection::{CloseHook, Connection};
use crate::games::kalah::GameSession;
use crate::lobby::ConnectedPlayer;
use crate::session_registry::SessionRegistry;

/// Counts shown on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStats {
    pub pending_players: usize,
    pub sessions: usize,
}

/// Pairs arriving connections in FIFO order and starts their sessions.
#[derive(Clone, Default)]
pub struct Matchmaker {
    pending: Arc<Mutex<VecDeque<ConnectedPlayer>>>,
    registry: SessionRegistry,
}

impl std::fmt::Debug for Matchmaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matchmaker").finish()
    }
}

impl Matchmaker {
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            registry,
        }
    }

    /// Entry point for every new connection: either queues the player or
    /// pairs it with the oldest live waiter and starts a session.
    ///
    /// A waiter that disconnects after being dequeued but before the session
    /// binds its hooks ends that session at start, and the arrival is closed
    /// with it rather than queued again.
    pub async fn join(&self, connection: Connection) {
        let player = ConnectedPlayer::new(connection);
        trace!("Incoming {}", player);
        player
            .connection
            .send(&Event::waiting_for_opponent(player.id.clone()));

        // Poll and enqueue happen under one lock so two arrivals can never
        // both end up waiting while the other is available.
        let waiter = {
            let mut pending = self.pending.lock().await;
            match Self::pop_live(&mut pending) {
                Some(waiter) => waiter,
                None => {
                    if player
                        .connection
                        .on_close(self.leave_queue_hook(player.id.clone()))
                        .is_err()
                    {
                        trace!("{} left before it could be queued", player);
                        return;
                    }
                    trace!("Queued {}", player);
                    pending.push_back(player);
                    return;
                }
            }
        };

        let upper_id = waiter.id.clone();
        let lower_id = player.id.clone();
        let session = GameSession::new(
            SessionId::generate(),
            [waiter.upgrade(lower_id.clone()), player.upgrade(upper_id.clone())],
            self.registry.clone(),
        );
        self.registry.insert(session.clone()).await;
        session.start().await;
        trace!("Started {} with {} and {}", session, upper_id, lower_id);
    }

    fn pop_live(pending: &mut VecDeque<ConnectedPlayer>) -> Option<ConnectedPlayer> {
        while let Some(waiter) = pending.pop_front() {
            if waiter.connection.is_closed() {
                trace!("Discarding closed {}", waiter);
                continue;
            }
            return Some(waiter);
        }
        None
    }

    fn leave_queue_hook(&self, player_id: PlayerId) -> CloseHook {
        let matchmaker = self.clone();
        Box::new(move || {
            async move {
                matchmaker.leave_queue(&player_id).await;
            }
            .boxed()
        })
    }

    /// Drops a waiting player. Returns false if it was not queued (already
    /// paired or already removed).
    pub async fn leave_queue(&self, player_id: &PlayerId) -> bool {
        let mut pending = self.pending.lock().await;
        let before = pending.len();
        pending.retain(|p| &p.id != player_id);
        let removed = pending.len() != before;
        if removed {
            trace!("Player {} left the queue", player_id);
        }
        removed
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn session_count(&self) -> usize {
        self.registry.len().await
    }

    pub async fn stats(&self) -> LobbyStats {
        LobbyStats {
            pending_players: self.pending_count().await,
            sessions: self.session_count().await,
        }
    }
}
