use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::Mutex;

use common::{Event, PlayerId, SessionId, log, trace};

use crate::connection::{CloseHook, MessageHook};
use crate::lobby::PairedPlayer;
use crate::session_registry::SessionRegistry;
use super::board::winning_seat;
use super::types::{MoveError, SessionStatus, Sowing};

/// Referees one game between two paired players.
///
/// `start`, `on_move` and `shutdown` all run under the same lock, so moves
/// from both players apply one after the other and nothing touches the board
/// once the session is complete.
pub struct GameSession {
    id: SessionId,
    registry: SessionRegistry,
    state: Mutex<SessionState>,
}

struct SessionState {
    players: [PairedPlayer; 2],
    next_player_id: PlayerId,
    status: SessionStatus,
}

impl SessionState {
    fn seat_of(&self, player_id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == player_id)
    }

    fn broadcast(&self, event: &Event) {
        for player in &self.players {
            player.connection.send(event);
        }
    }

    fn board_state(&self) -> Event {
        Event::board_state(
            self.players.iter().map(|p| (&p.id, p.pits.as_array())),
            self.next_player_id.clone(),
        )
    }

    fn play(&mut self, player_id: &PlayerId, raw: &Value) -> Result<Sowing, MoveError> {
        if player_id != &self.next_player_id {
            return Err(MoveError::OpponentsTurn);
        }
        let seat = self.seat_of(player_id).ok_or(MoveError::OpponentsTurn)?;

        let [first, second] = &mut self.players;
        let (mover, opponent) = if seat == 0 {
            (first, second)
        } else {
            (second, first)
        };

        let pos = mover.pits.check_move(raw)?;
        let sowing = mover.pits.sow(pos, &mut opponent.pits);
        if sowing.passes_turn() {
            self.next_player_id = mover.opponent_id.clone();
        }
        Ok(sowing)
    }

    fn winner(&self) -> Option<&PlayerId> {
        if !self.players.iter().any(|p| p.pits.is_exhausted()) {
            return None;
        }
        let [first, second] = &self.players;
        let seat = winning_seat([&first.pits, &second.pits]);
        Some(&self.players[seat].id)
    }
}

impl GameSession {
    /// Seat 0 moves first.
    pub fn new(
        id: SessionId,
        players: [PairedPlayer; 2],
        registry: SessionRegistry,
    ) -> Arc<Self> {
        let next_player_id = players[0].id.clone();
        Arc::new(Self {
            id,
            registry,
            state: Mutex::new(SessionState {
                players,
                next_player_id,
                status: SessionStatus::AwaitingStart,
            }),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    pub async fn next_player_id(&self) -> PlayerId {
        self.state.lock().await.next_player_id.clone()
    }

    pub async fn board_state(&self) -> Event {
        self.state.lock().await.board_state()
    }

    /// Announces the pairing and binds both connections to this session.
    /// Calling it again is a no-op.
    pub async fn start(self: &Arc<Self>) {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::AwaitingStart {
            return;
        }

        let mut lost = Vec::new();
        for player in &state.players {
            player.connection.send(&Event::ready_to_start(
                player.opponent_id.clone(),
                state.next_player_id.clone(),
            ));

            let bound = player
                .connection
                .on_message(self.message_hook(player.id.clone()))
                .and_then(|()| player.connection.on_close(self.close_hook()));
            if bound.is_err() {
                lost.push(player.id.clone());
            }
        }
        state.status = SessionStatus::InProgress;
        trace!("{} is started", self);

        if !lost.is_empty() {
            for player_id in &lost {
                log!("[session:{}] Player {} left before the start", self.id, player_id);
            }
            self.shutdown_locked(&mut state).await;
        }
    }

    fn message_hook(self: &Arc<Self>, player_id: PlayerId) -> MessageHook {
        let session = Arc::clone(self);
        Arc::new(move |raw| {
            let session = Arc::clone(&session);
            let player_id = player_id.clone();
            async move { session.on_move(&player_id, raw).await }.boxed()
        })
    }

    fn close_hook(self: &Arc<Self>) -> CloseHook {
        let session = Arc::clone(self);
        Box::new(move || async move { session.shutdown().await }.boxed())
    }

    /// Validates and applies one move, then reports the outcome.
    pub async fn on_move(&self, player_id: &PlayerId, raw: Value) {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::InProgress {
            trace!("[session:{}] Dropping move from {} ({:?})", self.id, player_id, state.status);
            return;
        }
        let Some(seat) = state.seat_of(player_id) else {
            log!("[session:{}] Move from unknown player {}", self.id, player_id);
            return;
        };
        trace!("[session:{}] New move from {}: {}", self.id, player_id, raw);

        match state.play(player_id, &raw) {
            Err(e) => {
                trace!("[session:{}] Illegal move from {}: {}", self.id, player_id, e);
                state.players[seat]
                    .connection
                    .send(&Event::illegal_move(e.to_string()));
            }
            Ok(sowing) => {
                trace!("[session:{}] {} sowed: {:?}", self.id, player_id, sowing);
                if let Some(winner_id) = state.winner().cloned() {
                    state.broadcast(&Event::game_over(winner_id.clone()));
                    trace!("{} is completed, winner {}", self, winner_id);
                    self.shutdown_locked(&mut state).await;
                } else {
                    let board_state = state.board_state();
                    state.broadcast(&board_state);
                }
            }
        }
    }

    /// Deregisters the session and closes both connections, once.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        self.shutdown_locked(&mut state).await;
    }

    async fn shutdown_locked(&self, state: &mut SessionState) {
        if state.status == SessionStatus::Complete {
            return;
        }
        state.status = SessionStatus::Complete;

        self.registry.remove(&self.id).await;
        for player in &state.players {
            player.connection.close();
        }
        trace!("Closed {}", self);
    }

    #[cfg(test)]
    pub(crate) async fn hand_turn_to(&self, player_id: &PlayerId) {
        self.state.lock().await.next_player_id = player_id.clone();
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Game[{}]", self.id)
    }
}
