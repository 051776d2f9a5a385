//! JSON messages exchanged with game clients.
//!
//! Every outbound message is a single JSON object tagged by `type`, with
//! camelCase field names. Inbound traffic is just the pit index the player
//! wants to sow, sent as a bare JSON value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PlayerId;

/// Slots per side: six sowing pits followed by the store.
pub const BOARD_SLOTS: usize = 7;

pub type PitArray = [u32; BOARD_SLOTS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Event {
    WaitingForOpponent {
        player_id: PlayerId,
    },
    ReadyToStart {
        opponent_id: PlayerId,
        next_player_id: PlayerId,
    },
    BoardState {
        board: BTreeMap<PlayerId, PitArray>,
        next_player_id: PlayerId,
    },
    IllegalMove {
        reason: String,
    },
    GameOver {
        winner_id: PlayerId,
    },
}

impl Event {
    pub fn waiting_for_opponent(player_id: PlayerId) -> Self {
        Event::WaitingForOpponent { player_id }
    }

    pub fn ready_to_start(opponent_id: PlayerId, next_player_id: PlayerId) -> Self {
        Event::ReadyToStart {
            opponent_id,
            next_player_id,
        }
    }

    pub fn board_state<'a>(
        sides: impl IntoIterator<Item = (&'a PlayerId, &'a PitArray)>,
        next_player_id: PlayerId,
    ) -> Self {
        let board = sides
            .into_iter()
            .map(|(id, pits)| (id.clone(), *pits))
            .collect();
        Event::BoardState {
            board,
            next_player_id,
        }
    }

    pub fn illegal_move(reason: impl Into<String>) -> Self {
        Event::IllegalMove {
            reason: reason.into(),
        }
    }

    pub fn game_over(winner_id: PlayerId) -> Self {
        Event::GameOver { winner_id }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Event::WaitingForOpponent { .. } => "WaitingForOpponent",
            Event::ReadyToStart { .. } => "ReadyToStart",
            Event::BoardState { .. } => "BoardState",
            Event::IllegalMove { .. } => "IllegalMove",
            Event::GameOver { .. } => "GameOver",
        }
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to encode {}: {}", self.type_name(), e))
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to decode event: {}", e))
    }
}

/// Turns an inbound text frame into the move value. Frames that are not JSON
/// are kept as a JSON string so they still surface as an invalid pit index.
pub fn decode_move_frame(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Reads a pit index from a move value. Integers and strings holding an
/// integer are accepted; on failure the value's JSON text is returned.
pub fn parse_pit_index(raw: &Value) -> Result<i64, String> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| raw.to_string())
}
