use std::fmt;

/// Why a move was refused. `Display` is the text sent back in `IllegalMove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    OpponentsTurn,
    InvalidPitIndex(String),
    EmptyPit(usize),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OpponentsTurn => write!(f, "It is opponent's turn."),
            MoveError::InvalidPitIndex(raw) => write!(f, "Invalid pit index: {}", raw),
            MoveError::EmptyPit(pos) => write!(f, "No stones available at pit {}", pos),
        }
    }
}

impl std::error::Error for MoveError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    AwaitingStart,
    InProgress,
    Complete,
}

/// Where the last sown stone ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sowing {
    /// Landed in the mover's own store; the mover plays again.
    ExtraTurn,
    Pass { last_pit: usize },
    /// Landed in an empty pit of the mover; the mirrored opponent pit was taken.
    Capture { last_pit: usize, captured: u32 },
}

impl Sowing {
    pub fn passes_turn(&self) -> bool {
        !matches!(self, Sowing::ExtraTurn)
    }
}
