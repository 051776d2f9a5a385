mod board;
mod session;
mod types;

pub use board::{INITIAL_STONES, PIT_COUNT, Pits, STORE, winning_seat};
pub use session::GameSession;
pub use types::{MoveError, SessionStatus, Sowing};
