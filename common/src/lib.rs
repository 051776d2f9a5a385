pub mod config;
pub mod id_generator;
pub mod identifiers;
pub mod logger;
pub mod protocol;

pub use identifiers::*;
pub use protocol::{BOARD_SLOTS, Event, PitArray};
