mod identity;

pub use identity::{ConnectedPlayer, PairedPlayer};
