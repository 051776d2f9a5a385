use std::fmt;

use common::PlayerId;

use crate::connection::Connection;
use crate::games::kalah::Pits;

/// A client that has a connection but no opponent yet.
#[derive(Debug, Clone)]
pub struct ConnectedPlayer {
    pub id: PlayerId,
    pub connection: Connection,
}

impl ConnectedPlayer {
    pub fn new(connection: Connection) -> Self {
        let id = PlayerId::generate();
        connection.assign_player(&id);
        Self { id, connection }
    }

    /// Keeps the id and connection, adds the opponent and a fresh side.
    pub fn upgrade(self, opponent_id: PlayerId) -> PairedPlayer {
        PairedPlayer {
            id: self.id,
            connection: self.connection,
            opponent_id,
            pits: Pits::default(),
        }
    }
}

impl fmt::Display for ConnectedPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectedPlayer[{}]", self.id)
    }
}

/// A client seated in a game, owning its side of the board.
#[derive(Debug)]
pub struct PairedPlayer {
    pub id: PlayerId,
    pub connection: Connection,
    pub opponent_id: PlayerId,
    pub pits: Pits,
}

impl fmt::Display for PairedPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairedPlayer[{}]", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_keeps_identity_and_sets_fresh_board() {
        let (connection, _rx) = Connection::new();
        let player = ConnectedPlayer::new(connection);
        let id = player.id.clone();
        let opponent = PlayerId::from("opponent");

        let paired = player.upgrade(opponent.clone());

        assert_eq!(paired.id, id);
        assert_eq!(paired.opponent_id, opponent);
        assert_eq!(paired.pits, Pits::default());
    }

    #[test]
    fn test_each_connected_player_gets_its_own_id() {
        let (first, _rx1) = Connection::new();
        let (second, _rx2) = Connection::new();
        assert_ne!(ConnectedPlayer::new(first).id, ConnectedPlayer::new(second).id);
    }
}
