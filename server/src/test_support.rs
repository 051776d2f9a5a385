use serde_json::Value;
use tokio::sync::mpsc;

use common::{Event, PlayerId};

use crate::connection::{Connection, Outbound};
use crate::games::kalah::Pits;
use crate::lobby::PairedPlayer;
use crate::matchmaker::Matchmaker;

fn over_the_wire(event: &Event) -> Event {
    let text = event.to_json().unwrap();
    Event::from_json(&text).unwrap()
}

/// A fake client holding the far end of a `Connection`.
pub(crate) struct TestClient {
    pub id: PlayerId,
    pub connection: Connection,
    rx: mpsc::UnboundedReceiver<Outbound>,
}

impl TestClient {
    pub fn connect(name: &str) -> Self {
        let (connection, rx) = Connection::new();
        let id = PlayerId::from(name);
        connection.assign_player(&id);
        Self { id, connection, rx }
    }

    /// Joins through the matchmaker and learns the assigned id.
    pub async fn join(matchmaker: &Matchmaker) -> Self {
        let (connection, rx) = Connection::new();
        matchmaker.join(connection.clone()).await;
        let mut client = Self {
            id: PlayerId::from("unassigned"),
            connection,
            rx,
        };
        match client.next_event() {
            Event::WaitingForOpponent { player_id } => client.id = player_id,
            other => panic!("expected WaitingForOpponent, got {:?}", other),
        }
        client
    }

    pub fn seat(&self, opponent_id: PlayerId, pits: Pits) -> PairedPlayer {
        PairedPlayer {
            id: self.id.clone(),
            connection: self.connection.clone(),
            opponent_id,
            pits,
        }
    }

    pub async fn play(&self, raw: Value) {
        self.connection.deliver_message(raw).await;
    }

    pub async fn disconnect(&self) {
        self.connection.deliver_close().await;
    }

    /// Next event as the peer would read it off the wire.
    pub fn next_event(&mut self) -> Event {
        match self.rx.try_recv() {
            Ok(Outbound::Event(event)) => over_the_wire(&event),
            other => panic!("expected an event for {}, got {:?}", self.id, other),
        }
    }

    pub fn expect_closed(&mut self) {
        match self.rx.try_recv() {
            Ok(Outbound::Close) => {}
            other => panic!("expected close for {}, got {:?}", self.id, other),
        }
    }

    pub fn assert_silent(&mut self) {
        if let Ok(outbound) = self.rx.try_recv() {
            panic!("expected nothing for {}, got {:?}", self.id, outbound);
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(outbound) = self.rx.try_recv() {
            if let Outbound::Event(event) = outbound {
                events.push(over_the_wire(&event));
            }
        }
        events
    }
}
