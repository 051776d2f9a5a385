use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use common::protocol::decode_move_frame;
use common::{log, trace};

use crate::connection::{Connection, Outbound};
use crate::matchmaker::Matchmaker;

/// Bridges one WebSocket to a `Connection` handed to the matchmaker.
pub async fn handle_websocket(socket: WebSocket, matchmaker: Matchmaker) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (connection, mut outbound) = Connection::new();

    let mut send_task = tokio::spawn(async move {
        while let Some(item) = outbound.recv().await {
            match item {
                Outbound::Event(event) => {
                    let text = match event.to_json() {
                        Ok(text) => text,
                        Err(e) => {
                            log!("Failed to encode {}: {}", event.type_name(), e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    matchmaker.join(connection.clone()).await;

    loop {
        tokio::select! {
            _ = &mut send_task => break,
            frame = ws_receiver.next() => {
                let Some(frame) = frame else { break };
                match frame {
                    Ok(Message::Text(text)) => {
                        connection.deliver_message(decode_move_frame(text.as_str())).await;
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        trace!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    connection.deliver_close().await;
    send_task.abort();
}
