//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.
//! The receive task owns the connection's `ViewSession`, so selection events
//! are processed one at a time without shared state.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::SessionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::dataset::Datasets;
use crate::view::ViewSession;

/// WebSocket upgrade handler
///
/// This is the entry point for WebSocket connections.
/// It upgrades the HTTP connection to WebSocket and starts message handling.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = Arc::clone(&state.ws_hub);
    let datasets = Arc::clone(&state.datasets);
    ws.on_upgrade(move |socket| handle_socket(socket, hub, datasets))
}

fn to_text(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, hub: Arc<SessionHub>, datasets: Arc<Datasets>) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending messages to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Register with hub
    let connection_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected WebSocket connection");
            // Send error message before closing
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Some(text) = to_text(&error_msg) {
                let _ = sender.send(text).await;
            }
            return;
        }
    };

    // Every session starts unfiltered
    let session = ViewSession::new(datasets);
    let greeting = [
        ServerMessage::Connected {
            connection_id: connection_id.clone(),
        },
        ServerMessage::from(session.initial_render()),
    ];
    for msg in &greeting {
        let Some(text) = to_text(msg) else { continue };
        if sender.send(text).await.is_err() {
            tracing::error!(connection_id = %connection_id, "Failed to send initial messages");
            hub.unregister(&connection_id).await;
            return;
        }
    }

    let conn_id_for_send = connection_id.clone();

    // Task to forward messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let Some(text) = to_text(&msg) else { continue };
            if sender.send(text).await.is_err() {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let conn_id_for_recv = connection_id.clone();

    // Task to receive messages from WebSocket and handle them
    let mut recv_task = tokio::spawn(async move {
        let mut session = session;
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &conn_id_for_recv, &mut session, msg).await
                    {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    // Cleanup: unregister from hub
    hub.unregister(&connection_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &SessionHub,
    connection_id: &str,
    session: &mut ViewSession,
    message: Message,
) -> bool {
    let reply = match message {
        Message::Text(text) => match parse_client_message(&text) {
            Ok(client_msg) => {
                let reply = respond(session, client_msg);
                if matches!(reply, Some(ServerMessage::Figure { .. })) {
                    if let Err(e) = hub.record_state(connection_id, session.state()).await {
                        tracing::debug!(
                            connection_id = %connection_id,
                            error = %e,
                            "Could not record view state"
                        );
                    }
                }
                reply
            }
            Err(error_msg) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    text = %text,
                    "Invalid client message"
                );
                Some(error_msg)
            }
        },
        Message::Binary(_) => Some(ServerMessage::Error {
            message: "Binary messages not supported".to_string(),
        }),
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => None,
        Message::Close(_) => {
            tracing::debug!(connection_id = %connection_id, "Client requested close");
            return false;
        }
    };

    if let Some(reply) = reply {
        if hub.send_to(connection_id, reply).await.is_err() {
            return false;
        }
    }
    true
}

/// Parse a text frame, producing the error reply for malformed input
fn parse_client_message(text: &str) -> Result<ClientMessage, ServerMessage> {
    serde_json::from_str::<ClientMessage>(text).map_err(|e| ServerMessage::Error {
        message: format!("Invalid message format: {}", e),
    })
}

/// Apply a parsed client message to the session
///
/// Rejected selections produce no reply.
fn respond(session: &mut ViewSession, message: ClientMessage) -> Option<ServerMessage> {
    match message {
        ClientMessage::Select { value } => session
            .handle(value.as_deref())
            .map(ServerMessage::from),
        ClientMessage::Ping => Some(ServerMessage::Pong),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_datasets;
    use crate::dataset::District;
    use crate::view::ViewState;
    use crate::websocket::hub::HubConfig;

    fn session() -> ViewSession {
        ViewSession::new(Arc::new(sample_datasets()))
    }

    #[test]
    fn test_select_replies_with_figure() {
        let mut session = session();
        let reply = respond(
            &mut session,
            ClientMessage::Select {
                value: Some("Mitte".to_string()),
            },
        );
        match reply {
            Some(ServerMessage::Figure {
                slot,
                district,
                schools,
                ..
            }) => {
                assert_eq!(slot, "school-map");
                assert_eq!(district, Some(District::Mitte));
                assert_eq!(schools, 3);
            }
            other => panic!("Expected figure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_select_is_silent() {
        let mut session = session();
        let reply = respond(
            &mut session,
            ClientMessage::Select {
                value: Some("Atlantis".to_string()),
            },
        );
        assert!(reply.is_none());
        assert_eq!(session.state(), ViewState::Unfiltered);
    }

    #[test]
    fn test_ping_pong() {
        let mut session = session();
        assert!(matches!(
            respond(&mut session, ClientMessage::Ping),
            Some(ServerMessage::Pong)
        ));
    }

    #[test]
    fn test_malformed_message_reply() {
        match parse_client_message("{not json") {
            Err(ServerMessage::Error { message }) => {
                assert!(message.starts_with("Invalid message format"))
            }
            other => panic!("Expected error reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_message_flow_through_hub() {
        let hub = SessionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        let mut session = session();

        let open = handle_ws_message(
            &hub,
            &id,
            &mut session,
            Message::Text(r#"{"type":"select","value":"Pankow"}"#.to_string()),
        )
        .await;
        assert!(open);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Figure { schools: 1, .. })));
        assert_eq!(hub.stats().await.filtered, 1);

        // Rejected selection: nothing is sent
        handle_ws_message(
            &hub,
            &id,
            &mut session,
            Message::Text(r#"{"type":"select","value":"Atlantis"}"#.to_string()),
        )
        .await;
        assert!(rx.try_recv().is_err());
        assert_eq!(session.state(), ViewState::FilteredBy(District::Pankow));

        // Malformed input keeps the connection open
        let open = handle_ws_message(&hub, &id, &mut session, Message::Text("[]".to_string())).await;
        assert!(open);
        assert!(matches!(rx.try_recv(), Ok(ServerMessage::Error { .. })));

        let open = handle_ws_message(&hub, &id, &mut session, Message::Close(None)).await;
        assert!(!open);
    }
}
