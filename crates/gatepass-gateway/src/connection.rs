use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dispatcher::Dispatcher;

/// Handle one dashboard viewer connection.
///
/// The admin token was already validated at the HTTP upgrade layer, so the
/// socket goes straight into the event loop: every broadcast event is
/// forwarded as a JSON text frame until either side closes. No per-viewer
/// state is kept beyond the live socket; connects and disconnects are only
/// logged.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher) {
    let viewer_id = Uuid::new_v4();
    let viewers = dispatcher.viewer_connected();
    info!("Dashboard viewer {} connected ({} online)", viewer_id, viewers);

    let (mut sender, mut receiver) = socket.split();
    let mut events = dispatcher.subscribe();

    // Forward broadcast events -> client.
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Viewer event stream lagged by {} events", n);
                    continue;
                }
                Err(_) => break,
            };

            let frame = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Failed to encode dashboard event: {}", e);
                    continue;
                }
            };

            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain client frames; viewers send nothing meaningful, but reading keeps
    // the protocol (ping/pong, close) serviced.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            if let Message::Close(_) = frame {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let viewers = dispatcher.viewer_disconnected();
    info!(
        "Dashboard viewer {} disconnected ({} online)",
        viewer_id, viewers
    );
}
