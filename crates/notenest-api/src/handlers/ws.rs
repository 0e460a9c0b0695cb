//! Realtime change feed over WebSocket.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use notenest_core::error::AppError;
use notenest_core::types::change::Subscription;
use notenest_entity::collections::SUBSCRIBABLE;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /ws/{collection}
///
/// Streams every change to the collection as a JSON text frame until the
/// client closes the socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    if !SUBSCRIBABLE.contains(&collection.as_str()) {
        return Err(AppError::not_found(format!("Unknown collection '{collection}'")).into());
    }

    let subscription = state.store.subscribe(&collection);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, subscription)))
}

async fn handle_socket(socket: WebSocket, mut subscription: Subscription) {
    let collection = subscription.collection().to_string();
    let (mut ws_tx, mut ws_rx) = socket.split();
    info!(collection = %collection, "Change feed subscriber connected");

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "Failed to encode change event");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
            },
        }
    }

    subscription.unsubscribe();
    info!(collection = %collection, "Change feed subscriber disconnected");
}
