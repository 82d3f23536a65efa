/**
 * WebSocket Connection Handler
 *
 * Upgrades `GET /api` to a WebSocket and drives one connection:
 *
 * - a writer task drains the bounded outbound queue onto the socket
 * - the reader loop decodes text frames in arrival order; `SUB` and `UNSUB`
 *   are handled inline so they apply in that order, data verbs get one
 *   routing task each so slow requests do not hold up later ones
 * - on close, in-flight requests finish, then every subscription the
 *   connection opened is released
 */

use crate::backend::server::state::AppState;
use crate::backend::ws::router::ConnectionContext;
use crate::shared::ServerMessage;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// `GET /api` upgrade handler
pub async fn handle_ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let live = state.connections.fetch_add(1, Ordering::SeqCst) + 1;
    tracing::info!("[WS] Client connected ({} live)", live);

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.config.outbound_capacity);

    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match message.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[WS] Failed to serialize reply {}: {}", message.id(), e);
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                tracing::debug!("[WS] Send failed, closing writer: {}", e);
                break;
            }
        }
    });

    let ctx = Arc::new(ConnectionContext::new(state.services.clone(), tx));
    let mut in_flight = JoinSet::new();

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Some(message) = ctx.decode(text.as_str()).await {
                    if message.method.is_subscription() {
                        ctx.route_message(message).await;
                    } else {
                        let ctx = ctx.clone();
                        in_flight.spawn(async move { ctx.route_message(message).await });
                    }
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                tracing::warn!("[WS] Ignoring binary frame");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[WS] Receive error: {}", e);
                break;
            }
        }

        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                tracing::error!("[WS] Request task failed: {}", e);
            }
        }
    }

    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            tracing::error!("[WS] Request task failed: {}", e);
        }
    }

    let released = ctx.cache().len();
    ctx.cache().clear().await;
    writer.abort();

    let live = state.connections.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
    tracing::info!(
        "[WS] Client disconnected, released {} subscriptions ({} live)",
        released,
        live
    );
}
