/**
 * WebSocket Entity Router
 *
 * Turns one inbound client message into one service call and one reply.
 * `SUB` messages instead register a subscription whose changes are pushed as
 * `{id, event}` envelopes carrying the id of the `SUB` message.
 *
 * # Replies
 *
 * - Data verbs reply `{id, success, data?}`, with a fixed `message` on failure
 * - `SUB` replies `{id, success: true}` once the subscription is live, and
 *   nothing if it could not be opened
 * - `UNSUB` never replies
 * - Unknown verbs, routes and unparseable frames get `success: false` with a
 *   fixed message
 */

use crate::backend::realtime::{ChangeCallback, Unsubscribe};
use crate::backend::services::Services;
use crate::backend::ws::cache::SubscriptionCache;
use crate::shared::message::{RequestError, INVALID_MESSAGE};
use crate::shared::{ChangeEvent, ClientMessage, Document, EntityKind, RouteRequest, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Outbound half of a connection
///
/// Bounded: replies wait for room, subscription pushes are dropped when the
/// client is not keeping up.
pub type Outbound = mpsc::Sender<ServerMessage>;

/// Everything one WebSocket connection needs to route its messages
pub struct ConnectionContext {
    services: Services,
    cache: SubscriptionCache,
    outbound: Outbound,
}

impl ConnectionContext {
    pub fn new(services: Services, outbound: Outbound) -> Self {
        Self {
            services,
            cache: SubscriptionCache::new(),
            outbound,
        }
    }

    pub fn cache(&self) -> &SubscriptionCache {
        &self.cache
    }

    async fn send(&self, message: ServerMessage) {
        if self.outbound.send(message).await.is_err() {
            tracing::debug!("[Router] Connection closed, dropping reply");
        }
    }

    /// Decode one text frame
    ///
    /// A frame that does not decode is answered with `Invalid message.` when
    /// it carries an id, and dropped otherwise.
    pub async fn decode(&self, text: &str) -> Option<ClientMessage> {
        let error = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => return Some(message),
            Err(e) => e,
        };

        let id = serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string));
        match id {
            Some(id) => {
                tracing::warn!("[Router] Malformed message {}: {}", id, error);
                self.send(ServerMessage::failure(id, INVALID_MESSAGE)).await;
            }
            None => tracing::warn!("[Router] Dropping unparseable frame: {}", error),
        }
        None
    }

    /// Dispatch a decoded client message
    pub async fn route_message(&self, message: ClientMessage) {
        let request = match RouteRequest::from_message(&message) {
            Ok(request) => request,
            Err(e) => {
                log_rejected(&message, &e);
                self.send(ServerMessage::failure(message.id, e.reply_message())).await;
                return;
            }
        };

        tracing::debug!("[Router] {} {} ({})", message.method, message.route, message.id);

        match request {
            RouteRequest::SubscribeAll(kind) => {
                let callback = self.push_to(&message.id);
                let handle = self.services.get(kind).subscribe_all(callback).await;
                self.register(message.id, kind, handle).await
            }
            RouteRequest::SubscribeOne(kind, id) => {
                let callback = self.push_to(&message.id);
                let handle = self.services.get(kind).subscribe(&id, callback).await;
                self.register(message.id, kind, handle).await
            }
            RouteRequest::SubscribeByParent { kind, parent, parent_id } => {
                let callback = self.push_to(&message.id);
                let handle = self.services.subscribe_by_parent(parent, &parent_id, callback).await;
                self.register(message.id, kind, handle).await
            }
            RouteRequest::Unsubscribe => {
                self.cache.delete(&message.id).await;
            }
            request => {
                let reply = execute(&self.services, &message.id, request).await;
                self.send(reply).await;
            }
        }
    }

    /// Callback pushing each change as `{id, event}` under the `SUB` id
    fn push_to(&self, id: &str) -> ChangeCallback {
        let outbound = self.outbound.clone();
        let sub_id = id.to_string();
        Arc::new(move |event: ChangeEvent| {
            let value = match serde_json::to_value(&event) {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!("[Router] Failed to serialize change event: {}", e);
                    return;
                }
            };
            match outbound.try_send(ServerMessage::event(sub_id.clone(), value)) {
                Ok(()) | Err(TrySendError::Closed(_)) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("[Router] Outbound queue full, dropped push for {}", sub_id)
                }
            }
        })
    }

    async fn register(&self, id: String, kind: EntityKind, handle: Option<Unsubscribe>) {
        match handle {
            Some(handle) => {
                self.cache.add(id.clone(), vec![handle]);
                self.send(ServerMessage::status(id, true)).await;
            }
            None => tracing::warn!("[Router] Subscription {} on {} was not opened", id, kind),
        }
    }
}

fn log_rejected(message: &ClientMessage, error: &RequestError) {
    match error {
        RequestError::InvalidBody { error, .. } => {
            tracing::warn!("[Router] Rejected body for {} {}: {}", message.method, message.route, error)
        }
        _ => tracing::warn!(
            "[Router] Rejected {} {} ({}): {}",
            message.method,
            message.route,
            message.id,
            error.reply_message()
        ),
    }
}

fn documents(kind: EntityKind, id: &str, result: Option<Vec<Document>>) -> ServerMessage {
    match result.map(serde_json::to_value) {
        Some(Ok(data)) => ServerMessage::data(id, data),
        _ => ServerMessage::failure(id, format!("Failed to get {}.", kind.collection())),
    }
}

fn document(id: &str, result: Option<Document>, failure: String) -> ServerMessage {
    match result.map(serde_json::to_value) {
        Some(Ok(data)) => ServerMessage::data(id, data),
        _ => ServerMessage::failure(id, failure),
    }
}

fn status(id: &str, ok: bool, failure: String) -> ServerMessage {
    if ok {
        ServerMessage::status(id, true)
    } else {
        ServerMessage::failure(id, failure)
    }
}

/// Run a data request against the services and build its reply
///
/// Subscription requests carry a lifecycle and belong to a connection, so
/// they are refused here.
pub async fn execute(services: &Services, id: &str, request: RouteRequest) -> ServerMessage {
    match request {
        RouteRequest::ReadAll(kind) => documents(kind, id, services.get(kind).read_all().await),
        RouteRequest::ReadByParent { kind, parent, parent_id } => {
            documents(kind, id, services.read_by_parent(parent, &parent_id).await)
        }
        RouteRequest::Read(kind, doc_id) => document(
            id,
            services.get(kind).read(&doc_id).await,
            format!("Failed to get {}.", kind.singular()),
        ),
        RouteRequest::Create(data) => {
            let kind = data.kind();
            document(
                id,
                services.create(data).await,
                format!("Failed to create {}.", kind.singular()),
            )
        }
        RouteRequest::Update { kind, id: doc_id, patch } => status(
            id,
            services.get(kind).update(&doc_id, patch).await,
            format!("Failed to update {}.", kind.singular()),
        ),
        RouteRequest::Delete(kind, doc_id) => status(
            id,
            services.get(kind).delete(&doc_id).await,
            format!("Failed to delete {}.", kind.singular()),
        ),
        RouteRequest::SubscribeAll(_)
        | RouteRequest::SubscribeOne(..)
        | RouteRequest::SubscribeByParent { .. }
        | RouteRequest::Unsubscribe => {
            ServerMessage::failure(id, crate::shared::message::INVALID_METHOD)
        }
    }
}
