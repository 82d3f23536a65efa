/**
 * WebSocket Wire Messages
 *
 * This module defines the JSON messages exchanged over the `/api` WebSocket:
 *
 * - `ClientMessage` - `{ id, method, route, body? }` sent by the browser
 * - `ServerMessage` - either a response `{ id, success, data?, message? }`
 *   or a subscription push `{ id, event }`
 *
 * The client-chosen `id` correlates a request with its response and doubles
 * as the key of any subscription the request opens.
 *
 * Before dispatch a `ClientMessage` is converted into a `RouteRequest`, a
 * closed set of (verb, route shape) pairs with typed bodies, so handlers never
 * inspect a loosely-typed body themselves.
 */
use crate::shared::entity::{EntityData, EntityKind};
use crate::shared::error::SharedError;
use crate::shared::route::{ParentField, Route};
use serde::{Deserialize, Serialize};

/// Fixed reply for verbs the router does not know
pub const INVALID_METHOD: &str = "Invalid method.";
/// Fixed reply for routes that do not match any collection route
pub const INVALID_ROUTE: &str = "Invalid route.";
/// Fixed reply for frames that are not a client message at all
pub const INVALID_MESSAGE: &str = "Invalid message.";

/// HTTP-like verb of a client message
///
/// Unknown verbs are kept as `Other` so the router can answer them instead of
/// failing to decode the whole message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Sub,
    Unsub,
    Other(String),
}

impl From<String> for Method {
    fn from(value: String) -> Self {
        match value.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "SUB" => Self::Sub,
            "UNSUB" => Self::Unsub,
            _ => Self::Other(value),
        }
    }
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Sub => "SUB",
            Self::Unsub => "UNSUB",
            Self::Other(other) => other,
        }
    }

    /// `SUB` and `UNSUB`, which change a connection's subscriptions
    pub fn is_subscription(&self) -> bool {
        matches!(self, Self::Sub | Self::Unsub)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        match method {
            Method::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request sent by the client over the WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMessage {
    /// Correlation id, reused as the subscription key
    pub id: String,
    pub method: Method,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ClientMessage {
    pub fn new(id: impl Into<String>, method: Method, route: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            route: route.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Reply to a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Push produced by an open subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Id of the `SUB` message that opened the subscription
    pub id: String,
    pub event: serde_json::Value,
}

/// Any message the server sends to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Response(ResponseEnvelope),
    Event(EventEnvelope),
}

impl ServerMessage {
    /// Successful reply carrying data
    pub fn data(id: impl Into<String>, data: serde_json::Value) -> Self {
        Self::Response(ResponseEnvelope {
            id: id.into(),
            success: true,
            data: Some(data),
            message: None,
        })
    }

    /// Bare success/failure reply
    pub fn status(id: impl Into<String>, success: bool) -> Self {
        Self::Response(ResponseEnvelope {
            id: id.into(),
            success,
            data: None,
            message: None,
        })
    }

    /// Failed reply with a fixed human-readable message
    pub fn failure(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Response(ResponseEnvelope {
            id: id.into(),
            success: false,
            data: None,
            message: Some(message.into()),
        })
    }

    /// Subscription push
    pub fn event(id: impl Into<String>, event: serde_json::Value) -> Self {
        Self::Event(EventEnvelope {
            id: id.into(),
            event,
        })
    }

    /// Correlation id of this message
    pub fn id(&self) -> &str {
        match self {
            Self::Response(response) => &response.id,
            Self::Event(event) => &event.id,
        }
    }

    /// Serialize to the JSON text sent on the socket
    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A client message resolved into one concrete operation
#[derive(Debug, Clone, PartialEq)]
pub enum RouteRequest {
    ReadAll(EntityKind),
    Read(EntityKind, String),
    ReadByParent {
        kind: EntityKind,
        parent: ParentField,
        parent_id: String,
    },
    Create(EntityData),
    Update {
        kind: EntityKind,
        id: String,
        patch: serde_json::Map<String, serde_json::Value>,
    },
    Delete(EntityKind, String),
    SubscribeAll(EntityKind),
    SubscribeOne(EntityKind, String),
    SubscribeByParent {
        kind: EntityKind,
        parent: ParentField,
        parent_id: String,
    },
    Unsubscribe,
}

/// Why a client message could not be resolved into a `RouteRequest`
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Verb is not one the router handles
    InvalidMethod(String),
    /// Route does not match the verb's expected shape
    InvalidRoute(String),
    /// Body is missing or does not validate; carries the collection for the
    /// failure message
    InvalidBody { kind: EntityKind, method: Method, error: SharedError },
}

impl RequestError {
    /// Fixed message sent back to the client
    pub fn reply_message(&self) -> String {
        match self {
            Self::InvalidMethod(_) => INVALID_METHOD.to_string(),
            Self::InvalidRoute(_) => INVALID_ROUTE.to_string(),
            Self::InvalidBody { kind, method, .. } => match method {
                Method::Put => format!("Failed to update {}.", kind.singular()),
                _ => format!("Failed to create {}.", kind.singular()),
            },
        }
    }
}

impl RouteRequest {
    /// Resolve a client message; the verb is checked before the route
    pub fn from_message(message: &ClientMessage) -> Result<Self, RequestError> {
        if let Method::Other(verb) = &message.method {
            return Err(RequestError::InvalidMethod(verb.clone()));
        }
        if message.method == Method::Unsub {
            return Ok(Self::Unsubscribe);
        }

        let route = Route::parse(&message.route)
            .map_err(|_| RequestError::InvalidRoute(message.route.clone()))?;
        let invalid_route = || RequestError::InvalidRoute(message.route.clone());

        match (&message.method, route) {
            (Method::Get, Route::Collection(kind)) => Ok(Self::ReadAll(kind)),
            (Method::Get, Route::Item(kind, id)) => Ok(Self::Read(kind, id)),
            (Method::Get, Route::ByParent { kind, parent, parent_id }) => Ok(Self::ReadByParent {
                kind,
                parent,
                parent_id,
            }),
            (Method::Post, Route::Collection(kind)) => {
                let body = message.body.clone().unwrap_or(serde_json::Value::Null);
                EntityData::parse(kind, &body)
                    .map(Self::Create)
                    .map_err(|error| RequestError::InvalidBody {
                        kind,
                        method: Method::Post,
                        error,
                    })
            }
            (Method::Put, Route::Item(kind, id)) => match &message.body {
                Some(serde_json::Value::Object(patch)) => Ok(Self::Update {
                    kind,
                    id,
                    patch: patch.clone(),
                }),
                _ => Err(RequestError::InvalidBody {
                    kind,
                    method: Method::Put,
                    error: SharedError::validation("body", "expected a JSON object"),
                }),
            },
            (Method::Delete, Route::Item(kind, id)) => Ok(Self::Delete(kind, id)),
            (Method::Sub, Route::Collection(kind)) => Ok(Self::SubscribeAll(kind)),
            (Method::Sub, Route::Item(kind, id)) => Ok(Self::SubscribeOne(kind, id)),
            (Method::Sub, Route::ByParent { kind, parent, parent_id }) => {
                Ok(Self::SubscribeByParent {
                    kind,
                    parent,
                    parent_id,
                })
            }
            _ => Err(invalid_route()),
        }
    }
}
