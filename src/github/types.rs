// GitHub API response types.
// Defines the repository activity events returned by the events endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PUSH_EVENT: &str = "PushEvent";
pub const CREATE_EVENT: &str = "CreateEvent";

/// User who triggered an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub login: String,
}

/// Commit listed in a push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
}

/// Payload of a `PushEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

/// Payload of a `CreateEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayload {
    /// Name of the created ref. Null when a whole repository was created.
    #[serde(rename = "ref", default)]
    pub ref_name: Option<String>,
    pub ref_type: String,
}

impl CreatePayload {
    pub fn is_branch(&self) -> bool {
        self.ref_type == "branch"
    }
}

/// Event type discriminator with its typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Push(PushPayload),
    Create(CreatePayload),
    /// Any event type the feed does not render. The raw payload is kept so
    /// cached snapshots serialize back to what the API returned.
    Other { event_type: String, payload: Value },
}

impl EventKind {
    pub fn type_name(&self) -> &str {
        match self {
            EventKind::Push(_) => PUSH_EVENT,
            EventKind::Create(_) => CREATE_EVENT,
            EventKind::Other { event_type, .. } => event_type,
        }
    }
}

/// One repository activity event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct ActivityEvent {
    pub actor: Actor,
    pub created_at: DateTime<Utc>,
    pub kind: EventKind,
}

/// Wire shape of an event: a string `type` next to an untyped `payload`.
#[derive(Serialize, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    actor: Actor,
    created_at: DateTime<Utc>,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawEvent> for ActivityEvent {
    type Error = serde_json::Error;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let kind = match raw.event_type.as_str() {
            PUSH_EVENT => EventKind::Push(serde_json::from_value(raw.payload)?),
            CREATE_EVENT => EventKind::Create(serde_json::from_value(raw.payload)?),
            _ => EventKind::Other {
                event_type: raw.event_type,
                payload: raw.payload,
            },
        };

        Ok(Self {
            actor: raw.actor,
            created_at: raw.created_at,
            kind,
        })
    }
}

impl From<ActivityEvent> for RawEvent {
    fn from(event: ActivityEvent) -> Self {
        let event_type = event.kind.type_name().to_string();
        let payload = match event.kind {
            EventKind::Push(push) => serde_json::to_value(push).unwrap_or_default(),
            EventKind::Create(create) => serde_json::to_value(create).unwrap_or_default(),
            EventKind::Other { payload, .. } => payload,
        };

        Self {
            event_type,
            actor: event.actor,
            created_at: event.created_at,
            payload,
        }
    }
}

/// An ordered list of events, shaped like the `data` member of a JSON-P response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventFeed {
    pub data: Vec<ActivityEvent>,
}

/// Response metadata that JSON-P responses carry in the body instead of headers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonpMeta {
    pub status: u16,
    #[serde(rename = "X-RateLimit-Limit")]
    pub ratelimit_limit: Option<String>,
    #[serde(rename = "X-RateLimit-Remaining")]
    pub ratelimit_remaining: Option<String>,
    #[serde(rename = "X-RateLimit-Reset")]
    pub ratelimit_reset: Option<String>,
}

/// Body passed to the JSON-P callback: `{"meta": {...}, "data": ...}`.
///
/// `data` stays untyped until `meta.status` says it holds events; on errors
/// it is an object with a `message`.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonpEnvelope {
    pub meta: JsonpMeta,
    pub data: Value,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
