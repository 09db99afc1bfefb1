//! Task API port for the remote task collection.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed future type alias used by [`TaskApi`] to keep the trait dyn-compatible.
pub type ApiFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<Envelope<T>, RequestError>> + Send + 'a>>;

/// Opaque task identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a server-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireTask")]
pub struct Task {
    /// Server-assigned identifier. Mongo-backed servers spell it `_id`,
    /// some send both spellings.
    pub id: TaskId,
    /// The task title.
    pub title: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
}

/// A task as it appears on the wire, before the id spellings are merged.
#[derive(Deserialize)]
struct WireTask {
    id: Option<TaskId>,
    #[serde(rename = "_id")]
    mongo_id: Option<TaskId>,
    title: String,
    #[serde(default)]
    completed: bool,
}

impl TryFrom<WireTask> for Task {
    type Error = &'static str;

    fn try_from(wire: WireTask) -> Result<Self, Self::Error> {
        let id = wire.mongo_id.or(wire.id).ok_or("task has neither `_id` nor `id`")?;
        Ok(Self { id, title: wire.title, completed: wire.completed })
    }
}

/// Body of an update request, also the working copy of a row in edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Edited title.
    pub title: String,
    /// Edited completion flag.
    pub completed: bool,
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self { title: task.title.clone(), completed: task.completed }
    }
}

/// The `{success, data}` wrapper every response uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Outcome reported by the server.
    pub success: bool,
    /// Payload; absent on delete and on most failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional server message, only ever logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    /// A successful envelope with no payload.
    #[must_use]
    pub fn empty() -> Self {
        Self { success: true, data: None, message: None }
    }

    /// A `success: false` envelope.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    /// Converts the envelope into its payload.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Rejected`] when the server reported `success: false`.
    pub fn into_result(self) -> Result<Option<T>, RequestError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(RequestError::Rejected(self.message))
        }
    }
}

/// Any failure of a single API call. Callers do not discriminate between kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not a valid envelope.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The envelope reported `success: false`.
    #[error("server rejected request{}", .0.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected(Option<String>),
    /// A successful envelope lacked a required payload.
    #[error("response is missing data")]
    MissingData,
    /// A cassette could not serve the call.
    #[error("replay error: {0}")]
    Replay(String),
}

/// CRUD access to the remote task collection.
///
/// Implementations send exactly one request per call and never retry.
pub trait TaskApi: Send + Sync {
    /// `GET /` - every task in server order.
    fn list(&self) -> ApiFuture<'_, Vec<Task>>;

    /// `POST /` with `{title}`. Only `success` matters; the payload is kept raw.
    fn create(&self, title: &str) -> ApiFuture<'_, serde_json::Value>;

    /// `PUT /:id` with `{title, completed}`. The payload is kept raw.
    fn update(&self, id: &TaskId, draft: &TaskDraft) -> ApiFuture<'_, serde_json::Value>;

    /// `DELETE /:id`. Any payload is ignored.
    fn delete(&self, id: &TaskId) -> ApiFuture<'_, serde_json::Value>;
}
