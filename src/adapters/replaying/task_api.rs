//! Replaying adapter for the `TaskApi` port.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ApiFuture, Envelope, RequestError, Task, TaskApi, TaskDraft, TaskId};

const PORT: &str = "tasks";

/// Serves recorded task API envelopes from a cassette. Arguments are ignored.
pub struct ReplayingTaskApi {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingTaskApi {
    /// Create a replaying task API backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn replay<T: DeserializeOwned>(&self, method: &str) -> Result<Envelope<T>, RequestError> {
        next_output(&self.replayer, PORT, method).and_then(replay_result)
    }
}

impl TaskApi for ReplayingTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        let result = self.replay::<Vec<Task>>("list");
        Box::pin(async move { result })
    }

    fn create(&self, _title: &str) -> ApiFuture<'_, serde_json::Value> {
        let result = self.replay::<serde_json::Value>("create");
        Box::pin(async move { result })
    }

    fn update(&self, _id: &TaskId, _draft: &TaskDraft) -> ApiFuture<'_, serde_json::Value> {
        let result = self.replay::<serde_json::Value>("update");
        Box::pin(async move { result })
    }

    fn delete(&self, _id: &TaskId) -> ApiFuture<'_, serde_json::Value> {
        let result = self.replay::<serde_json::Value>("delete");
        Box::pin(async move { result })
    }
}
