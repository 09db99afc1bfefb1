//! Recording adapter for the `TaskApi` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ApiFuture, Task, TaskApi, TaskDraft, TaskId};

const PORT: &str = "tasks";

/// Records task API interactions while delegating to an inner implementation.
pub struct RecordingTaskApi {
    inner: Box<dyn TaskApi>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTaskApi {
    /// Wraps `inner`, appending every call and its outcome to `recorder`.
    pub fn new(inner: Box<dyn TaskApi>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CreateInput {
    title: String,
}

#[derive(Serialize)]
struct UpdateInput {
    id: TaskId,
    draft: TaskDraft,
}

#[derive(Serialize)]
struct DeleteInput {
    id: TaskId,
}

impl TaskApi for RecordingTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move {
            let result = self.inner.list().await;
            record_result(&self.recorder, PORT, "list", &(), &result);
            result
        })
    }

    fn create(&self, title: &str) -> ApiFuture<'_, serde_json::Value> {
        let input = CreateInput { title: title.to_string() };
        Box::pin(async move {
            let result = self.inner.create(&input.title).await;
            record_result(&self.recorder, PORT, "create", &input, &result);
            result
        })
    }

    fn update(&self, id: &TaskId, draft: &TaskDraft) -> ApiFuture<'_, serde_json::Value> {
        let input = UpdateInput { id: id.clone(), draft: draft.clone() };
        Box::pin(async move {
            let result = self.inner.update(&input.id, &input.draft).await;
            record_result(&self.recorder, PORT, "update", &input, &result);
            result
        })
    }

    fn delete(&self, id: &TaskId) -> ApiFuture<'_, serde_json::Value> {
        let input = DeleteInput { id: id.clone() };
        Box::pin(async move {
            let result = self.inner.delete(&input.id).await;
            record_result(&self.recorder, PORT, "delete", &input, &result);
            result
        })
    }
}
