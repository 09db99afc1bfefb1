//! In-memory implementation of the `TaskApi` port.
//!
//! Behaves like the remote collection: assigns sequential ids, keeps insertion
//! order and answers with envelopes. Failures can be scheduled to exercise the
//! view's error paths without a network.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ports::{ApiFuture, Envelope, RequestError, Task, TaskApi, TaskDraft, TaskId};

/// One call observed by [`InMemoryTaskApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `GET /`
    List,
    /// `POST /`
    Create {
        /// Title sent in the body.
        title: String,
    },
    /// `PUT /:id`
    Update {
        /// Target id.
        id: TaskId,
        /// Body sent.
        draft: TaskDraft,
    },
    /// `DELETE /:id`
    Delete {
        /// Target id.
        id: TaskId,
    },
}

/// A scheduled outcome overriding the normal behavior of the next call.
#[derive(Debug, Clone)]
enum Fault {
    Reject(String),
    Fail(RequestError),
}

#[derive(Debug, Default)]
struct Server {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<RecordedCall>,
    faults: VecDeque<Fault>,
}

/// Stateful stand-in for the remote task collection.
#[derive(Debug, Default)]
pub struct InMemoryTaskApi {
    server: Mutex<Server>,
}

impl InMemoryTaskApi {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection pre-populated with `titles`, ids `1..=n`.
    #[must_use]
    pub fn with_titles(titles: &[&str]) -> Self {
        let api = Self::new();
        {
            let mut server = api.lock();
            for title in titles {
                server.insert(title);
            }
        }
        api
    }

    /// Current server-side tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// The next call answers `{success: false, message}` and changes nothing.
    pub fn reject_next(&self, message: impl Into<String>) {
        self.lock().faults.push_back(Fault::Reject(message.into()));
    }

    /// The next call fails with `error` and changes nothing.
    pub fn fail_next(&self, error: RequestError) {
        self.lock().faults.push_back(Fault::Fail(error));
    }

    fn lock(&self) -> MutexGuard<'_, Server> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle<T>(
        &self,
        call: RecordedCall,
        apply: impl FnOnce(&mut Server) -> Envelope<T>,
    ) -> Result<Envelope<T>, RequestError> {
        let mut server = self.lock();
        server.calls.push(call);
        match server.faults.pop_front() {
            Some(Fault::Reject(message)) => Ok(Envelope::rejected(message)),
            Some(Fault::Fail(error)) => Err(error),
            None => Ok(apply(&mut server)),
        }
    }
}

impl Server {
    fn insert(&mut self, title: &str) -> Task {
        self.next_id += 1;
        let task =
            Task { id: TaskId::new(self.next_id.to_string()), title: title.to_string(), completed: false };
        self.tasks.push(task.clone());
        task
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({"id": task.id.as_str(), "title": task.title, "completed": task.completed})
}

impl TaskApi for InMemoryTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        let result = self.handle(RecordedCall::List, |server| Envelope::ok(server.tasks.clone()));
        Box::pin(async move { result })
    }

    fn create(&self, title: &str) -> ApiFuture<'_, serde_json::Value> {
        let call = RecordedCall::Create { title: title.to_string() };
        let result = self.handle(call, |server| Envelope::ok(task_json(&server.insert(title))));
        Box::pin(async move { result })
    }

    fn update(&self, id: &TaskId, draft: &TaskDraft) -> ApiFuture<'_, serde_json::Value> {
        let call = RecordedCall::Update { id: id.clone(), draft: draft.clone() };
        let result = self.handle(call, |server| match server.position(id) {
            Some(index) => {
                let task = &mut server.tasks[index];
                task.title.clone_from(&draft.title);
                task.completed = draft.completed;
                Envelope::ok(task_json(task))
            }
            None => Envelope::rejected("Todo not found"),
        });
        Box::pin(async move { result })
    }

    fn delete(&self, id: &TaskId) -> ApiFuture<'_, serde_json::Value> {
        let call = RecordedCall::Delete { id: id.clone() };
        let result = self.handle(call, |server| match server.position(id) {
            Some(index) => {
                server.tasks.remove(index);
                Envelope::empty()
            }
            None => Envelope::rejected("Todo not found"),
        });
        Box::pin(async move { result })
    }
}
