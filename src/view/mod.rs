//! The task list view: local state synchronized with the remote collection.
//!
//! Every mutation is followed by a full re-fetch; the local list is never
//! patched in place. Several actions may be in flight at once on a
//! single-threaded runtime:
//!
//! - loading is an in-flight counter maintained by [`InFlight`] guards, so it
//!   drops back to idle on every exit path;
//! - each fetch is stamped with a generation at dispatch and a response older
//!   than the newest applied one is discarded;
//! - a second mutation of the same kind is refused while one is outstanding.

pub mod render;

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::ports::{Envelope, RequestError, Task, TaskApi, TaskDraft, TaskId};

pub use render::render;

/// The kinds of request the view issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// List the collection.
    Fetch,
    /// Create a task.
    Create,
    /// Update a task.
    Update,
    /// Delete a task.
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Errors surfaced by view operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The title to add was empty. Shown to the user as an alert.
    #[error("Please enter a task name.")]
    EmptyTitle,
    /// The API call failed; state is unchanged.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// A request of the same kind is still outstanding.
    #[error("a {0} request is already in flight")]
    Busy(ActionKind),
    /// No task at the given index.
    #[error("no task at index {0}")]
    NoSuchRow(usize),
    /// An edit operation was called outside edit mode.
    #[error("no row is being edited")]
    NotEditing,
}

/// A field of the edit draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    /// Replace the draft title.
    Title(String),
    /// Replace the draft completion flag.
    Completed(bool),
}

/// The row currently in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Position of the row in the task list.
    pub index: usize,
    /// Id of the task being edited; used to follow the row across re-fetches.
    pub id: TaskId,
    /// Working copy sent on commit.
    pub draft: TaskDraft,
}

/// Render-ready copy of the view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// Tasks in server order.
    pub tasks: Vec<Task>,
    /// Contents of the new-task input.
    pub draft_title: String,
    /// Row in edit mode, if any.
    pub editing: Option<EditSession>,
    /// Whether any request is outstanding.
    pub is_loading: bool,
}

impl ViewSnapshot {
    /// Index of the row in edit mode.
    #[must_use]
    pub fn editing_index(&self) -> Option<usize> {
        self.editing.as_ref().map(|e| e.index)
    }
}

#[derive(Debug, Default)]
struct ViewState {
    tasks: Vec<Task>,
    draft_title: String,
    editing: Option<EditSession>,
    in_flight: usize,
    pending: HashSet<ActionKind>,
    fetch_issued: u64,
    fetch_applied: u64,
}

impl ViewState {
    fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if let Some(edit) = &mut self.editing {
            match self.tasks.iter().position(|t| t.id == edit.id) {
                Some(index) => edit.index = index,
                None => {
                    debug!(id = %edit.id, "edited task disappeared, leaving edit mode");
                    self.editing = None;
                }
            }
        }
    }
}

/// Marks one request as outstanding for as long as it lives.
struct InFlight<'a> {
    state: &'a Mutex<ViewState>,
    kind: Option<ActionKind>,
}

impl<'a> InFlight<'a> {
    /// Starts tracking a request. `kind` is set for mutations, which are
    /// exclusive per kind.
    fn begin(state: &'a Mutex<ViewState>, kind: Option<ActionKind>) -> Result<Self, ViewError> {
        let mut guard = lock(state);
        if let Some(kind) = kind {
            if !guard.pending.insert(kind) {
                return Err(ViewError::Busy(kind));
            }
        }
        guard.in_flight += 1;
        Ok(Self { state, kind })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut guard = lock(self.state);
        guard.in_flight = guard.in_flight.saturating_sub(1);
        if let Some(kind) = self.kind {
            guard.pending.remove(&kind);
        }
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The task list page: a cached copy of the remote collection plus the
/// new-task input and the edit cursor.
pub struct TaskListView {
    api: Arc<dyn TaskApi>,
    state: Mutex<ViewState>,
}

impl TaskListView {
    /// Creates an empty view. Call [`TaskListView::fetch_all`] to mount it.
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self { api, state: Mutex::new(ViewState::default()) }
    }

    /// Copies the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let state = lock(&self.state);
        ViewSnapshot {
            tasks: state.tasks.clone(),
            draft_title: state.draft_title.clone(),
            editing: state.editing.clone(),
            is_loading: state.in_flight > 0,
        }
    }

    /// Whether any request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).in_flight > 0
    }

    /// The cached tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.state).tasks.clone()
    }

    /// Replaces the new-task input.
    pub fn set_draft_title(&self, text: impl Into<String>) {
        lock(&self.state).draft_title = text.into();
    }

    /// Loads the full collection and replaces the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Request`] on any failure; the cached list is kept.
    pub async fn fetch_all(&self) -> Result<(), ViewError> {
        let _loading = InFlight::begin(&self.state, None)?;
        let generation = {
            let mut state = lock(&self.state);
            state.fetch_issued += 1;
            state.fetch_issued
        };

        let outcome = self
            .api
            .list()
            .await
            .and_then(Envelope::into_result)
            .and_then(|data| data.ok_or(RequestError::MissingData));

        match outcome {
            Ok(tasks) => {
                let mut state = lock(&self.state);
                if generation > state.fetch_applied {
                    debug!(generation, count = tasks.len(), "applying task list");
                    state.fetch_applied = generation;
                    state.replace_tasks(tasks);
                } else {
                    debug!(generation, applied = state.fetch_applied, "discarding stale task list");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to fetch tasks");
                Err(e.into())
            }
        }
    }

    /// Creates a task, then re-fetches and clears the new-task input.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::EmptyTitle`] without issuing a request when the
    /// title is blank, [`ViewError::Busy`] while another create is
    /// outstanding, and [`ViewError::Request`] when the create or the
    /// follow-up fetch fails. A failed create leaves the input untouched.
    ///
    /// The title is sent exactly as typed.
    pub async fn add_task(&self, title: &str) -> Result<(), ViewError> {
        if title.trim().is_empty() {
            return Err(ViewError::EmptyTitle);
        }

        let _loading = InFlight::begin(&self.state, Some(ActionKind::Create))?;
        if let Err(e) = self.api.create(title).await.and_then(Envelope::into_result) {
            error!(error = %e, title, "failed to add task");
            return Err(e.into());
        }
        info!(title, "task added");

        lock(&self.state).draft_title.clear();
        self.fetch_all().await
    }

    /// Submits the new-task input.
    ///
    /// # Errors
    ///
    /// See [`TaskListView::add_task`].
    pub async fn submit_draft(&self) -> Result<(), ViewError> {
        let title = lock(&self.state).draft_title.clone();
        self.add_task(&title).await
    }

    /// Puts the row at `index` into edit mode, replacing any other edit.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NoSuchRow`] when `index` is out of range.
    pub fn begin_edit(&self, index: usize) -> Result<(), ViewError> {
        let mut state = lock(&self.state);
        let task = state.tasks.get(index).ok_or(ViewError::NoSuchRow(index))?;
        let session = EditSession { index, id: task.id.clone(), draft: TaskDraft::from(task) };
        state.editing = Some(session);
        Ok(())
    }

    /// Changes one field of the edit draft. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotEditing`] outside edit mode.
    pub fn update_draft_field(&self, field: DraftField) -> Result<(), ViewError> {
        let mut state = lock(&self.state);
        let edit = state.editing.as_mut().ok_or(ViewError::NotEditing)?;
        match field {
            DraftField::Title(title) => edit.draft.title = title,
            DraftField::Completed(completed) => edit.draft.completed = completed,
        }
        Ok(())
    }

    /// Leaves edit mode without saving. Returns whether a row was being edited.
    pub fn cancel_edit(&self) -> bool {
        lock(&self.state).editing.take().is_some()
    }

    /// Sends the edit draft as the new state of task `id`.
    ///
    /// On success edit mode ends and the list is re-fetched; on failure edit
    /// mode stays so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotEditing`] outside edit mode, [`ViewError::Busy`]
    /// while another update is outstanding and [`ViewError::Request`] when a
    /// request fails.
    pub async fn commit_edit(&self, id: &TaskId) -> Result<(), ViewError> {
        let draft = lock(&self.state)
            .editing
            .as_ref()
            .map(|edit| edit.draft.clone())
            .ok_or(ViewError::NotEditing)?;

        let _loading = InFlight::begin(&self.state, Some(ActionKind::Update))?;
        if let Err(e) = self.api.update(id, &draft).await.and_then(Envelope::into_result) {
            error!(error = %e, %id, "failed to update task");
            return Err(e.into());
        }
        info!(%id, "task updated");

        {
            let mut state = lock(&self.state);
            if state.editing.as_ref().is_some_and(|edit| &edit.id == id) {
                state.editing = None;
            }
        }
        self.fetch_all().await
    }

    /// Deletes task `id`, then re-fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Busy`] while another delete is outstanding and
    /// [`ViewError::Request`] when a request fails; the row then stays.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ViewError> {
        let _loading = InFlight::begin(&self.state, Some(ActionKind::Delete))?;
        if let Err(e) = self.api.delete(id).await.and_then(Envelope::into_result) {
            error!(error = %e, %id, "failed to delete task");
            return Err(e.into());
        }
        info!(%id, "task deleted");

        self.fetch_all().await
    }
}
