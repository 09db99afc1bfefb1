//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the task list view and something it
//! does not own: the remote API, the caller's credential, time and
//! randomness. Implementations live in `src/adapters/`.

pub mod clock;
pub mod credentials;
pub mod id_gen;
pub mod task_api;

pub use clock::Clock;
pub use credentials::CredentialProvider;
pub use id_gen::IdGenerator;
pub use task_api::{ApiFuture, Envelope, RequestError, Task, TaskApi, TaskDraft, TaskId};
