//! In-process adapters that keep all state in memory.

pub mod task_api;

pub use task_api::{InMemoryTaskApi, RecordedCall};
