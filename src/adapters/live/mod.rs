//! Live adapters for real external interactions.

pub mod clock;
pub mod credentials;
pub mod id_gen;
pub mod task_api;

pub use clock::LiveClock;
pub use credentials::{SessionToken, StaticToken};
pub use id_gen::LiveIdGenerator;
pub use task_api::LiveTaskApi;
