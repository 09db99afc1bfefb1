//! Port implementations.
//!
//! - `live`: real HTTP, system clock, random ids.
//! - `recording`: wraps a live adapter and captures a cassette.
//! - `replaying`: serves a cassette, no network.
//! - `memory`: in-process task collection for tests.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
