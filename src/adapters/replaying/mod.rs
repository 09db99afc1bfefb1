//! Replaying adapters that serve recorded interactions.

pub mod task_api;

pub use task_api::ReplayingTaskApi;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::RequestError;

/// Fetch the recorded output of the next `port::method` call.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, RequestError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
        .map_err(RequestError::Replay)
}

/// Decode a recorded output using the Ok/Err JSON convention.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, RequestError> {
    let serde_json::Value::Object(mut map) = output else {
        return Err(RequestError::Replay(format!("expected an Ok/Err object, got {output}")));
    };
    if let Some(ok) = map.remove("Ok") {
        return serde_json::from_value(ok).map_err(|e| RequestError::Decode(e.to_string()));
    }
    match map.remove("Err") {
        Some(serde_json::Value::String(message)) => Err(RequestError::Replay(message)),
        Some(other) => Err(RequestError::Replay(other.to_string())),
        None => Err(RequestError::Replay("recorded output has neither Ok nor Err".to_string())),
    }
}
