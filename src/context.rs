//! Service context wiring the task API port to a concrete adapter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::adapters::live::{LiveClock, LiveIdGenerator, LiveTaskApi, SessionToken, StaticToken};
use crate::adapters::recording::RecordingTaskApi;
use crate::adapters::replaying::ReplayingTaskApi;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::ports::{CredentialProvider, TaskApi};

/// Bundles the adapters a command runs against.
///
/// Constructors choose the adapter (live, recording, replaying). A recording
/// context writes its cassette in [`ServiceContext::finish`], or on drop if
/// `finish` was never called.
pub struct ServiceContext {
    /// The remote task collection.
    pub api: Arc<dyn TaskApi>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Wraps an already-built adapter.
    #[must_use]
    pub fn with_api(api: Arc<dyn TaskApi>) -> Self {
        Self { api, recorder: None }
    }

    /// Creates a live context talking HTTP to `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, String> {
        Ok(Self::with_api(Arc::new(live_api(config)?)))
    }

    /// Creates a live context that also records every call to a cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(config: &Config, path: &Path) -> Result<Self, String> {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            "tasklist-session",
            config.api_url.as_str(),
        )));
        let api = RecordingTaskApi::new(Box::new(live_api(config)?), Arc::clone(&recorder));
        Ok(Self { api: Arc::new(api), recorder: Some(recorder) })
    }

    /// Creates a context that serves every call from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::load(path)?;
        debug!(cassette = %path.display(), api_url = replayer.api_url(), "replaying cassette");
        Ok(Self::with_api(Arc::new(ReplayingTaskApi::new(Arc::new(Mutex::new(replayer))))))
    }

    /// Writes the cassette of a recording context.
    ///
    /// Returns the cassette path, or `None` when nothing was being recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, String> {
        self.recorder.take().map(|recorder| save(&recorder)).transpose()
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            if let Err(e) = save(&recorder) {
                warn!(error = %e, "failed to write cassette");
            }
        }
    }
}

fn save(recorder: &Arc<Mutex<CassetteRecorder>>) -> Result<PathBuf, String> {
    let guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard
        .save()
        .map_err(|e| format!("Failed to write cassette {}: {e}", guard.path().display()))
}

fn live_api(config: &Config) -> Result<LiveTaskApi, String> {
    LiveTaskApi::new(config.api_url.clone(), config.timeout, credentials(config))
        .map_err(|e| e.to_string())
}

/// The configured token, or a session token generated once for this process.
fn credentials(config: &Config) -> Box<dyn CredentialProvider> {
    match &config.token {
        Some(token) => Box::new(StaticToken::new(token.clone())),
        None => {
            let token = SessionToken::generate(&LiveIdGenerator, &LiveClock);
            debug!("generated session token");
            Box::new(token)
        }
    }
}
