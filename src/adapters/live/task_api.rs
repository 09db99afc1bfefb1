//! Live adapter for the `TaskApi` port over HTTP.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ports::{
    ApiFuture, CredentialProvider, Envelope, RequestError, Task, TaskApi, TaskDraft, TaskId,
};

/// Task API client that talks to the REST collection at `base_url`.
pub struct LiveTaskApi {
    client: Client,
    base_url: Url,
    credentials: Box<dyn CredentialProvider>,
}

/// Request body for `POST /`.
#[derive(Serialize)]
struct CreateBody<'a> {
    title: &'a str,
}

impl LiveTaskApi {
    /// Creates a client for the collection at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` cannot carry path segments or the HTTP
    /// client cannot be built.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, RequestError> {
        if base_url.cannot_be_a_base() {
            return Err(RequestError::Transport(format!("{base_url} cannot be used as a base URL")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url, credentials })
    }

    /// The collection URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a single task: the collection URL with `id` appended as a path segment.
    #[must_use]
    pub fn item_url(&self, id: &TaskId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    /// Sends one request and decodes the envelope. Never retries.
    async fn send<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(%method, %url, "sending request");
        let mut request =
            self.client.request(method.clone(), url.clone()).bearer_auth(self.credentials.bearer_token());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "request failed");
            RequestError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RequestError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), body = %text, "non-success status");
            return Err(RequestError::Status { status: status.as_u16() });
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| RequestError::Decode(e.to_string()))?;
        debug!(%method, %url, success = envelope.success, "response decoded");
        Ok(envelope)
    }
}

impl TaskApi for LiveTaskApi {
    fn list(&self) -> ApiFuture<'_, Vec<Task>> {
        Box::pin(async move { self.send::<_, ()>(Method::GET, self.base_url.clone(), None).await })
    }

    fn create(&self, title: &str) -> ApiFuture<'_, serde_json::Value> {
        let title = title.to_string();
        Box::pin(async move {
            let body = CreateBody { title: &title };
            self.send(Method::POST, self.base_url.clone(), Some(&body)).await
        })
    }

    fn update(&self, id: &TaskId, draft: &TaskDraft) -> ApiFuture<'_, serde_json::Value> {
        let url = self.item_url(id);
        let draft = draft.clone();
        Box::pin(async move { self.send(Method::PUT, url, Some(&draft)).await })
    }

    fn delete(&self, id: &TaskId) -> ApiFuture<'_, serde_json::Value> {
        let url = self.item_url(id);
        Box::pin(async move { self.send::<_, ()>(Method::DELETE, url, None).await })
    }
}
