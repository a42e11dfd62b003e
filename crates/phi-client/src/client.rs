//! HTTP client for the φ HERE backend REST API.
//!
//! Wraps `reqwest` with backend-specific status handling (404 as
//! [`ClientError::NotFound`], FastAPI-style `{"detail": ...}` bodies surfaced
//! as [`ClientError::Api`]) and typed response deserialization. Idempotent
//! reads go through the client's retry policy; task creation never does.

use std::time::Duration;

use phi_core::{
    clamp_limit, AppConfig, AuthStatus, ExtractionTask, FeedPage, InstantPreview, LinkPreview,
    Story, StoryEnvelope, TaskId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::ExtractionApi;
use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Body of `POST /api/extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskRequest {
    pub url: String,
    /// Bypass the backend's recent-submission reuse.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_story_id: Option<String>,
}

impl CreateTaskRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            force: false,
            target_story_id: None,
        }
    }
}

/// Successful `POST /api/extract` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskResponse {
    pub task_id: TaskId,
    pub status: Option<String>,
    /// The backend returned an existing recent task for the same URL.
    pub reused: bool,
}

#[derive(Deserialize)]
struct RawCreateTaskResponse {
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reused: bool,
}

/// Client for the backend REST API.
///
/// Use [`PhiClient::new`] with an explicit base URL (a wiremock server in
/// tests) or [`PhiClient::from_config`] in the binary.
#[derive(Debug, Clone)]
pub struct PhiClient {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
    retry: RetryPolicy,
}

impl PhiClient {
    /// Creates a client against `base_url` with retries disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so path segments are
        // appended under any prefix rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            session_cookie: None,
            retry: RetryPolicy::default(),
        })
    }

    /// Creates a client from application configuration, including retry
    /// policy and session cookie.
    ///
    /// # Errors
    ///
    /// Same as [`PhiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let client = Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms);
        Ok(match &config.session_cookie {
            Some(cookie) => client.with_session_cookie(cookie),
            None => client,
        })
    }

    /// Enables retry with back-off for idempotent reads.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.retry = RetryPolicy::new(max_retries, backoff_base_ms);
        self
    }

    /// Sends `Cookie: session=<value>` with every request.
    #[must_use]
    pub fn with_session_cookie(mut self, value: &str) -> Self {
        self.session_cookie = Some(value.to_owned());
        self
    }

    /// Submits a URL for extraction. Issues exactly one request.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx status (with the backend `detail`).
    /// - [`ClientError::MissingTaskId`] if the body has no usable `task_id`.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    pub async fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> Result<CreateTaskResponse, ClientError> {
        let url = self.endpoint(&["api", "extract"])?;
        tracing::info!(target_url = %request.url, "submitting URL for extraction");

        let response = self
            .authorised(self.client.post(url.clone()))
            .json(request)
            .send()
            .await?;
        let response = Self::check_status(response, &url).await?;
        let raw: RawCreateTaskResponse = Self::decode(response, "create_task").await?;

        let task_id = raw
            .task_id
            .and_then(|id| TaskId::new(id).ok())
            .ok_or(ClientError::MissingTaskId)?;

        Ok(CreateTaskResponse {
            task_id,
            status: raw.status,
            reused: raw.reused,
        })
    }

    /// Fetches the current record for a task. Not retried; the poller
    /// retries on its own schedule.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the backend does not know the task.
    /// - [`ClientError::Api`] on any other non-2xx status.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] as usual.
    pub async fn get_task(&self, task_id: &TaskId) -> Result<ExtractionTask, ClientError> {
        let url = self.endpoint(&["api", "task", task_id.as_str()])?;
        self.get_json(url, &format!("get_task({task_id})")).await
    }

    /// Fetches the enriched preview for a task.
    ///
    /// A 404 is the expected answer for blocked or unreadable content and
    /// yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Any failure other than 404.
    pub async fn get_task_preview(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<LinkPreview>, ClientError> {
        let url = self.endpoint(&["api", "task", task_id.as_str(), "preview"])?;
        match self
            .get_json(url, &format!("get_task_preview({task_id})"))
            .await
        {
            Ok(preview) => Ok(Some(preview)),
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Fetches a story aggregate.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] for an unknown story; transient failures are
    /// retried before being returned.
    pub async fn get_story(&self, story_id: &str) -> Result<Story, ClientError> {
        let url = self.endpoint(&["api", "stories", story_id])?;
        let context = format!("get_story({story_id})");
        let envelope: StoryEnvelope = self
            .retry
            .run(|| self.get_json(url.clone(), &context))
            .await?;
        Ok(envelope.story)
    }

    /// Fetches one page of the ranked feed. `limit` is clamped to the
    /// backend maximum.
    ///
    /// # Errors
    ///
    /// Transient failures are retried before being returned.
    pub async fn get_feed(&self, limit: u32, offset: u32) -> Result<FeedPage, ClientError> {
        let mut url = self.endpoint(&["api", "coherence", "feed"])?;
        url.query_pairs_mut()
            .append_pair("limit", &clamp_limit(limit).to_string())
            .append_pair("offset", &offset.to_string());
        self
            .retry
            .run(|| self.get_json(url.clone(), "get_feed"))
            .await
    }

    /// Fetches cached preview metadata for a URL that may not have been
    /// submitted yet.
    ///
    /// # Errors
    ///
    /// Transient failures are retried before being returned.
    pub async fn get_instant_preview(&self, target: &str) -> Result<InstantPreview, ClientError> {
        let mut url = self.endpoint(&["api", "preview"])?;
        url.query_pairs_mut().append_pair("url", target);
        self
            .retry
            .run(|| self.get_json(url.clone(), "get_instant_preview"))
            .await
    }

    /// Fetches the authentication status for the configured session.
    ///
    /// # Errors
    ///
    /// Transient failures are retried before being returned.
    pub async fn get_auth_status(&self) -> Result<AuthStatus, ClientError> {
        let url = self.endpoint(&["api", "auth", "status"])?;
        self
            .retry
            .run(|| self.get_json(url.clone(), "get_auth_status"))
            .await
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorised(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(reqwest::header::COOKIE, format!("session={cookie}")),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.authorised(self.client.get(url.clone())).send().await?;
        let response = Self::check_status(response, &url).await?;
        Self::decode(response, context).await
    }

    /// Maps 404 to [`ClientError::NotFound`] and any other non-2xx status to
    /// [`ClientError::Api`], pulling the message out of a `{"detail": ...}`
    /// body when there is one.
    async fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            detail: error_detail(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned()
            }),
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

impl ExtractionApi for PhiClient {
    async fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> Result<CreateTaskResponse, ClientError> {
        PhiClient::create_task(self, request).await
    }

    async fn fetch_task(&self, task_id: &TaskId) -> Result<ExtractionTask, ClientError> {
        self.get_task(task_id).await
    }

    async fn fetch_task_preview(
        &self,
        task_id: &TaskId,
    ) -> Result<Option<LinkPreview>, ClientError> {
        self.get_task_preview(task_id).await
    }
}

/// Extracts a human-readable message from a FastAPI-style error body.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
