//! Extraction task records as returned by `GET /api/task/{task_id}`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// Opaque backend identifier for an extraction task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap a backend task id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyTaskId`] if `raw` is empty after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyTaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an extraction task.
///
/// `Completed`, `Failed` and `Blocked` are terminal. Status strings the
/// client does not recognise are kept as `Unknown` and treated as
/// non-terminal, so a newer backend stage never stops polling early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Blocked,
    Unknown(String),
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Blocked
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Re-observing the same status is always allowed; nothing leaves a
    /// terminal state.
    #[must_use]
    pub fn can_transition_to(&self, next: &TaskStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Blocked => false,
            TaskStatus::Processing => !matches!(next, TaskStatus::Pending),
            TaskStatus::Pending | TaskStatus::Unknown(_) => true,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            "blocked" => TaskStatus::Blocked,
            _ => TaskStatus::Unknown(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single URL extraction request tracked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionTask {
    pub task_id: TaskId,
    pub url: String,
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    /// Backend pipeline stage name, e.g. `"extracting"` or `"semantic"`.
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub result: Option<ExtractionResult>,
    #[serde(default)]
    pub semantic_data: Option<serde_json::Value>,
    #[serde(default)]
    pub story_match: Option<StoryMatch>,
}

impl ExtractionTask {
    /// Whether the screenshot / preview section may be shown for this task.
    ///
    /// Only a completed task whose result is readable qualifies.
    #[must_use]
    pub fn allows_preview(&self) -> bool {
        self.status == TaskStatus::Completed
            && self.result.as_ref().is_some_and(|r| r.is_readable)
    }
}

/// Content extracted from a completed task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub content_text: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub domain: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub is_readable: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub word_count: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub reading_time_minutes: f64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub language_confidence: f64,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub error_message: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
}

/// Link between a completed task and an aggregated story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryMatch {
    #[serde(default)]
    pub story_id: Option<String>,
    #[serde(default)]
    pub story_title: Option<String>,
    #[serde(default)]
    pub is_new: Option<bool>,
    #[serde(default)]
    pub match_score: Option<f64>,
}

/// Accepts RFC 3339 timestamps and the naive `YYYY-MM-DDTHH:MM:SS[.f]` form
/// the backend emits for UTC values. Unparseable values become `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
