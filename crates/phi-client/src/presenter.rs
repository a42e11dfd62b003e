//! Result presenter: turns a task (and, when allowed, its link preview) into
//! a render-ready view.

use std::fmt::Write as _;
use std::sync::Arc;

use phi_core::{ExtractionTask, LinkPreview, StoryMatch, TaskId, TaskStatus};

use crate::api::ExtractionApi;

/// Everything the result page shows. Built once per terminal task.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub task_id: TaskId,
    pub url: String,
    pub status: TaskStatus,
    pub stage: Option<String>,
    pub title: String,
    pub domain: Option<String>,
    pub word_count: Option<u64>,
    pub reading_time_minutes: Option<f64>,
    pub language: Option<String>,
    pub language_confidence: Option<f64>,
    pub author: Option<String>,
    pub summary: Option<String>,
    /// Only set for completed, readable results.
    pub screenshot_url: Option<String>,
    /// Only set for completed, readable results whose preview was found.
    pub preview: Option<LinkPreview>,
    pub error_message: Option<String>,
    pub block_reason: Option<String>,
    pub story_match: Option<StoryMatch>,
}

impl ResultView {
    /// Builds the view for `task`. `preview` is discarded unless the task
    /// allows a preview section, so the invariant holds even for callers
    /// that fetched one anyway.
    #[must_use]
    pub fn build(task: &ExtractionTask, preview: Option<LinkPreview>) -> Self {
        let allows_preview = task.allows_preview();
        let result = task.result.as_ref();

        let title = result
            .map(|r| r.title.trim())
            .filter(|t| !t.is_empty())
            .map_or_else(|| task.url.clone(), str::to_owned);

        let error_message = task
            .error_message
            .clone()
            .or_else(|| result.map(|r| r.error_message.clone()))
            .filter(|m| !m.is_empty());

        Self {
            task_id: task.task_id.clone(),
            url: task.canonical_url.clone().unwrap_or_else(|| task.url.clone()),
            status: task.status.clone(),
            stage: task.current_stage.clone(),
            title,
            domain: result.map(|r| r.domain.clone()).filter(|d| !d.is_empty()),
            word_count: result.map(|r| r.word_count),
            reading_time_minutes: result.map(|r| r.reading_time_minutes),
            language: result.map(|r| r.language.clone()).filter(|l| !l.is_empty()),
            language_confidence: result.map(|r| r.language_confidence),
            author: result.and_then(|r| r.author.clone()),
            summary: result.and_then(|r| r.meta_description.clone()),
            screenshot_url: if allows_preview {
                result.and_then(|r| r.screenshot_url.clone())
            } else {
                None
            },
            preview: if allows_preview { preview } else { None },
            error_message,
            block_reason: task.block_reason.clone(),
            story_match: task.story_match.clone(),
        }
    }

    /// The image to show, preferring the preview image over the screenshot.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.preview
            .as_ref()
            .and_then(LinkPreview::image_url)
            .or(self.screenshot_url.as_deref())
    }
}

pub struct ResultPresenter<A> {
    api: Arc<A>,
}

impl<A: ExtractionApi> ResultPresenter<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Builds the view for `task`, fetching the link preview only for a
    /// completed, readable result. A missing or failing preview is not an
    /// error: the view simply has no preview block.
    pub async fn present(&self, task: &ExtractionTask) -> ResultView {
        if !task.allows_preview() {
            tracing::debug!(task_id = %task.task_id, status = %task.status, "preview suppressed");
            return ResultView::build(task, None);
        }

        let preview = match self.api.fetch_task_preview(&task.task_id).await {
            Ok(preview) => preview,
            Err(err) => {
                tracing::debug!(task_id = %task.task_id, error = %err, "preview unavailable");
                None
            }
        };
        ResultView::build(task, preview)
    }
}

/// Renders a result view as plain text.
#[must_use]
pub fn render_result(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    match &view.stage {
        Some(stage) if !view.status.is_terminal() => {
            let _ = writeln!(out, "Status: {} ({stage})", view.status);
        }
        _ => {
            let _ = writeln!(out, "Status: {}", view.status);
        }
    }
    let _ = writeln!(out, "URL: {}", view.url);
    if let Some(domain) = &view.domain {
        let _ = writeln!(out, "Domain: {domain}");
    }
    if let Some(author) = &view.author {
        let _ = writeln!(out, "Author: {author}");
    }

    match view.status {
        TaskStatus::Failed => {
            let message = view.error_message.as_deref().unwrap_or("Extraction failed");
            let _ = writeln!(out, "Error: {message}");
        }
        TaskStatus::Blocked => {
            let reason = view
                .block_reason
                .as_deref()
                .or(view.error_message.as_deref())
                .unwrap_or("Content is not accessible");
            let _ = writeln!(out, "Blocked: {reason}");
        }
        _ => {}
    }

    if let Some(words) = view.word_count {
        let _ = writeln!(out, "Word Count: {words} words");
    }
    if let Some(minutes) = view.reading_time_minutes.filter(|m| *m > 0.0) {
        let _ = writeln!(out, "Reading Time: {minutes:.1} min");
    }
    if let Some(language) = &view.language {
        match view.language_confidence.filter(|c| *c > 0.0) {
            Some(confidence) => {
                let _ = writeln!(out, "Language: {language} ({:.0}% confidence)", confidence * 100.0);
            }
            None => {
                let _ = writeln!(out, "Language: {language}");
            }
        }
    }
    if let Some(summary) = &view.summary {
        let _ = writeln!(out, "\n{summary}");
    }

    if let Some(image) = view.image_url() {
        let _ = writeln!(out, "Image: {image}");
    }
    if let Some(preview) = &view.preview {
        render_preview(&mut out, preview);
    }

    if let Some(story) = &view.story_match {
        if let Some(id) = &story.story_id {
            let title = story.story_title.as_deref().unwrap_or("untitled story");
            let _ = writeln!(out, "Story: {title} (/stories/{id})");
        }
    }
    out
}

fn render_preview(out: &mut String, preview: &LinkPreview) {
    let _ = writeln!(out, "Preview:");
    if let Some(publisher) = preview.publisher.as_ref().and_then(|p| p.name.as_deref()) {
        let _ = writeln!(out, "  Publisher: {publisher}");
    }
    if let Some(title) = &preview.title {
        let _ = writeln!(out, "  Title: {title}");
    }
    if let Some(description) = &preview.description {
        let _ = writeln!(out, "  {description}");
    }
    if let Some(metadata) = &preview.metadata {
        if let Some(date) = &metadata.publish_date {
            let _ = writeln!(out, "  Published: {date}");
        }
        if !metadata.tags.is_empty() {
            let _ = writeln!(out, "  Tags: {}", metadata.tags.join(", "));
        }
    }
}
