//! Submission controller: validate a URL, create the task, navigate.

use std::sync::Arc;
use std::time::Instant;

use phi_core::{Action, AppContext, Notice, TaskId};

use crate::api::ExtractionApi;
use crate::client::CreateTaskRequest;
use crate::error::{ClientError, SubmissionError};

pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit URL. Please try again.";

/// Optional backend flags for a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Bypass reuse of a recent task for the same URL.
    pub force: bool,
    /// Attach the extraction to an existing story.
    pub target_story_id: Option<String>,
}

pub struct SubmissionController<A> {
    api: Arc<A>,
}

impl<A: ExtractionApi> SubmissionController<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Submit `url` with default options.
    ///
    /// # Errors
    ///
    /// See [`SubmissionController::submit_with`].
    pub async fn submit(
        &self,
        ctx: &mut AppContext,
        url: &str,
    ) -> Result<TaskId, SubmissionError> {
        self.submit_with(ctx, url, SubmitOptions::default()).await
    }

    /// Validate `url`, issue exactly one creation request, and on success
    /// navigate `ctx` to the task route.
    ///
    /// Failures are converted into a transient notice on `ctx` before being
    /// returned; nothing is retried.
    ///
    /// Dropping the returned future mid-request leaves `ctx` idle on its
    /// current route with no notice.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::EmptyUrl`] if `url` is blank (no request made).
    /// - [`SubmissionError::InFlight`] if `ctx` is already submitting.
    /// - [`SubmissionError::Rejected`] if the request failed or returned no
    ///   task id.
    pub async fn submit_with(
        &self,
        ctx: &mut AppContext,
        url: &str,
        options: SubmitOptions,
    ) -> Result<TaskId, SubmissionError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            let notice = Notice::error(EMPTY_URL_MESSAGE, Instant::now(), ctx.notice_ttl());
            ctx.dispatch(Action::InputRejected(notice));
            return Err(SubmissionError::EmptyUrl);
        }
        if !ctx.state().can_submit() {
            return Err(SubmissionError::InFlight);
        }

        let ttl = ctx.notice_ttl();
        let guard = SubmitGuard::start(ctx);

        let request = CreateTaskRequest {
            url: trimmed.to_owned(),
            force: options.force,
            target_story_id: options.target_story_id,
        };

        match self.api.create_task(&request).await {
            Ok(response) => {
                tracing::info!(
                    task_id = %response.task_id,
                    reused = response.reused,
                    "extraction task created"
                );
                guard.settle(Action::SubmitSucceeded(response.task_id.clone()));
                Ok(response.task_id)
            }
            Err(err) => {
                tracing::warn!(error = %err, target_url = trimmed, "submission failed");
                let notice = Notice::error(failure_message(&err), Instant::now(), ttl);
                guard.settle(Action::SubmitFailed(notice));
                Err(SubmissionError::Rejected(err))
            }
        }
    }
}

/// Holds `ctx` in `Submitting` for the lifetime of one creation request.
/// Dropped without [`SubmitGuard::settle`] (the submit future was cancelled),
/// it dispatches [`Action::SubmitCancelled`] so input is usable again.
struct SubmitGuard<'a> {
    ctx: &'a mut AppContext,
    settled: bool,
}

impl<'a> SubmitGuard<'a> {
    fn start(ctx: &'a mut AppContext) -> Self {
        ctx.dispatch(Action::SubmitStarted);
        Self {
            ctx,
            settled: false,
        }
    }

    fn settle(mut self, outcome: Action) {
        self.ctx.dispatch(outcome);
        self.settled = true;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("submission abandoned before the backend answered");
            self.ctx.dispatch(Action::SubmitCancelled);
        }
    }
}

/// User-facing text for a failed submission; backend `detail` wins when present.
fn failure_message(err: &ClientError) -> String {
    match err {
        ClientError::Api { detail, .. } if !detail.is_empty() => detail.clone(),
        _ => SUBMIT_FAILED_MESSAGE.to_owned(),
    }
}
