//! Result page: owns at most one poll handle at a time.

use std::sync::Arc;
use std::time::Duration;

use phi_core::TaskId;

use crate::api::ExtractionApi;
use crate::error::TaskUnavailable;
use crate::poller::{PollHandle, PollState, TaskPoller};
use crate::presenter::{ResultPresenter, ResultView};

/// The result view for one task id.
///
/// Showing a different task stops the previous poll before starting the new
/// one; closing the page (or dropping it) stops polling.
pub struct ResultPage<A> {
    api: Arc<A>,
    interval: Duration,
    handle: Option<PollHandle>,
}

impl<A: ExtractionApi> ResultPage<A> {
    #[must_use]
    pub fn new(api: Arc<A>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            handle: None,
        }
    }

    /// Points the page at `task_id`. Re-showing the current task keeps the
    /// existing poll.
    pub fn show(&mut self, task_id: TaskId) -> &PollHandle {
        self.show_with(task_id, |poller| poller)
    }

    /// Like [`ResultPage::show`], letting the caller attach update
    /// callbacks to a newly started poller.
    pub fn show_with<F>(&mut self, task_id: TaskId, configure: F) -> &PollHandle
    where
        F: FnOnce(TaskPoller<A>) -> TaskPoller<A>,
    {
        if self
            .handle
            .as_ref()
            .is_some_and(|h| h.task_id() != &task_id)
        {
            if let Some(previous) = self.handle.take() {
                tracing::debug!(task_id = %previous.task_id(), "task changed, stopping previous poll");
                previous.stop();
            }
        }

        let api = Arc::clone(&self.api);
        let interval = self.interval;
        self.handle
            .get_or_insert_with(|| configure(TaskPoller::new(api, interval)).start(task_id))
    }

    /// Stops polling and forgets the current task.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<PollState> {
        self.handle.as_ref().map(PollHandle::current)
    }

    /// Waits for the current task to finish and presents it, or reports
    /// why it cannot be shown. Returns `None` if no task is shown or polling
    /// was stopped first.
    pub async fn resolve(&self) -> Option<Result<ResultView, TaskUnavailable>> {
        let handle = self.handle.as_ref()?;
        let task = match handle.wait_terminal().await? {
            Ok(task) => task,
            Err(err) => return Some(Err(err)),
        };
        let view = ResultPresenter::new(Arc::clone(&self.api))
            .present(&task)
            .await;
        Some(Ok(view))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use phi_core::{ExtractionTask, LinkPreview};

    use super::*;
    use crate::client::{CreateTaskRequest, CreateTaskResponse};
    use crate::error::ClientError;

    /// Every task stays `processing` except ids listed as finished; ids
    /// starting with `missing` are unknown to the backend.
    struct PerTaskApi {
        finished: Vec<&'static str>,
        fetched: Mutex<Vec<String>>,
        previews: AtomicUsize,
    }

    impl ExtractionApi for PerTaskApi {
        async fn create_task(
            &self,
            _request: &CreateTaskRequest,
        ) -> Result<CreateTaskResponse, ClientError> {
            unreachable!()
        }

        async fn fetch_task(&self, task_id: &TaskId) -> Result<ExtractionTask, ClientError> {
            self.fetched.lock().unwrap().push(task_id.to_string());
            if task_id.as_str().starts_with("missing") {
                return Err(ClientError::NotFound {
                    url: format!("http://backend/api/task/{task_id}"),
                });
            }
            let status = if self.finished.contains(&task_id.as_str()) {
                "completed"
            } else {
                "processing"
            };
            Ok(serde_json::from_value(serde_json::json!({
                "task_id": task_id.as_str(),
                "url": "https://example.com/article",
                "status": status,
                "result": { "title": "Example Article Title", "is_readable": true, "word_count": 420 }
            }))
            .unwrap())
        }

        async fn fetch_task_preview(
            &self,
            _task_id: &TaskId,
        ) -> Result<Option<LinkPreview>, ClientError> {
            self.previews.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    fn api(finished: Vec<&'static str>) -> Arc<PerTaskApi> {
        Arc::new(PerTaskApi {
            finished,
            fetched: Mutex::new(Vec::new()),
            previews: AtomicUsize::new(0),
        })
    }

    const TICK: Duration = Duration::from_millis(5);

    #[tokio::test]
    async fn changing_task_stops_previous_poll() {
        let api = api(vec![]);
        let mut page = ResultPage::new(Arc::clone(&api), TICK);

        page.show(TaskId::new("first").unwrap());
        tokio::time::sleep(TICK * 3).await;
        page.show(TaskId::new("second").unwrap());
        tokio::time::sleep(TICK * 2).await;

        let count_first = || {
            api.fetched
                .lock()
                .unwrap()
                .iter()
                .filter(|id| *id == "first")
                .count()
        };
        let first_after_switch = count_first();
        tokio::time::sleep(TICK * 10).await;
        assert_eq!(count_first(), first_after_switch, "old task no longer polled");
        page.close();
        assert!(page.state().is_none());
    }

    #[tokio::test]
    async fn resolve_presents_finished_task() {
        let api = api(vec!["done"]);
        let mut page = ResultPage::new(Arc::clone(&api), TICK);
        page.show(TaskId::new("done").unwrap());

        let view = page
            .resolve()
            .await
            .expect("task finishes")
            .expect("task is available");

        assert_eq!(view.title, "Example Article Title");
        assert_eq!(view.word_count, Some(420));
        assert_eq!(api.previews.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolve_reports_unknown_task_without_presenting() {
        let api = api(vec![]);
        let mut page = ResultPage::new(Arc::clone(&api), TICK);
        page.show(TaskId::new("missing-1").unwrap());

        let err = page
            .resolve()
            .await
            .expect("poll settles")
            .expect_err("unknown task has no view");

        assert!(err.not_found);
        assert_eq!(api.previews.load(Ordering::SeqCst), 0);
        assert_eq!(api.fetched.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn resolve_after_close_is_none() {
        let mut page = ResultPage::new(api(vec![]), TICK);
        page.show(TaskId::new("never").unwrap());
        page.close();
        assert!(page.resolve().await.is_none());
    }
}
