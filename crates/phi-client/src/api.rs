//! The seam between the extraction flow and the HTTP client.
//!
//! The submission controller, poller and presenter only need these three
//! calls. [`crate::PhiClient`] implements the trait against the real backend;
//! tests substitute scripted implementations.

use std::future::Future;

use phi_core::{ExtractionTask, LinkPreview, TaskId};

use crate::client::{CreateTaskRequest, CreateTaskResponse};
use crate::error::ClientError;

pub trait ExtractionApi: Send + Sync + 'static {
    /// `POST /api/extract`.
    fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> impl Future<Output = Result<CreateTaskResponse, ClientError>> + Send;

    /// `GET /api/task/{task_id}`.
    fn fetch_task(
        &self,
        task_id: &TaskId,
    ) -> impl Future<Output = Result<ExtractionTask, ClientError>> + Send;

    /// `GET /api/task/{task_id}/preview`; `Ok(None)` when unavailable.
    fn fetch_task_preview(
        &self,
        task_id: &TaskId,
    ) -> impl Future<Output = Result<Option<LinkPreview>, ClientError>> + Send;
}
