//! Client for the φ HERE backend: submission, task polling and result
//! presentation for URL extraction, plus story and feed reads.

pub mod api;
pub mod client;
pub mod error;
pub mod page;
pub mod poller;
pub mod presenter;
pub(crate) mod retry;
pub mod story;
pub mod submit;

pub use api::ExtractionApi;
pub use client::{CreateTaskRequest, CreateTaskResponse, PhiClient};
pub use error::{ClientError, SubmissionError, TaskUnavailable};
pub use page::ResultPage;
pub use poller::{PollHandle, PollState, TaskPoller};
pub use presenter::{render_result, ResultPresenter, ResultView};
pub use story::{render_feed, render_instant_preview, render_story};
pub use submit::{SubmissionController, SubmitOptions, EMPTY_URL_MESSAGE, SUBMIT_FAILED_MESSAGE};
