//! Domain types, routes, application state and configuration for the φ HERE
//! client. Nothing in this crate performs I/O beyond reading the environment.

pub mod app_config;
pub mod config;
pub mod feed;
pub mod preview;
pub mod route;
pub mod session;
pub mod state;
pub mod story;
pub mod task;
mod wire;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use feed::{clamp_limit, FeedItem, FeedPage, MAX_FEED_LIMIT};
pub use preview::{
    InstantPreview, LinkPreview, PreviewImage, PreviewMetadata, PreviewQuality, Publisher,
};
pub use route::Route;
pub use session::{AuthStatus, SessionState, User};
pub use state::{reduce, Action, AppContext, AppState, Notice, NoticeKind, SubmissionState};
pub use story::{Artifact, Claim, Entity, RelatedStory, Story, StoryEntities, StoryEnvelope};
pub use task::{ExtractionResult, ExtractionTask, StoryMatch, TaskId, TaskStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("task id must not be empty")]
    EmptyTaskId,

    #[error("unrecognised route: {0}")]
    InvalidRoute(String),
}
