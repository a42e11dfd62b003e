//! Application state and its pure reducer.
//!
//! All view state lives in [`AppState`] and changes only through
//! [`reduce`]. Time enters through action payloads (`Tick`, notice expiry),
//! so every transition can be tested without a clock. [`AppContext`] owns the
//! state and is passed explicitly to whatever drives the views.

use std::time::{Duration, Instant};

use crate::{AuthStatus, Route, SessionState, TaskId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// A creation request is in flight; the input is disabled.
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient user-facing message that disappears at `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub session: SessionState,
    pub submission: SubmissionState,
    pub notice: Option<Notice>,
    pub chat_open: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Home,
            session: SessionState::Unknown,
            submission: SubmissionState::Idle,
            notice: None,
            chat_open: false,
        }
    }
}

impl AppState {
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.submission == SubmissionState::Idle
    }

    /// The notice to display at `now`, ignoring one that has already expired
    /// but not yet been swept by a `Tick`.
    #[must_use]
    pub fn visible_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Route),
    SessionLoaded(AuthStatus),
    LoggedOut,
    SubmitStarted,
    SubmitSucceeded(TaskId),
    /// Creation request failed; carries the notice to show.
    SubmitFailed(Notice),
    /// The in-flight creation request was abandoned without an outcome.
    SubmitCancelled,
    /// Input was rejected before any request was made.
    InputRejected(Notice),
    Notify(Notice),
    Tick(Instant),
    DismissNotice,
    ToggleChat,
}

/// Pure transition function: applies `action` to `state`.
#[must_use]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Navigate(route) => {
            if let Route::Story { chat_open, .. } = &route {
                state.chat_open = *chat_open;
            } else {
                state.chat_open = false;
            }
            state.route = route;
        }
        Action::SessionLoaded(status) => {
            state.session = SessionState::from(status);
        }
        Action::LoggedOut => {
            state.session = SessionState::Anonymous;
        }
        Action::SubmitStarted => {
            state.submission = SubmissionState::Submitting;
            state.notice = None;
        }
        Action::SubmitSucceeded(task_id) => {
            state.submission = SubmissionState::Idle;
            state.chat_open = false;
            state.route = Route::Task(task_id);
        }
        Action::SubmitFailed(notice) => {
            state.submission = SubmissionState::Idle;
            state.notice = Some(notice);
        }
        Action::SubmitCancelled => {
            state.submission = SubmissionState::Idle;
        }
        Action::InputRejected(notice) | Action::Notify(notice) => {
            state.notice = Some(notice);
        }
        Action::Tick(now) => {
            if state.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
                state.notice = None;
            }
        }
        Action::DismissNotice => {
            state.notice = None;
        }
        Action::ToggleChat => {
            state.chat_open = !state.chat_open;
            if let Route::Story { chat_open, .. } = &mut state.route {
                *chat_open = state.chat_open;
            }
        }
    }
    state
}

/// Explicit application context handed to controllers in place of a
/// global store.
#[derive(Debug, Clone)]
pub struct AppContext {
    state: AppState,
    notice_ttl: Duration,
}

impl AppContext {
    #[must_use]
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            state: AppState::default(),
            notice_ttl,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn notice_ttl(&self) -> Duration {
        self.notice_ttl
    }

    pub fn dispatch(&mut self, action: Action) {
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
    }
}
