//! Client-visible routes.

use crate::{CoreError, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Feed listing plus the submission form.
    Home,
    /// Result view for one extraction task.
    Task(TaskId),
    /// Story page; `chat_open` shows the chat sidebar.
    Story { id: String, chat_open: bool },
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Task(id) => format!("/tasks/{id}"),
            Route::Story { id, chat_open } => {
                if *chat_open {
                    format!("/stories/{id}?chat=1")
                } else {
                    format!("/stories/{id}")
                }
            }
        }
    }

    /// Parse a route path. `/task/{id}` is accepted as a legacy alias of
    /// `/tasks/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRoute`] for paths that match no route, or
    /// [`CoreError::EmptyTaskId`] for a task route with a blank id.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = path.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["tasks" | "task", id] => Ok(Route::Task(TaskId::new(*id)?)),
            ["stories", id] => Ok(Route::Story {
                id: (*id).to_string(),
                chat_open: query_flag(query, "chat"),
            }),
            _ => Err(CoreError::InvalidRoute(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

fn query_flag(query: &str, key: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(k, v)| k == key && matches!(v, "1" | "true" | "yes"))
}
