//! `submit` and `task` command handlers.

use std::sync::Arc;
use std::time::Instant;

use phi_client::{render_result, PollState, ResultPage, SubmissionController, SubmitOptions};
use phi_core::{Action, Route, TaskId};

use crate::Session;

/// Submits `url`, then follows the created task unless `no_wait` is set.
pub(crate) async fn run_submit(
    session: &mut Session,
    url: &str,
    options: SubmitOptions,
    no_wait: bool,
) -> anyhow::Result<()> {
    let controller = SubmissionController::new(Arc::clone(&session.client));

    let task_id = match controller.submit_with(&mut session.ctx, url, options).await {
        Ok(task_id) => task_id,
        Err(err) => {
            if let Some(notice) = session.ctx.state().visible_notice(Instant::now()) {
                eprintln!("{}", notice.message);
            }
            return Err(err.into());
        }
    };

    println!("{}", session.ctx.state().route);
    if no_wait {
        return Ok(());
    }
    run_task(session, task_id).await
}

/// Polls `task_id` until it finishes (or ctrl-c) and prints the result.
/// A task the backend cannot serve is reported as an error.
pub(crate) async fn run_task(session: &mut Session, task_id: TaskId) -> anyhow::Result<()> {
    session
        .ctx
        .dispatch(Action::Navigate(Route::Task(task_id.clone())));

    let mut page = ResultPage::new(Arc::clone(&session.client), session.poll_interval());
    page.show_with(task_id, |poller| poller.on_update(print_progress));

    let outcome = tokio::select! {
        outcome = page.resolve() => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, stopping poll");
            None
        }
    };
    page.close();

    match outcome {
        Some(Ok(view)) => print!("{}", render_result(&view)),
        Some(Err(unavailable)) => return Err(unavailable.into()),
        None => eprintln!("polling stopped before the task finished"),
    }
    Ok(())
}

fn print_progress(state: &PollState) {
    if let PollState::Running(task) = state {
        match &task.current_stage {
            Some(stage) => eprintln!("... {} ({stage})", task.status),
            None => eprintln!("... {}", task.status),
        }
    }
}
