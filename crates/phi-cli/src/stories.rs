//! Read-only page handlers: story, feed, instant preview and auth status.

use phi_client::{render_feed, render_instant_preview, render_story};
use phi_core::{Action, Route, SessionState};

use crate::Session;

pub(crate) async fn run_story(session: &mut Session, id: String, chat: bool) -> anyhow::Result<()> {
    session.ctx.dispatch(Action::Navigate(Route::Story {
        id: id.clone(),
        chat_open: chat,
    }));

    let story = session.client.get_story(&id).await?;
    print!("{}", render_story(&story, session.ctx.state().chat_open));
    Ok(())
}

pub(crate) async fn run_feed(session: &mut Session, limit: u32, offset: u32) -> anyhow::Result<()> {
    session.ctx.dispatch(Action::Navigate(Route::Home));

    let page = session.client.get_feed(limit, offset).await?;
    tracing::debug!(count = page.count, offset = page.offset, "feed page loaded");
    print!("{}", render_feed(&page));
    Ok(())
}

pub(crate) async fn run_preview(session: &Session, url: &str) -> anyhow::Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        anyhow::bail!(phi_client::EMPTY_URL_MESSAGE);
    }
    let preview = session.client.get_instant_preview(trimmed).await?;
    print!("{}", render_instant_preview(&preview));
    Ok(())
}

pub(crate) async fn run_auth(session: &mut Session) -> anyhow::Result<()> {
    if session.config.session_cookie.is_none() {
        session.ctx.dispatch(Action::LoggedOut);
    } else {
        let status = session.client.get_auth_status().await?;
        session.ctx.dispatch(Action::SessionLoaded(status));
    }

    match &session.ctx.state().session {
        SessionState::SignedIn(user) => {
            println!("Signed in as {} <{}>", user.name, user.email);
            println!("Credits: {}  Reputation: {}", user.credits, user.reputation);
        }
        SessionState::Anonymous | SessionState::Unknown => println!("Not signed in"),
    }
    Ok(())
}
