mod extract;
mod stories;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use phi_client::PhiClient;
use phi_core::{AppConfig, AppContext, Route};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "phi")]
#[command(about = "Submit articles for extraction and browse the story feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a URL for extraction and follow the task to completion
    Submit {
        url: String,
        /// Re-extract even if a recent task exists for this URL
        #[arg(long)]
        force: bool,
        /// Attach the extraction to an existing story
        #[arg(long = "story")]
        story_id: Option<String>,
        /// Print the task route and exit without polling
        #[arg(long)]
        no_wait: bool,
    },
    /// Follow an existing extraction task
    Task { task_id: String },
    /// Show a story page
    Story {
        id: String,
        /// Open the story chat panel
        #[arg(long)]
        chat: bool,
    },
    /// Show the ranked story feed
    Feed {
        #[arg(long, default_value = "20")]
        limit: u32,
        #[arg(long, default_value = "0")]
        offset: u32,
    },
    /// Show cached preview metadata for a URL without submitting it
    Preview { url: String },
    /// Show the signed-in user for the configured session
    Auth,
    /// Open an app route such as `/tasks/<id>` or `/stories/<id>?chat=1`
    Open { path: String },
}

/// Shared handles every command needs.
pub(crate) struct Session {
    pub(crate) config: AppConfig,
    pub(crate) client: Arc<PhiClient>,
    pub(crate) ctx: AppContext,
}

impl Session {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = Arc::new(PhiClient::from_config(&config)?);
        let ctx = AppContext::new(Duration::from_secs(config.notice_ttl_secs));
        Ok(Self {
            config,
            client,
            ctx,
        })
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.poll_interval_ms)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = phi_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.env.is_development())
        .init();

    tracing::debug!(config = ?config, "configuration loaded");

    let mut session = Session::new(config)?;

    match cli.command {
        Some(Commands::Submit {
            url,
            force,
            story_id,
            no_wait,
        }) => {
            let options = phi_client::SubmitOptions {
                force,
                target_story_id: story_id,
            };
            extract::run_submit(&mut session, &url, options, no_wait).await?;
        }
        Some(Commands::Task { task_id }) => {
            let task_id = phi_core::TaskId::new(task_id)?;
            extract::run_task(&mut session, task_id).await?;
        }
        Some(Commands::Story { id, chat }) => {
            stories::run_story(&mut session, id, chat).await?;
        }
        Some(Commands::Feed { limit, offset }) => {
            stories::run_feed(&mut session, limit, offset).await?;
        }
        Some(Commands::Preview { url }) => stories::run_preview(&session, &url).await?,
        Some(Commands::Auth) => stories::run_auth(&mut session).await?,
        Some(Commands::Open { path }) => run_open(&mut session, &path).await?,
        None => stories::run_feed(&mut session, 20, 0).await?,
    }

    Ok(())
}

/// Dispatches a route path to the page that renders it.
async fn run_open(session: &mut Session, path: &str) -> anyhow::Result<()> {
    match Route::parse(path)? {
        Route::Home => stories::run_feed(session, 20, 0).await,
        Route::Task(task_id) => extract::run_task(session, task_id).await,
        Route::Story { id, chat_open } => stories::run_story(session, id, chat_open).await,
    }
}
