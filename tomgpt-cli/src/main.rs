use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tomgpt_cli::repl::Repl;
use tomgpt_cli::{build_session, Args, Secrets, TerminalDisplay};
use tomgpt_core::{CallbackHandler, CallbackManager};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // stderr, so logs never interleave with the chat stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let secrets = Secrets::load(args.secrets.as_deref(), &cwd)?;
    tracing::debug!(variant = ?args.variant, provider = ?args.provider, "starting tomgpt");

    let display: Arc<dyn CallbackHandler> = Arc::new(TerminalDisplay::stdout());
    let session = build_session(&args, &secrets, CallbackManager::new(vec![display]))
        .await
        .context("failed to set up the agent")?;

    Repl::new(session)?.run().await?;
    Ok(())
}
