//! HOVERSTATE live support
//!
//! Terminal rendition of the agency landing page's interactive corners: the
//! hero terminal and the scripted FAQ support window that hands free-text
//! inquiries to the user's mail client.

mod config;
mod mail;
mod runtime;
mod script;
mod state_machine;
mod terminal;
mod transcript;
mod ui;

use config::AppConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use runtime::{SystemClock, SystemMailComposer};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transcript::InMemoryTranscript;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // The UI owns the screen, so logs go to a file
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new("hoverstate=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    tracing::info!(
        log_file = %config.log_file.display(),
        script = ?config.script_path,
        opener = ?config.mail_opener,
        "Starting HoverState"
    );

    let context = config.widget_context()?;
    let handle = runtime::mount(
        context,
        InMemoryTranscript::new(),
        SystemMailComposer::new(config.mail_opener.clone()),
        SystemClock,
    )
    .await?;

    ui::run(&handle, StdRng::from_entropy()).await?;
    Ok(())
}
