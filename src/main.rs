// textproc - interactive text processing session
//
// Type or paste text into a single input surface, trigger processing (Enter,
// paste, or a button) and get back a loading indicator, then a result or an
// error. At most one processing cycle runs per session at a time.
//
// Architecture:
// - Session: state machine, validation, invocation bridge, trigger sources
// - Processor: pluggable async backend (mock, failing, remote HTTP)
// - Clipboard: adapter over the system clipboard (arboard) or memory
// - TUI (ratatui): the input surface and its buttons
// - Server (axum): exposes a processor over HTTP for remote sessions

mod cli;
mod clipboard;
mod config;
mod logging;
mod processor;
mod server;
mod session;
mod tui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logging::{LogBuffer, LogSink};
use session::{Attachment, Origin, SubmitOutcome};
use tui::theme::ThemeKind;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management runs before anything else is set up
    if let Some(Commands::Config { show, reset, path }) = cli.command {
        return cli::handle_config(show, reset, path);
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env()?;

    let command = cli.command.unwrap_or(Commands::Run);

    // In TUI mode: capture logs to buffer (prevents garbling the display)
    // Otherwise: logs go to stderr, stdout stays clean for results
    let log_buffer = LogBuffer::new();
    let sink = match command {
        Commands::Run => LogSink::Buffer,
        _ => LogSink::Stderr,
    };
    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging, sink, &log_buffer)?;

    tracing::debug!(version = config::VERSION, "textproc starting");

    match command {
        Commands::Run => run_session(config, log_buffer).await,
        Commands::Process { text } => run_process(config, text).await,
        Commands::Serve { bind } => run_server(config, bind).await,
        // Handled above
        Commands::Config { .. } => Ok(()),
    }
}

async fn run_session(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let processor = processor::from_config(&config.processor)?;
    let clipboard = clipboard::from_config(config.clipboard.fallback);
    let theme = ThemeKind::parse(&config.theme).theme();

    let attachment = Attachment::attach(processor, config.session.max_length);

    tracing::info!("Starting TUI");
    tui::run_tui(attachment, clipboard, theme, log_buffer).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// One programmatic cycle: print the result, or the user-facing error
async fn run_process(config: Config, text: Option<String>) -> Result<()> {
    let text = cli::read_process_input(text)?;
    let processor = processor::from_config(&config.processor)?;

    let attachment = Attachment::attach(processor, config.session.max_length);
    let handle = attachment.handle();
    handle.set_input(&text);

    let outcome = handle.submit(Origin::Programmatic).await;
    let snapshot = attachment.snapshot();
    attachment.detach();

    match outcome {
        SubmitOutcome::Processed => {
            println!("{}", snapshot.processed_result);
            Ok(())
        }
        SubmitOutcome::Failed | SubmitOutcome::Rejected(_) => bail!("{}", snapshot.error_message),
        // A fresh session is neither busy nor detached
        SubmitOutcome::Dropped | SubmitOutcome::Detached => {
            bail!("Processing did not run ({:?})", outcome)
        }
    }
}

async fn run_server(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_addr = bind
            .parse()
            .with_context(|| format!("Invalid bind address {:?}", bind))?;
    }

    let processor = processor::from_config(&config.processor)?;
    let state = server::ServerState::new(processor, config.session.max_length);

    server::serve(&config.server, state, async {
        // Ctrl+C failing to install just means no graceful shutdown
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down...");
    })
    .await
}
