//! CLI entrypoint for assist-stream
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use assist_application::{
    ConversationLogger, JobProgressNotifier, JobProgressTracker, ManageJobsUseCase,
    NoConversationLogger, SharedJobBoard, StreamSessionUseCase, TranscriptStore, new_job_board,
};
use assist_domain::{JobId, ModelId};
use assist_infrastructure::{
    ConfigLoader, FileConfig, HttpJobApi, HttpStreamTransport, InMemoryTranscriptStore,
    JsonlConversationLogger,
};
use assist_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, EchoingTranscriptStore, JobProgressReporter,
    SimpleJobProgress,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    info!("Starting assist-stream");

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;

    let conversation_logger = open_conversation_logger(&config);

    let Some(command) = cli.command else {
        bail!("A command is required. Run with --help for usage.");
    };

    // === Dependency Injection ===
    let timeout = Duration::from_secs(config.server.request_timeout_seconds);
    let api = Arc::new(
        HttpJobApi::new(config.server.base_url.clone(), timeout)?
            .with_auth_token(config.server.auth_token.clone()),
    );
    let board = new_job_board();

    match command {
        Command::Chat { model, message } => {
            let model = model
                .or_else(|| config.chat.default_model.clone())
                .context("No model given. Use -m/--model or set chat.default_model.")?;
            let model = ModelId::new(model)?;

            let transport = Arc::new(HttpStreamTransport::new(timeout)?);
            let store: Arc<dyn TranscriptStore> = Arc::new(EchoingTranscriptStore::stdout(
                Arc::new(InMemoryTranscriptStore::new()),
            ));
            let use_case =
                StreamSessionUseCase::new(transport, store.clone(), config.session_params())
                    .with_conversation_logger(conversation_logger);
            let mut repl = ChatRepl::new(use_case, store, model);

            match message {
                Some(message) => {
                    let outcome = repl.send(&message).await?;
                    if let Some(e) = outcome.error {
                        bail!(e);
                    }
                }
                None => repl.run().await?,
            }
        }
        Command::Download { ids } => {
            let manage = ManageJobsUseCase::new(api.clone(), board.clone());
            for id in ids {
                let job_id = JobId::new(id);
                if let Err(e) = manage.start(&job_id).await {
                    eprintln!("{} {}", job_id, e);
                }
            }
            track_until_idle(&config, api, board, cli.quiet, conversation_logger).await;
        }
        Command::Watch => {
            let entries = assist_application::refresh_catalog(api.as_ref(), &board).await?;
            info!(count = entries.len(), "Catalog loaded");
            if board.borrow().active_ids().next().is_none() {
                println!("No downloads in progress.");
                return Ok(());
            }
            track_until_idle(&config, api, board, cli.quiet, conversation_logger).await;
        }
        Command::Cancel { id } => {
            let manage = ManageJobsUseCase::new(api, board);
            let handle = manage.cancel(&JobId::new(id)).await?;
            println!("{}", ConsoleFormatter::job_line(&handle));
        }
        Command::Delete { id } => {
            let manage = ManageJobsUseCase::new(api, board);
            let job_id = JobId::new(id);
            manage.delete(&job_id).await?;
            println!("Deleted {job_id}");
        }
        Command::Catalog => {
            let entries = assist_application::refresh_catalog(api.as_ref(), &board).await?;
            println!("{}", ConsoleFormatter::catalog(&entries));
        }
    }

    Ok(())
}

/// Console diagnostics filtered by verbosity, plus an optional daily file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = || match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(console).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "assist-stream.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(Some(guard))
}

fn open_conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    match config
        .logging
        .conversation_log
        .as_deref()
        .and_then(JsonlConversationLogger::open)
    {
        Some(logger) => {
            info!(path = %logger.path().display(), "Conversation log enabled");
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

/// Poll every active job until none is left downloading or Ctrl-C.
async fn track_until_idle(
    config: &FileConfig,
    api: Arc<HttpJobApi>,
    board: SharedJobBoard,
    quiet: bool,
    conversation_logger: Arc<dyn ConversationLogger>,
) {
    let notifier: Arc<dyn JobProgressNotifier> = if quiet {
        Arc::new(SimpleJobProgress::new())
    } else {
        Arc::new(JobProgressReporter::new())
    };

    let mut tracker = JobProgressTracker::new(
        board.clone(),
        api.clone(),
        api,
        config.jobs.to_tracker_params(),
    )
    .with_notifier(notifier)
    .with_conversation_logger(conversation_logger);

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let task = tokio::spawn(async move { tracker.run(token).await });

    let mut rx = board.subscribe();
    tokio::select! {
        _ = rx.wait_for(|b| b.active_ids().next().is_none()) => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; downloads continue on the server");
        }
    }
    shutdown.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "Tracker task failed");
    }

    for handle in board.borrow().iter() {
        println!("{}", ConsoleFormatter::job_line(handle));
    }
}
