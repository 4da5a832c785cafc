use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use resolution_coach::coach::{CoachService, ThreadStore, coach_routes, spawn_prune_task};
use resolution_coach::config::{ClientConfig, ServerConfig};
use resolution_coach::flow::{FlowConfig, HttpSessionTransport, QuestionFlowEngine};
use resolution_coach::llm::create_provider;
use resolution_coach::terminal::TerminalWizard;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the coach HTTP server.
    Serve {
        #[arg(long, env = "RESOLUTION_COACH_PORT", help = "Port to listen on.")]
        port: Option<u16>,
    },
    /// Build a resolution plan interactively in the terminal.
    Ask {
        #[arg(long, env = "RESOLUTION_COACH_SERVER_URL", help = "Coach server base URL.")]
        server_url: Option<String>,
        #[arg(
            long,
            env = "RESOLUTION_COACH_REQUEST_TIMEOUT_SECS",
            help = "Give up on a request after this many seconds (0 waits forever)."
        )]
        timeout_secs: Option<u64>,
        #[arg(long, help = "Send answers to /submit_answer instead of /get_next_question.")]
        legacy_endpoint: bool,
        #[arg(long, help = "Also write the finished plan as HTML to this file.")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => serve(port).await,
        Command::Ask {
            server_url,
            timeout_secs,
            legacy_endpoint,
            output,
        } => ask(server_url, timeout_secs, legacy_endpoint, output).await,
    }
}

async fn serve(port: Option<u16>) -> Result<()> {
    let mut config = ServerConfig::from_env().context("Failed to load server configuration")?;
    if let Some(port) = port {
        config.port = port;
    }
    let _log_guard = init_tracing(config.log_dir.as_deref(), "info");

    eprintln!("🎯 Resolution Coach v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Questions per session: {}", config.coach.max_questions);
    eprintln!("   API: http://0.0.0.0:{}/start_session", config.port);

    let llm = create_provider(&config.llm)?;
    let threads = ThreadStore::new();
    let _prune_handle = spawn_prune_task(threads.clone(), config.coach.max_idle);
    let service = Arc::new(CoachService::new(llm, threads, config.coach.clone()));
    let app = coach_routes(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Coach server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}

async fn ask(
    server_url: Option<String>,
    timeout_secs: Option<u64>,
    legacy_endpoint: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = ClientConfig::from_env().context("Failed to load client configuration")?;
    if let Some(url) = server_url {
        config.server_url = url;
    }
    if let Some(secs) = timeout_secs {
        config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    config.legacy_submit_path |= legacy_endpoint;
    // Keep the terminal readable; warnings and errors only unless RUST_LOG says otherwise.
    let _log_guard = init_tracing(config.log_dir.as_deref(), "warn");

    let transport = HttpSessionTransport::new(&config.server_url)
        .with_legacy_submit_path(config.legacy_submit_path);
    let engine = QuestionFlowEngine::with_config(
        Arc::new(transport),
        FlowConfig {
            request_timeout: config.request_timeout,
        },
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut wizard =
        TerminalWizard::new(stdin, tokio::io::stdout(), engine).with_html_output(output);
    wizard.run().await?;
    Ok(())
}

/// Log to stderr, and to a daily-rolling file when `log_dir` is set. The
/// returned guard must be held until exit so buffered lines are flushed.
fn init_tracing(log_dir: Option<&Path>, default_level: &str) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "resolution-coach.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    guard
}
