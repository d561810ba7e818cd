use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warden_cli::agent::{AgentBackend, HttpAgentBackend, SimAgentBackend};
use warden_cli::config::Config;
use warden_cli::core::ConversationController;
use warden_cli::exec::{ActionExecutor, HttpExecutor, ShellExecutor, SimExecutor};
use warden_cli::ui::ConsoleFrontend;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), env!("WARDEN_VERSION_SUFFIX"));

#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version = VERSION)]
#[command(about = "Warden - chat with an autonomous agent, approve its actions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the agent
    Chat {
        /// Initial message to send
        message: Option<String>,

        /// Orchestrator backend base URL (overrides config)
        #[arg(long)]
        backend: Option<String>,

        /// Use the offline simulation backend instead of HTTP
        #[arg(long)]
        sim: bool,

        /// Executor for approved actions: http (backend sandbox) or shell (local)
        #[arg(long)]
        executor: Option<String>,

        /// Working directory for the local shell executor
        #[arg(long)]
        cwd: Option<String>,
    },

    /// Check that the orchestrator backend is reachable
    Ping {
        /// Orchestrator backend base URL (overrides config)
        #[arg(long)]
        backend: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "warden_cli=debug"
    } else {
        "warden_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Chat {
            message,
            backend,
            sim,
            executor,
            cwd,
        } => {
            let timeout = Duration::from_secs(config.backend.timeout_secs);
            let base_url = backend.unwrap_or_else(|| config.backend.base_url.clone());

            let agent: Arc<dyn AgentBackend> = if sim {
                Arc::new(SimAgentBackend::new())
            } else {
                Arc::new(HttpAgentBackend::new(base_url.clone(), timeout)?)
            };

            let executor: Arc<dyn ActionExecutor> = if sim && executor.is_none() {
                Arc::new(SimExecutor::new())
            } else {
                match executor
                    .unwrap_or_else(|| config.executor.kind.clone())
                    .as_str()
                {
                    "http" => Arc::new(HttpExecutor::new(base_url, timeout)?),
                    "shell" => {
                        let working_dir = match cwd {
                            Some(dir) => std::path::PathBuf::from(dir),
                            None => std::env::current_dir()?,
                        };
                        Arc::new(ShellExecutor::new(working_dir).with_timeout(
                            Duration::from_secs(config.executor.shell_timeout_secs),
                        ))
                    }
                    other => anyhow::bail!("unknown executor kind: {other} (expected http or shell)"),
                }
            };

            let (event_tx, event_rx) = mpsc::unbounded_channel();
            let mut controller = ConversationController::new(agent, executor, event_tx);
            controller.check_backend().await;

            let mut frontend = ConsoleFrontend::new(controller, event_rx);
            frontend.run(message).await?;
        }
        Commands::Ping { backend } => {
            let base_url = backend.unwrap_or(config.backend.base_url);
            let agent = HttpAgentBackend::new(base_url.clone(), Duration::from_secs(10))?;
            if agent.health().await {
                println!("backend at {base_url} is reachable");
            } else {
                anyhow::bail!("backend at {base_url} is not reachable");
            }
        }
    }

    Ok(())
}
