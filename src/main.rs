use clap::Parser;
use miette::{IntoDiagnostic, Result};
use revolver::application::engine::RevolverEngine;
use revolver::config::GameConfig;
use revolver::infrastructure::in_memory::InMemoryGameStore;
use revolver::infrastructure::moderation::SimulatedModerator;
use revolver::infrastructure::scheduler::TokioTimeoutScheduler;
use revolver::interfaces::script::ScriptReader;
use revolver::interfaces::tools::ToolRegistry;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON-lines file of tool calls to replay
    #[arg(required_unless_present = "list_tools")]
    script: Option<PathBuf>,

    /// JSON config file with timeout and ban settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the revolver for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds before an abandoned game is cleared (overrides the config file)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// User id immune to bans. May be repeated.
    #[arg(long = "admin")]
    admins: Vec<u64>,

    /// Print the tool definitions as JSON and exit
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_path(path).into_diagnostic()?,
        None => GameConfig::default(),
    };
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    let mut engine = RevolverEngine::new(
        Arc::new(InMemoryGameStore::new()),
        Box::new(SimulatedModerator::with_privileged(cli.admins)),
        Box::new(TokioTimeoutScheduler::new()),
        config,
    )
    .into_diagnostic()?;
    if let Some(seed) = cli.seed {
        engine = engine.with_seed(seed);
    }
    let registry = ToolRegistry::revolver(Arc::new(engine));

    if cli.list_tools {
        let definitions =
            serde_json::to_string_pretty(&registry.definitions()).into_diagnostic()?;
        println!("{definitions}");
        return Ok(());
    }

    let Some(script) = cli.script else {
        return Ok(());
    };
    let file = File::open(script).into_diagnostic()?;
    for call in ScriptReader::new(file).calls() {
        match call {
            Ok(call) => {
                let ctx = call.context();
                match registry.dispatch(&call.tool, &ctx, call.args).await {
                    Ok(reply) => println!("{reply}\n"),
                    Err(e) => eprintln!("Error dispatching tool call: {}", e),
                }
            }
            Err(e) => {
                eprintln!("Error reading tool call: {}", e);
            }
        }
    }

    Ok(())
}
