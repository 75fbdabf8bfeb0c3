//! Switchboard - triage-routed multi-agent orchestration
//!
//! Main entry point for the CLI application.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use switchboard::{AgentRegistry, ChatRequest, Config, Message, OpenAiClient, Orchestrator, Repl};

/// Switchboard - triage-routed multi-agent orchestration
#[derive(Parser, Debug)]
#[command(name = "switchboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/switchboard/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Model identifier, overriding the config file
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,

    /// Write the effective configuration to the default config file and exit
    #[arg(long)]
    init: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.set_model(model);
    }

    if args.init {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let registry = AgentRegistry::from_config(&config);
    let client = Arc::new(OpenAiClient::from_config(&config.model)?);
    let orchestrator = Orchestrator::new(&registry, client, config.orchestrator.clone())?;

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let response = orchestrator
            .process_request(ChatRequest::new(vec![Message::user(prompt)]))
            .await;

        println!("{}", response.result);
        eprintln!("[{}]", response.thread_status);
        if let Some(details) = response.error_details {
            anyhow::bail!(details);
        }
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::new(orchestrator, config.model.model.clone());
    repl.run().await?;

    Ok(())
}
