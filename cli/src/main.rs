//! CLI entrypoint for Assist Chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use assist_application::{ChatStore, SendMessageUseCase, SendOutcome};
use assist_infrastructure::{ConfigLoader, JsonFileStore, SseChatRelay};
use assist_presentation::{ChatRepl, Cli};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| config.relay.endpoint.clone());

    // Resolve the snapshot path and run startup housekeeping before the
    // store hydrates.
    let snapshot_path = config
        .storage
        .path
        .clone()
        .unwrap_or_else(default_snapshot_path);
    let storage = Arc::new(JsonFileStore::new(snapshot_path));
    storage.prune_sessions(config.storage.max_sessions);

    info!("Starting Assist Chat against {}", endpoint);

    // === Dependency Injection ===
    let relay = Arc::new(SseChatRelay::new(endpoint));
    let mut store = ChatStore::new(storage);
    store.load_from_storage();

    // One-shot mode
    if let Some(question) = cli.question {
        let use_case = SendMessageUseCase::new(Arc::clone(&relay));
        let outcome = use_case
            .execute(&mut store, &question, |chunk| {
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
            })
            .await;
        println!();
        if let SendOutcome::Failed(reason) = outcome {
            anyhow::bail!(reason);
        }
        return Ok(());
    }

    // Chat mode
    let repl = ChatRepl::new(relay, store).with_banner(!cli.quiet);
    repl.run().await?;

    Ok(())
}

/// Default snapshot location: <data_dir>/assist-chat/state.json
fn default_snapshot_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("assist-chat")
        .join("state.json")
}
