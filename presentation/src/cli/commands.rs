//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for assist-chat
#[derive(Parser, Debug)]
#[command(name = "assist-chat")]
#[command(author, version, about = "TechCorp Assist - streaming support chat")]
#[command(long_about = r#"
Assist Chat talks to the TechCorp support relay and streams answers about
products, plans and the website. Conversations are kept locally and survive
restarts.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./assist.toml       Project-level config
3. ~/.config/assist-chat/config.toml   Global config

Example:
  assist-chat                        Start an interactive chat
  assist-chat "How do refunds work?" Ask one question and exit
  assist-chat --endpoint http://localhost:3000/api/chat/stream
"#)]
pub struct Cli {
    /// One-shot question (omit to start interactive chat mode)
    pub question: Option<String>,

    /// Streaming relay endpoint (overrides config)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the welcome banner
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
