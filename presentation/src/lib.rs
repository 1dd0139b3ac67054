//! Presentation layer for assist-chat
//!
//! CLI argument definitions, the interactive chat REPL, and console
//! formatting of sessions and transcripts.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::Cli;
pub use output::ConsoleFormatter;
