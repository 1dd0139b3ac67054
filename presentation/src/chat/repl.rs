//! REPL (Read-Eval-Print Loop) for interactive support chat

use crate::ConsoleFormatter;
use assist_application::{ChatRelay, ChatStore, SendMessageUseCase, SendOutcome};
use assist_domain::{PreferencesPatch, Theme};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::Write;
use std::sync::Arc;

/// Interactive chat REPL
pub struct ChatRepl<R: ChatRelay + 'static> {
    relay: Arc<R>,
    use_case: SendMessageUseCase<R>,
    store: ChatStore,
    show_banner: bool,
}

impl<R: ChatRelay + 'static> ChatRepl<R> {
    /// Create a new ChatRepl over an already-hydrated store.
    pub fn new(relay: Arc<R>, store: ChatStore) -> Self {
        Self {
            use_case: SendMessageUseCase::new(Arc::clone(&relay)),
            relay,
            store,
            show_banner: true,
        }
    }

    /// Set whether to print the welcome banner
    pub fn with_banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("assist-chat").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        if self.show_banner {
            self.print_welcome();
        }

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        TechCorp Assist - Support Chat       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Ask about products, plans, billing or the website.");
        println!();
        println!("Commands:");
        println!("  /help      - Show this help");
        println!("  /new       - Start a new chat session");
        println!("  /sessions  - List stored sessions");
        println!("  /switch N  - Switch to session N");
        println!("  /delete N  - Delete session N");
        println!("  /theme T   - Set theme (light or dark)");
        println!("  /quit      - Exit chat");
        println!();
        println!("Ctrl+C while a reply is streaming cancels it.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        let mut parts = cmd.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return true;
            }
            "/help" | "/h" | "/?" => {
                self.print_welcome();
            }
            "/new" => {
                self.store.create_session();
                println!("Started a new chat.");
            }
            "/sessions" | "/list" => {
                println!();
                print!(
                    "{}",
                    ConsoleFormatter::format_session_list(
                        self.store.sessions(),
                        self.store.current_session_id(),
                    )
                );
                println!();
            }
            "/switch" => match self.session_id_at(argument) {
                Some(id) => {
                    self.store.select_session(id);
                    if let Some(session) = self.store.current_session() {
                        println!();
                        print!("{}", ConsoleFormatter::format_transcript(session));
                    }
                }
                None => println!("Usage: /switch <session number> (see /sessions)"),
            },
            "/delete" => match self.session_id_at(argument) {
                Some(id) => {
                    self.store.delete_session(&id);
                    println!("Deleted.");
                }
                None => println!("Usage: /delete <session number> (see /sessions)"),
            },
            "/theme" => match argument.map(str::parse::<Theme>) {
                Some(Ok(theme)) => {
                    self.store
                        .update_preferences(PreferencesPatch::theme(theme));
                    println!("Theme set to {}.", theme);
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Usage: /theme <light|dark>"),
            },
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    /// Resolve a 1-based session index from /sessions into a session id.
    fn session_id_at(&self, argument: Option<&str>) -> Option<String> {
        let index: usize = argument?.parse().ok()?;
        self.store
            .sessions()
            .get(index.checked_sub(1)?)
            .map(|s| s.id.clone())
    }

    async fn process_message(&mut self, content: &str) {
        println!();
        print!("{}: ", "assist".green().bold());
        let _ = std::io::stdout().flush();

        let outcome = {
            let fut = self.use_case.execute(&mut self.store, content, |chunk| {
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
            });
            tokio::pin!(fut);
            tokio::select! {
                outcome = &mut fut => Some(outcome),
                _ = tokio::signal::ctrl_c() => None,
            }
        };

        match outcome {
            Some(SendOutcome::Completed(_)) => {
                println!();
                println!();
            }
            Some(SendOutcome::Failed(reason)) => {
                println!();
                eprintln!("{} {}", "error:".red().bold(), reason);
                println!();
            }
            Some(SendOutcome::Cancelled) | None => {
                // Ctrl+C mid-stream: abort the request, settle the
                // streaming flags, keep the partial text in the session.
                self.relay.cancel();
                self.store.set_streaming(false);
                println!();
                println!("{}", "(cancelled)".dimmed());
                println!();
            }
        }
    }
}
