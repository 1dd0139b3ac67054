//! Console rendering of sessions and transcripts

use assist_domain::{ChatSession, Role};
use colored::Colorize;

/// Formats store state for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render the session list, newest first, marking the current session.
    pub fn format_session_list(sessions: &[ChatSession], current_id: Option<&str>) -> String {
        if sessions.is_empty() {
            return "No sessions yet. Type a message to start one.".to_string();
        }

        let mut output = String::new();
        for (index, session) in sessions.iter().enumerate() {
            let marker = if current_id == Some(session.id.as_str()) {
                "*"
            } else {
                " "
            };
            output.push_str(&format!(
                "{} [{}] {}  {}\n",
                marker,
                index + 1,
                session.title.bold(),
                format!(
                    "({} messages, updated {})",
                    session.messages.len(),
                    session.updated_at.format("%Y-%m-%d %H:%M")
                )
                .dimmed()
            ));
        }
        output
    }

    /// Render a full transcript of one session.
    pub fn format_transcript(session: &ChatSession) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", session.title.bold()));
        for message in &session.messages {
            let label = match message.role {
                Role::User => "you".cyan().bold(),
                Role::Assistant => "assist".green().bold(),
            };
            output.push_str(&format!("{}: {}\n\n", label, message.content));
        }
        output
    }
}
