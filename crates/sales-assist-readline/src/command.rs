//! REPL input parsing.

/// Slash commands offered for completion and listed by `/help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show this help"),
    ("/domains", "List knowledge domains"),
    ("/domain", "Select a domain: /domain <rpa|it|hr|security|general>"),
    ("/files", "List files of the current domain"),
    ("/refresh", "Reload the file list"),
    ("/select", "Toggle a file: /select <number|file_id>"),
    ("/status", "Processing status of a file: /status <file_id>"),
    ("/attach", "Attach a file to the next message: /attach <path>"),
    ("/detach", "Drop the pending attachment"),
    ("/history", "Show stored history of this session"),
    ("/speak", "Toggle voice input"),
    ("/health", "Check the backend"),
    ("/logout", "End the session"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Quit,
    Help,
    Domains,
    Domain(Option<String>),
    Files,
    Refresh,
    Select(String),
    Status(String),
    Attach(String),
    Detach,
    History,
    Speak,
    Health,
    Logout,
    /// Zero-based index into the current suggestions.
    Suggestion(usize),
    Message(String),
    Unknown(String),
}

impl Command {
    /// Parses one line of input.
    ///
    /// A bare positive number picks a suggestion (1-based); anything else
    /// not starting with `/` is a chat message.
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Command::Quit;
        }
        if let Ok(n) = trimmed.parse::<usize>() {
            if n > 0 {
                return Command::Suggestion(n - 1);
            }
        }
        if !trimmed.starts_with('/') {
            return Command::Message(trimmed.to_string());
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };
        let arg = (!arg.is_empty()).then(|| arg.to_string());

        match (name, arg) {
            ("/help", _) => Command::Help,
            ("/domains", _) => Command::Domains,
            ("/domain", arg) => Command::Domain(arg),
            ("/files", _) => Command::Files,
            ("/refresh", _) => Command::Refresh,
            ("/select", Some(arg)) => Command::Select(arg),
            ("/status", Some(arg)) => Command::Status(arg),
            ("/attach", Some(arg)) => Command::Attach(arg),
            ("/detach", _) => Command::Detach,
            ("/history", _) => Command::History,
            ("/speak", _) => Command::Speak,
            ("/health", _) => Command::Health,
            ("/logout", _) => Command::Logout,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_message() {
        assert_eq!(
            Command::parse("  What is our HR onboarding policy? "),
            Command::Message("What is our HR onboarding policy?".to_string())
        );
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_numbers_pick_suggestions() {
        assert_eq!(Command::parse("2"), Command::Suggestion(1));
        assert_eq!(Command::parse("0"), Command::Message("0".to_string()));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(Command::parse("/domain hr"), Command::Domain(Some("hr".to_string())));
        assert_eq!(Command::parse("/domain"), Command::Domain(None));
        assert_eq!(
            Command::parse("/attach  ./my deck.pdf"),
            Command::Attach("./my deck.pdf".to_string())
        );
        assert_eq!(Command::parse("/select 3"), Command::Select("3".to_string()));
    }

    #[test]
    fn test_missing_argument_is_unknown() {
        assert_eq!(Command::parse("/select"), Command::Unknown("/select".to_string()));
        assert_eq!(Command::parse("/nope"), Command::Unknown("/nope".to_string()));
        assert_eq!(Command::parse("exit"), Command::Quit);
    }
}
