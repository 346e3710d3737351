//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Start a fresh conversation under a new session id.
    New,

    /// List the saved sessions, most recent first.
    History,

    /// Load a saved session by list number or id.
    Load(String),

    /// Delete a saved session by list number or id.
    Delete(String),

    /// Send a crop photo for diagnosis.
    Image(String),

    /// Change the city used for weather answers.
    City(String),

    /// Change the reply language.
    Lang(String),

    /// Show the weather report, for the given city or the configured one.
    Weather(Option<String>),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use agriagent::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/city thies").is_some());
/// assert!(parse_command("Quand planter le mil ?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" => ChatCommand::New,
        "history" | "sessions" => ChatCommand::History,
        "load" => match argument {
            Some(arg) => ChatCommand::Load(arg.to_string()),
            None => ChatCommand::Invalid("/load requires a session number or id".to_string()),
        },
        "delete" => match argument {
            Some(arg) => ChatCommand::Delete(arg.to_string()),
            None => ChatCommand::Invalid("/delete requires a session number or id".to_string()),
        },
        "image" => match argument {
            Some(arg) => ChatCommand::Image(arg.to_string()),
            None => ChatCommand::Invalid("/image requires a photo path".to_string()),
        },
        "city" => match argument {
            Some(arg) => ChatCommand::City(arg.to_string()),
            None => ChatCommand::Invalid("/city requires a city name".to_string()),
        },
        "lang" | "language" => match argument {
            Some(arg) => ChatCommand::Lang(arg.to_string()),
            None => ChatCommand::Invalid("/lang expects fr, wo, or en".to_string()),
        },
        "weather" => ChatCommand::Weather(argument.map(|s| s.to_string())),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new conversation
  /history               List saved conversations
  /load <n|id>           Load a saved conversation
  /delete <n|id>         Delete a saved conversation
  /image <path>          Diagnose a crop photo (jpeg, png, gif, webp)
  /city <name>           Set the city for weather answers
  /lang <fr|wo|en>       Set the reply language
  /weather [city]        Show the 7-day weather report
  /help                  Show this help message
  /quit                  Exit the chat"#
}
