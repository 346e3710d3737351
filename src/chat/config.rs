//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::history::DEFAULT_STORE_FILE;
use crate::lang::Language;

/// Default city for weather-scoped answers.
const DEFAULT_CITY: &str = "kaolack";

/// Command-line arguments for the agriagent-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the backend API.
    #[arrrg(optional, "Backend API base URL (default: http://localhost:8095/api)", "URL")]
    pub api: Option<String>,

    /// City to scope weather answers to.
    #[arrrg(optional, "City for weather answers (default: kaolack)", "CITY")]
    pub city: Option<String>,

    /// Language for replies.
    #[arrrg(optional, "Reply language: fr, wo, or en (default: fr)", "LANG")]
    pub language: Option<String>,

    /// Path of the session history file.
    #[arrrg(optional, "Session history file (default: agriagent_sessions.json)", "PATH")]
    pub store: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the backend API. `None` uses the client default.
    pub api_url: Option<String>,

    /// City used to scope weather answers.
    pub city: Option<String>,

    /// Language for replies.
    pub language: Language,

    /// Path of the session history file.
    pub store_path: PathBuf,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Per-request timeout. `None` leaves streaming turns unbounded.
    pub timeout: Option<Duration>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - City: kaolack
    /// - Language: French
    /// - Store: agriagent_sessions.json in the working directory
    /// - Color: enabled
    /// - Timeout: none
    pub fn new() -> Self {
        Self {
            api_url: None,
            city: Some(DEFAULT_CITY.to_string()),
            language: Language::Fr,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            use_color: true,
            timeout: None,
        }
    }

    /// Sets the backend API base URL.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = Some(api_url);
        self
    }

    /// Sets or clears the city.
    pub fn with_city(mut self, city: Option<String>) -> Self {
        self.city = city;
        self
    }

    /// Sets the reply language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the session history file path.
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = path;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let language = args
            .language
            .and_then(|s| s.parse::<Language>().ok())
            .unwrap_or_default();

        ChatConfig {
            api_url: args.api,
            city: args.city.or_else(|| Some(DEFAULT_CITY.to_string())),
            language,
            store_path: args
                .store
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE)),
            use_color: !args.no_color,
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}
