//! The shell's command table and the pure part of dispatch.
//!
//! Lookup is exact on the normalized (trimmed, lowercased) line: no fuzzy
//! matching and no arguments. The only runtime mutation is the `status` text,
//! rewritten once the latest release tag is known.

use hashbrown::HashMap;

pub const PROMPT: &str = "C:\\Users\\You> ";

pub const HELP_TEXT: &str =
    "Available commands: [help] [status] [features] [download] [clear] [theme] [matrix]";
pub const FEATURES_TEXT: &str =
    "Features: [PRIVACY] [PERFORMANCE] [CONTROL] [INSIGHTS] [POMODORO] [LIMITS]";
pub const DOWNLOAD_TEXT: &str = "Redirecting to GitHub releases...";
pub const FOCUSD_USAGE_TEXT: &str = "Usage: focusd [command]. Try 'focusd help'.";
pub const DAEMON_SIMULATION_TEXT: &str = "Executing focusd daemon... (simulation)";
pub const THEME_TOGGLED_TEXT: &str = "Theme toggled.";
pub const MATRIX_HIGH_TEXT: &str = "Matrix intensity: HIGH";
pub const MATRIX_NORMAL_TEXT: &str = "Matrix intensity: NORMAL";

/// Reserved prefix: any line starting with it that is not an exact key gets
/// the daemon simulation reply.
pub const DAEMON_PREFIX: &str = "focusd";

const DEFAULT_VERSION: &str = "v1.0.0";

pub fn status_text(version: &str) -> String {
    format!("focusd {version} is ONLINE. Privacy protocols active. Zero leaks detected.")
}

pub fn not_recognized_text(cmd: &str) -> String {
    format!("'{cmd}' is not recognized as an internal or external command.")
}

pub fn echo_text(cmd: &str) -> String {
    format!("{PROMPT}{cmd}")
}

/// Trim and lowercase a raw input line.
pub fn normalize_input(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ClearHistory,
    ToggleTheme,
    ToggleMatrixSpeed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Text(String),
    Action(Action),
}

/// What a normalized line resolves to, before any side effect runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Empty after trimming: nothing is echoed or dispatched.
    Empty,
    Text {
        text: String,
        /// External link to open after the configured delay (`download`).
        redirect: bool,
    },
    Action(Action),
    DaemonSimulation,
    NotRecognized(String),
}

#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: HashMap<&'static str, CommandReply>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTable {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert("help", CommandReply::Text(HELP_TEXT.to_string()));
        entries.insert("status", CommandReply::Text(status_text(DEFAULT_VERSION)));
        entries.insert("features", CommandReply::Text(FEATURES_TEXT.to_string()));
        entries.insert("download", CommandReply::Text(DOWNLOAD_TEXT.to_string()));
        entries.insert("clear", CommandReply::Action(Action::ClearHistory));
        entries.insert("theme", CommandReply::Action(Action::ToggleTheme));
        entries.insert("matrix", CommandReply::Action(Action::ToggleMatrixSpeed));
        entries.insert("focusd", CommandReply::Text(FOCUSD_USAGE_TEXT.to_string()));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&CommandReply> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the `status` entry for a freshly fetched release tag.
    pub fn set_release_version(&mut self, version: &str) {
        self.entries
            .insert("status", CommandReply::Text(status_text(version)));
    }

    /// Resolve an already-normalized command.
    pub fn resolve(&self, cmd: &str) -> Resolution {
        if cmd.is_empty() {
            return Resolution::Empty;
        }
        match self.entries.get(cmd) {
            Some(CommandReply::Action(action)) => Resolution::Action(*action),
            Some(CommandReply::Text(text)) => Resolution::Text {
                text: text.clone(),
                redirect: cmd == "download",
            },
            None if cmd.starts_with(DAEMON_PREFIX) => Resolution::DaemonSimulation,
            None => Resolution::NotRecognized(not_recognized_text(cmd)),
        }
    }
}
