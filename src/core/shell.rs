//! Line-oriented shell: echo, look up, print.
//!
//! The shell owns the history and the command table. Actions that reach
//! outside it (theme, matrix speed, the download redirect) are handed back to
//! the session as a [`Dispatch`].

use tracing::debug;

use crate::commands::{
    echo_text, normalize_input, Action, CommandTable, Resolution, DAEMON_SIMULATION_TEXT,
    HELP_TEXT,
};
use crate::history::{History, LineKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty line, or input is currently disabled.
    Ignored,
    /// Output was printed; nothing else to do.
    Printed,
    /// `download`: printed, and the caller should schedule the redirect.
    Redirect,
    /// The history was cleared.
    Cleared,
    /// The caller must perform this action and print its confirmation.
    Action(Action),
}

#[derive(Debug, Clone)]
pub struct Shell {
    table: CommandTable,
    history: History,
    input_enabled: bool,
}

impl Shell {
    pub fn new(history_limit: Option<usize>) -> Self {
        Self {
            table: CommandTable::new(),
            history: History::new(history_limit),
            input_enabled: true,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut CommandTable {
        &mut self.table
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    pub fn submit(&mut self, raw: &str) -> Dispatch {
        if !self.input_enabled {
            return Dispatch::Ignored;
        }
        let cmd = normalize_input(raw);
        let resolution = self.table.resolve(&cmd);
        if resolution == Resolution::Empty {
            return Dispatch::Ignored;
        }

        debug!(command = %cmd, "dispatch");
        self.history.push(LineKind::Echo, echo_text(&cmd));

        match resolution {
            Resolution::Empty => Dispatch::Ignored,
            Resolution::Text { text, redirect } => {
                self.history.output(text);
                if redirect {
                    Dispatch::Redirect
                } else {
                    Dispatch::Printed
                }
            }
            Resolution::Action(Action::ClearHistory) => {
                self.history.clear();
                Dispatch::Cleared
            }
            Resolution::Action(action) => Dispatch::Action(action),
            Resolution::DaemonSimulation => {
                self.history.output(DAEMON_SIMULATION_TEXT);
                self.history.output(HELP_TEXT);
                Dispatch::Printed
            }
            Resolution::NotRecognized(msg) => {
                self.history.output(msg);
                Dispatch::Printed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{not_recognized_text, DOWNLOAD_TEXT, PROMPT};

    #[test]
    fn echo_precedes_output() {
        let mut sh = Shell::new(None);
        assert_eq!(sh.submit(" HELP "), Dispatch::Printed);
        let texts: Vec<&str> = sh.history().texts().collect();
        assert_eq!(texts, vec![format!("{PROMPT}help").as_str(), HELP_TEXT]);
        assert_eq!(sh.history().lines()[0].kind, LineKind::Echo);
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut sh = Shell::new(None);
        assert_eq!(sh.submit("   \t "), Dispatch::Ignored);
        assert!(sh.history().is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let mut sh = Shell::new(None);
        for _ in 0..25 {
            sh.submit("status");
        }
        assert_eq!(sh.submit("clear"), Dispatch::Cleared);
        assert_eq!(sh.history().len(), 0);
    }

    #[test]
    fn unknown_command_prints_only_the_fixed_message() {
        let mut sh = Shell::new(None);
        assert_eq!(sh.submit("rm -rf /"), Dispatch::Printed);
        assert_eq!(sh.history().len(), 2);
        assert_eq!(
            sh.history().lines()[1].text,
            not_recognized_text("rm -rf /")
        );
    }

    #[test]
    fn daemon_prefix_prints_simulation_then_help() {
        let mut sh = Shell::new(None);
        sh.submit("focusd start --now");
        let texts: Vec<&str> = sh.history().texts().skip(1).collect();
        assert_eq!(texts, vec![DAEMON_SIMULATION_TEXT, HELP_TEXT]);
    }

    #[test]
    fn download_asks_for_redirect() {
        let mut sh = Shell::new(None);
        assert_eq!(sh.submit("download"), Dispatch::Redirect);
        assert_eq!(sh.history().lines()[1].text, DOWNLOAD_TEXT);
    }

    #[test]
    fn disabled_input_is_ignored() {
        let mut sh = Shell::new(None);
        sh.set_input_enabled(false);
        assert_eq!(sh.submit("help"), Dispatch::Ignored);
        assert!(sh.history().is_empty());
    }
}
