//! Scripted boot sequence.
//!
//! [`BootPlayer`] is a pure state machine: each call to [`BootPlayer::next_step`]
//! yields the delay to wait and the action to perform after it. The caller
//! only asks for the next step once the previous one has run, which keeps the
//! sequence strictly ordered.

use crate::prng::Prng;
use crate::scheduler::Millis;

pub const BOOT_PROGRAM: &str = "focusd.exe";

/// `(text, success)` status lines shown after the program name is typed.
pub const BOOT_LOGS: [(&str, bool); 4] = [
    ("Initializing core protocols...", false),
    ("Verifying local database integrity... [OK]", false),
    ("Loading UI modules...", false),
    ("SUCCESS: focusd initialized successfully.", true),
];

pub const SHELL_READY_TEXT: &str = "Interactive shell ready. Type 'help' for commands.";

const LEAD_IN_MS: Millis = 100;
const AFTER_TYPING_MS: Millis = 100;
const LOG_PACING_MS: Millis = 100;
const REVEAL_AFTER_MS: Millis = 300;
const INPUT_AFTER_MS: Millis = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootAction {
    /// Start the prompt line with a typing cursor.
    BeginPrompt,
    /// Type one character of the program name (with a click).
    TypeChar(char),
    /// Drop the cursor and close the prompt line.
    EndPrompt,
    /// Append a status line.
    Log { text: &'static str, success: bool },
    /// Show the page sections hidden behind the intro.
    RevealSections,
    /// Re-enable and focus the shell input, then greet.
    EnableInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootStep {
    pub delay: Millis,
    pub action: BootAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    LeadIn,
    Typing(usize),
    Logs(usize),
    Input,
    Done,
}

#[derive(Debug, Clone)]
pub struct BootPlayer {
    phase: Phase,
    program: Vec<char>,
    typing_min_ms: Millis,
    typing_max_ms: Millis,
}

impl BootPlayer {
    pub fn new(typing_min_ms: Millis, typing_max_ms: Millis) -> Self {
        Self {
            phase: Phase::LeadIn,
            program: BOOT_PROGRAM.chars().collect(),
            typing_min_ms,
            typing_max_ms: typing_max_ms.max(typing_min_ms),
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    fn typing_delay(&self, rng: &mut Prng) -> Millis {
        let lo = self.typing_min_ms.min(u64::from(u32::MAX)) as u32;
        let hi = self.typing_max_ms.min(u64::from(u32::MAX - 1)) as u32;
        Millis::from(rng.gen_range_u32(lo, hi + 1))
    }

    pub fn next_step(&mut self, rng: &mut Prng) -> Option<BootStep> {
        let (delay, action, next) = match self.phase {
            Phase::LeadIn => (LEAD_IN_MS, BootAction::BeginPrompt, Phase::Typing(0)),
            Phase::Typing(i) => match self.program.get(i) {
                Some(&c) => (self.typing_delay(rng), BootAction::TypeChar(c), Phase::Typing(i + 1)),
                None => (AFTER_TYPING_MS, BootAction::EndPrompt, Phase::Logs(0)),
            },
            Phase::Logs(i) => match BOOT_LOGS.get(i) {
                Some(&(text, success)) => (
                    LOG_PACING_MS,
                    BootAction::Log { text, success },
                    Phase::Logs(i + 1),
                ),
                None => (REVEAL_AFTER_MS, BootAction::RevealSections, Phase::Input),
            },
            Phase::Input => (INPUT_AFTER_MS, BootAction::EnableInput, Phase::Done),
            Phase::Done => return None,
        };
        self.phase = next;
        Some(BootStep { delay, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(player: &mut BootPlayer, rng: &mut Prng) -> Vec<BootStep> {
        std::iter::from_fn(|| player.next_step(rng)).collect()
    }

    #[test]
    fn script_runs_in_order() {
        let mut rng = Prng::new(42);
        let mut player = BootPlayer::new(10, 30);
        let steps = drain(&mut player, &mut rng);
        assert!(player.is_done());

        let actions: Vec<&BootAction> = steps.iter().map(|s| &s.action).collect();
        assert_eq!(actions[0], &BootAction::BeginPrompt);
        let typed: String = actions
            .iter()
            .filter_map(|a| match a {
                BootAction::TypeChar(c) => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(typed, BOOT_PROGRAM);

        let n = actions.len();
        assert_eq!(actions[n - 1], &BootAction::EnableInput);
        assert_eq!(actions[n - 2], &BootAction::RevealSections);
        assert_eq!(
            actions[n - 3],
            &BootAction::Log {
                text: "SUCCESS: focusd initialized successfully.",
                success: true
            }
        );
        assert_eq!(actions[1 + BOOT_PROGRAM.len()], &BootAction::EndPrompt);
        assert_eq!(n, 1 + BOOT_PROGRAM.len() + 1 + BOOT_LOGS.len() + 2);
    }

    #[test]
    fn pacing_matches_the_script() {
        let mut rng = Prng::new(1);
        let mut player = BootPlayer::new(10, 30);
        let steps = drain(&mut player, &mut rng);

        for s in &steps {
            match s.action {
                BootAction::TypeChar(_) => assert!((10..=30).contains(&s.delay)),
                BootAction::BeginPrompt | BootAction::EndPrompt => assert_eq!(s.delay, 100),
                BootAction::Log { .. } => assert_eq!(s.delay, 100),
                BootAction::RevealSections => assert_eq!(s.delay, 300),
                BootAction::EnableInput => assert_eq!(s.delay, 200),
            }
        }
        assert!(player.next_step(&mut rng).is_none());
    }

    #[test]
    fn exactly_one_success_line() {
        assert_eq!(BOOT_LOGS.iter().filter(|(_, ok)| *ok).count(), 1);
    }
}
