//! Key-sequence detector for the "god mode" easter egg.

/// Key identifiers as reported by `KeyboardEvent.key`.
pub const GOD_MODE_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

pub const GOD_MODE_TOAST: &str = "GOD MODE ACTIVATED";
pub const GOD_MODE_CLASS: &str = "god-mode";

/// CSS custom properties overridden while god mode is active.
pub const GOD_MODE_STYLE_OVERRIDES: [(&str, &str); 2] =
    [("--accent-color", "#ff0000"), ("--text-color", "#ffaaaa")];

/// Progress through a fixed sequence. Any out-of-sequence key drops progress
/// to zero (that key is not re-tested as a fresh start). Completing the
/// sequence reports once and rearms.
#[derive(Debug, Clone)]
pub struct SequenceDetector {
    sequence: &'static [&'static str],
    index: usize,
}

impl Default for SequenceDetector {
    fn default() -> Self {
        Self::new(&GOD_MODE_SEQUENCE)
    }
}

impl SequenceDetector {
    pub fn new(sequence: &'static [&'static str]) -> Self {
        Self { sequence, index: 0 }
    }

    pub fn progress(&self) -> usize {
        self.index
    }

    /// Feed one key. Returns true exactly when this key completes the sequence.
    pub fn press(&mut self, key: &str) -> bool {
        if self.sequence.get(self.index) == Some(&key) {
            self.index += 1;
            if self.index == self.sequence.len() {
                self.index = 0;
                return true;
            }
        } else {
            self.index = 0;
        }
        false
    }
}
