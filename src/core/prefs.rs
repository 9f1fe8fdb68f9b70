//! Persisted page preferences (theme and sound) over a key/value store.

use std::collections::BTreeMap;

use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const SFX_KEY: &str = "sfx";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable per-origin string storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store for tests and for hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Paper,
}

impl Theme {
    pub fn as_storage(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Paper => "paper",
        }
    }

    /// Anything but `paper` reads as dark.
    pub fn from_storage(v: Option<&str>) -> Self {
        match v {
            Some("paper") => Theme::Paper,
            _ => Theme::Dark,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Paper,
            Theme::Paper => Theme::Dark,
        }
    }

    /// The theme button offers the other mode.
    pub fn button_label(self) -> &'static str {
        match self {
            Theme::Dark => "[LIGHT MODE]",
            Theme::Paper => "[DARK MODE]",
        }
    }

    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Theme::Dark => None,
            Theme::Paper => Some("paper-mode"),
        }
    }
}

pub fn sound_label(enabled: bool) -> &'static str {
    if enabled {
        "[SFX: ON]"
    } else {
        "[SFX: OFF]"
    }
}

/// Missing or unrecognized values enable sound; only an explicit `false`
/// disables it.
pub fn sound_from_storage(v: Option<&str>) -> bool {
    !matches!(v, Some("false"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub sound_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            sound_enabled: true,
        }
    }
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            theme: Theme::from_storage(store.get(THEME_KEY).as_deref()),
            sound_enabled: sound_from_storage(store.get(SFX_KEY).as_deref()),
        }
    }

    pub fn save_theme(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(THEME_KEY, self.theme.as_storage())
    }

    pub fn save_sound(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(SFX_KEY, if self.sound_enabled { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_defaults_to_dark_with_sound() {
        let prefs = Preferences::load(&MemoryStore::new());
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.theme.button_label(), "[LIGHT MODE]");
        assert_eq!(sound_label(prefs.sound_enabled), "[SFX: ON]");
    }

    #[test]
    fn stored_values_are_read_back() {
        let store = MemoryStore::new()
            .with(THEME_KEY, "paper")
            .with(SFX_KEY, "false");
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme, Theme::Paper);
        assert!(!prefs.sound_enabled);
    }

    #[test]
    fn garbage_values_fall_back_to_defaults() {
        let store = MemoryStore::new()
            .with(THEME_KEY, "neon")
            .with(SFX_KEY, "maybe");
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn saves_write_through() {
        let mut store = MemoryStore::new();
        let prefs = Preferences {
            theme: Theme::Paper,
            sound_enabled: false,
        };
        prefs.save_theme(&mut store).unwrap();
        prefs.save_sound(&mut store).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("paper"));
        assert_eq!(store.get(SFX_KEY).as_deref(), Some("false"));
    }
}
