//! Session tunables and their serde defaults.

use serde::{Deserialize, Serialize};

pub const RELEASES_API_URL: &str = "https://api.github.com/repos/0xarchit/Focusd/releases/latest";
pub const RELEASES_PAGE_URL: &str = "https://github.com/0xarchit/Focusd/releases";

/// Tunables for a page session. Every field has a serde default so a partial
/// JSON file (or `{}`) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_release_api_url")]
    pub release_api_url: String,
    #[serde(default = "default_download_url")]
    pub download_url: String,
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: u64,
    #[serde(default = "default_glyph_size")]
    pub glyph_size: u32,
    #[serde(default = "default_matrix_normal_ms")]
    pub matrix_normal_ms: u64,
    #[serde(default = "default_matrix_fast_ms")]
    pub matrix_fast_ms: u64,
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
    #[serde(default = "default_typing_min_ms")]
    pub typing_min_ms: u64,
    #[serde(default = "default_typing_max_ms")]
    pub typing_max_ms: u64,
    /// Cap on retained history lines. `None` keeps everything.
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

fn default_release_api_url() -> String {
    RELEASES_API_URL.to_string()
}

fn default_download_url() -> String {
    RELEASES_PAGE_URL.to_string()
}

fn default_download_delay_ms() -> u64 {
    1000
}

fn default_glyph_size() -> u32 {
    16
}

fn default_matrix_normal_ms() -> u64 {
    50
}

fn default_matrix_fast_ms() -> u64 {
    20
}

fn default_toast_ms() -> u64 {
    3000
}

fn default_typing_min_ms() -> u64 {
    10
}

fn default_typing_max_ms() -> u64 {
    30
}

fn default_rng_seed() -> u64 {
    0xF0C5_D5EE_D000_0001
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            release_api_url: default_release_api_url(),
            download_url: default_download_url(),
            download_delay_ms: default_download_delay_ms(),
            glyph_size: default_glyph_size(),
            matrix_normal_ms: default_matrix_normal_ms(),
            matrix_fast_ms: default_matrix_fast_ms(),
            toast_ms: default_toast_ms(),
            typing_min_ms: default_typing_min_ms(),
            typing_max_ms: default_typing_max_ms(),
            history_limit: None,
            rng_seed: default_rng_seed(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = SiteConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SiteConfig::default());
        assert_eq!(cfg.matrix_normal_ms, 50);
        assert_eq!(cfg.download_delay_ms, 1000);
        assert!(cfg.history_limit.is_none());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json(r#"{"history_limit": 200, "toast_ms": 500}"#).unwrap();
        assert_eq!(cfg.history_limit, Some(200));
        assert_eq!(cfg.toast_ms, 500);
        assert_eq!(cfg.glyph_size, 16);
    }
}
