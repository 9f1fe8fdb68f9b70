//! # focusd_site
//!
//! Interactive effects for the focusd landing page: a scripted boot sequence,
//! a small cosmetic shell, matrix rain, synthesized sound effects, theme and
//! sound preferences, an easter egg and a latest-release badge.
//!
//! Everything here is platform-neutral. Browser APIs are reached through
//! narrow capability traits ([`matrix::Renderer`], [`audio::AudioBackend`],
//! [`prefs::KeyValueStore`], [`release::HttpClient`],
//! [`clipboard::Clipboard`]) so the whole page can be driven on the host
//! with a simulated clock.
//!
//! ## Quick Start
//!
//! ```
//! use focusd_site::prelude::*;
//!
//! let mut site = Site::new(
//!     SiteConfig::default(),
//!     Box::new(MemoryStore::new()),
//!     Box::new(SilentBackend),
//! );
//! site.start_reduced_motion();
//! site.submit_line(" HELP ");
//! assert_eq!(site.history().len(), 2);
//! ```
//!
//! ## Modules
//!
//! - [`site`]: the session object tying everything together
//! - [`shell`], [`commands`], [`history`]: the cosmetic shell
//! - [`boot`]: boot script player
//! - [`matrix`]: matrix rain animation
//! - [`audio`]: click and chime synthesis
//! - [`scheduler`]: virtual-time task queue

#[path = "core/audio.rs"]
pub mod audio;

#[path = "core/boot.rs"]
pub mod boot;

#[path = "core/clipboard.rs"]
pub mod clipboard;

#[path = "core/commands.rs"]
pub mod commands;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/easter_egg.rs"]
pub mod easter_egg;

#[path = "core/history.rs"]
pub mod history;

#[path = "core/matrix.rs"]
pub mod matrix;

#[path = "core/prefs.rs"]
pub mod prefs;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/release.rs"]
pub mod release;

#[path = "core/scheduler.rs"]
pub mod scheduler;

#[path = "core/shell.rs"]
pub mod shell;

#[path = "core/site.rs"]
pub mod site;

#[path = "core/tilt.rs"]
pub mod tilt;

/// Prelude module for convenient imports.
///
/// ```
/// use focusd_site::prelude::*;
/// ```
pub mod prelude {
    pub use crate::audio::{AudioBackend, AudioError, AudioFeedback, SilentBackend, Voice};
    pub use crate::clipboard::{copy_snippet, copy_to_clipboard, Clipboard, InstallSnippet};
    pub use crate::commands::{Action, CommandReply, CommandTable};
    pub use crate::config::SiteConfig;
    pub use crate::history::{History, HistoryLine, LineKind};
    pub use crate::matrix::{MatrixRain, MatrixSpeed, Renderer};
    pub use crate::prefs::{KeyValueStore, MemoryStore, Preferences, StoreError, Theme};
    pub use crate::release::{fetch_latest_tag, FetchError, HttpClient, ReleaseError};
    pub use crate::scheduler::{Millis, Scheduler, TaskId};
    pub use crate::shell::Dispatch;
    pub use crate::site::{Effect, Site, Snapshot};
}
