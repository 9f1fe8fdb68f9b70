//! The page session: every flag, timer and component in one owned object.
//!
//! A host (the browser front end, the native shell, a test) creates one
//! [`Site`], forwards user events into it, and pumps [`Site::advance`] with
//! elapsed time. Host-side effects that cannot be expressed as state (opening
//! a link, focusing the input) come back as [`Effect`]s.

use tracing::{debug, warn};

use crate::audio::{AudioBackend, AudioFeedback};
use crate::boot::{BootAction, BootPlayer, SHELL_READY_TEXT};
use crate::commands::{
    Action, CommandReply, MATRIX_HIGH_TEXT, MATRIX_NORMAL_TEXT, PROMPT, THEME_TOGGLED_TEXT,
};
use crate::config::SiteConfig;
use crate::easter_egg::{SequenceDetector, GOD_MODE_TOAST};
use crate::history::{History, LineKind};
use crate::matrix::{MatrixRain, MatrixSpeed, Palette, Renderer};
use crate::prefs::{sound_label, KeyValueStore, Preferences, Theme};
use crate::prng::Prng;
use crate::release::{badge_text, report_failure, ReleaseError, BADGE_OFFLINE, BADGE_PENDING};
use crate::scheduler::{Millis, Scheduler, TaskId};
use crate::shell::{Dispatch, Shell};

const TOAST_PREFIX: &str = "[SYSTEM] ";

/// Longest step [`Site::pump`] takes in one call.
pub const MAX_PUMP_STEP_MS: Millis = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Boot(BootAction),
    MatrixFrame,
    OpenUrl(String),
    HideToast(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open an external link in a new browsing context.
    OpenUrl(String),
    FocusInput,
}

/// Everything a view needs to draw the page chrome, detached from the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub lines: Vec<(LineKind, String)>,
    pub typing_cursor: bool,
    pub input_enabled: bool,
    pub overlay_visible: bool,
    pub sections_revealed: bool,
    pub theme: Theme,
    pub theme_label: &'static str,
    pub sound_label: &'static str,
    pub god_mode: bool,
    pub badge: String,
    pub toast: Option<String>,
}

pub struct Site {
    config: SiteConfig,
    rng: Prng,
    scheduler: Scheduler<Task>,
    shell: Shell,
    store: Box<dyn KeyValueStore>,
    prefs: Preferences,
    audio: AudioFeedback,
    matrix: Option<MatrixRain>,
    matrix_speed: MatrixSpeed,
    matrix_task: Option<TaskId>,
    easter_egg: SequenceDetector,
    god_mode: bool,
    boot: Option<BootPlayer>,
    typing_cursor: bool,
    started: bool,
    overlay_visible: bool,
    sections_revealed: bool,
    badge: String,
    toast: Option<String>,
    toast_generation: u64,
    revision: u64,
}

impl Site {
    /// Reads the persisted theme and sound preferences. Nothing is scheduled
    /// and the input stays closed until [`Site::start_system`] or
    /// [`Site::start_reduced_motion`].
    pub fn new(
        config: SiteConfig,
        store: Box<dyn KeyValueStore>,
        audio_backend: Box<dyn AudioBackend>,
    ) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let mut shell = Shell::new(config.history_limit);
        shell.set_input_enabled(false);
        Self {
            rng: Prng::new(config.rng_seed),
            scheduler: Scheduler::new(),
            shell,
            store,
            prefs,
            audio: AudioFeedback::new(audio_backend, prefs.sound_enabled),
            matrix: None,
            matrix_speed: MatrixSpeed::Normal,
            matrix_task: None,
            easter_egg: SequenceDetector::default(),
            god_mode: false,
            boot: None,
            typing_cursor: false,
            started: false,
            overlay_visible: true,
            sections_revealed: false,
            badge: BADGE_PENDING.to_string(),
            toast: None,
            toast_generation: 0,
            revision: 0,
            config,
        }
    }

    // ----- lifecycle -------------------------------------------------------

    /// The user gesture behind the start overlay: unlock audio, start the
    /// matrix, play the boot sequence. Later calls do nothing.
    pub fn start_system(&mut self, canvas_width: u32, canvas_height: u32) {
        if self.started {
            return;
        }
        self.started = true;
        self.overlay_visible = false;
        self.revision += 1;

        if self.prefs.sound_enabled {
            self.audio.ensure_context(&mut self.rng);
        }

        self.matrix = Some(MatrixRain::new(
            canvas_width,
            canvas_height,
            self.config.glyph_size,
        ));
        self.restart_matrix_loop();

        self.boot = Some(BootPlayer::new(
            self.config.typing_min_ms,
            self.config.typing_max_ms,
        ));
        self.schedule_next_boot_step();
    }

    /// Reduced-motion start: no overlay, no animation, no boot script.
    pub fn start_reduced_motion(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.overlay_visible = false;
        self.sections_revealed = true;
        self.revision += 1;
        self.shell.set_input_enabled(true);
    }

    /// Move the clock forward, running every task that falls due.
    pub fn advance(&mut self, elapsed: Millis, renderer: &mut dyn Renderer) -> Vec<Effect> {
        let target = self.scheduler.now().saturating_add(elapsed);
        let mut effects = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(target) {
            if fired.payload != Task::MatrixFrame {
                self.revision += 1;
            }
            self.run_task(fired.payload, renderer, &mut effects);
        }
        self.scheduler.settle(target);
        effects
    }

    /// [`Site::advance`] for a wall clock. A gap longer than
    /// [`MAX_PUMP_STEP_MS`] (a throttled background tab, a suspended laptop)
    /// is dropped rather than replayed frame by frame.
    pub fn pump(&mut self, elapsed: Millis, renderer: &mut dyn Renderer) -> Vec<Effect> {
        self.advance(elapsed.min(MAX_PUMP_STEP_MS), renderer)
    }

    fn run_task(&mut self, task: Task, renderer: &mut dyn Renderer, effects: &mut Vec<Effect>) {
        match task {
            Task::Boot(action) => {
                self.run_boot_action(action, effects);
                self.schedule_next_boot_step();
            }
            Task::MatrixFrame => {
                let palette = Palette::for_mode(self.prefs.theme, self.god_mode);
                if let Some(m) = self.matrix.as_mut() {
                    m.tick(renderer, &mut self.rng, palette);
                }
            }
            Task::OpenUrl(url) => effects.push(Effect::OpenUrl(url)),
            Task::HideToast(generation) => {
                if generation == self.toast_generation {
                    self.toast = None;
                }
            }
        }
    }

    // ----- boot ------------------------------------------------------------

    fn schedule_next_boot_step(&mut self) {
        let Some(player) = self.boot.as_mut() else {
            return;
        };
        match player.next_step(&mut self.rng) {
            Some(step) => {
                self.scheduler.after(step.delay, Task::Boot(step.action));
            }
            None => self.boot = None,
        }
    }

    fn run_boot_action(&mut self, action: BootAction, effects: &mut Vec<Effect>) {
        debug!(?action, "boot");
        let history = self.shell.history_mut();
        match action {
            BootAction::BeginPrompt => {
                history.push(LineKind::Echo, PROMPT);
                self.typing_cursor = true;
            }
            BootAction::TypeChar(c) => {
                self.audio.click(&mut self.rng);
                if let Some(line) = history.last_mut() {
                    line.text.push(c);
                }
            }
            BootAction::EndPrompt => self.typing_cursor = false,
            BootAction::Log { text, success } => {
                if success {
                    self.audio.chime(&mut self.rng);
                    history.push(LineKind::Success, text);
                } else {
                    if self.rng.above(0.5) {
                        self.audio.click(&mut self.rng);
                    }
                    history.push(LineKind::Output, text);
                }
            }
            BootAction::RevealSections => self.sections_revealed = true,
            BootAction::EnableInput => {
                self.shell.set_input_enabled(true);
                effects.push(Effect::FocusInput);
                let history = self.shell.history_mut();
                history.push(LineKind::Blank, "");
                history.output(SHELL_READY_TEXT);
                history.push(LineKind::Blank, "");
            }
        }
    }

    pub fn booting(&self) -> bool {
        self.boot.is_some()
    }

    // ----- shell -----------------------------------------------------------

    /// Any key in the shell input clicks.
    pub fn input_keydown(&mut self) {
        self.audio.click(&mut self.rng);
    }

    /// Enter pressed in the shell input.
    pub fn submit_line(&mut self, raw: &str) -> Dispatch {
        let dispatch = self.shell.submit(raw);
        if dispatch != Dispatch::Ignored {
            self.revision += 1;
        }
        match dispatch {
            Dispatch::Redirect => {
                let url = self.config.download_url.clone();
                self.scheduler
                    .after(self.config.download_delay_ms, Task::OpenUrl(url));
            }
            Dispatch::Action(Action::ToggleTheme) => {
                self.toggle_theme();
                self.shell.history_mut().output(THEME_TOGGLED_TEXT);
            }
            Dispatch::Action(Action::ToggleMatrixSpeed) => {
                let speed = self.toggle_matrix_speed();
                self.shell.history_mut().output(match speed {
                    MatrixSpeed::Fast => MATRIX_HIGH_TEXT,
                    MatrixSpeed::Normal => MATRIX_NORMAL_TEXT,
                });
            }
            Dispatch::Action(Action::ClearHistory)
            | Dispatch::Cleared
            | Dispatch::Printed
            | Dispatch::Ignored => {}
        }
        dispatch
    }

    pub fn history(&self) -> &History {
        self.shell.history()
    }

    pub fn input_enabled(&self) -> bool {
        self.shell.input_enabled()
    }

    pub fn command_text(&self, cmd: &str) -> Option<String> {
        match self.shell.table().get(cmd)? {
            CommandReply::Text(t) => Some(t.clone()),
            CommandReply::Action(_) => None,
        }
    }

    // ----- preferences -----------------------------------------------------

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.prefs.theme = self.prefs.theme.toggle();
        self.revision += 1;
        if let Err(e) = self.prefs.save_theme(self.store.as_mut()) {
            warn!("theme not persisted: {e}");
        }
        self.prefs.theme
    }

    pub fn sound_enabled(&self) -> bool {
        self.prefs.sound_enabled
    }

    /// Flip sound. Turning it on opens the context and confirms with a click.
    pub fn toggle_sound(&mut self) -> bool {
        self.prefs.sound_enabled = !self.prefs.sound_enabled;
        self.revision += 1;
        self.audio.set_enabled(self.prefs.sound_enabled);
        if let Err(e) = self.prefs.save_sound(self.store.as_mut()) {
            warn!("sound preference not persisted: {e}");
        }
        if self.prefs.sound_enabled {
            self.audio.click(&mut self.rng);
        }
        self.prefs.sound_enabled
    }

    pub fn audio(&self) -> &AudioFeedback {
        &self.audio
    }

    // ----- matrix ----------------------------------------------------------

    pub fn matrix_speed(&self) -> MatrixSpeed {
        self.matrix_speed
    }

    pub fn matrix_period(&self) -> Millis {
        match self.matrix_speed {
            MatrixSpeed::Normal => self.config.matrix_normal_ms,
            MatrixSpeed::Fast => self.config.matrix_fast_ms,
        }
    }

    /// Period of the live animation task, if the animation is running.
    pub fn matrix_task_period(&self) -> Option<Millis> {
        self.matrix_task.and_then(|id| self.scheduler.period_of(id))
    }

    pub fn toggle_matrix_speed(&mut self) -> MatrixSpeed {
        self.matrix_speed = self.matrix_speed.toggle();
        if self.matrix.is_some() {
            self.restart_matrix_loop();
        }
        self.matrix_speed
    }

    /// Cancel the running frame task (if any) before arming a new one, so
    /// there is never more than one animation loop.
    fn restart_matrix_loop(&mut self) {
        if let Some(id) = self.matrix_task.take() {
            self.scheduler.cancel(id);
        }
        let period = self.matrix_period();
        self.matrix_task = Some(self.scheduler.every(period, Task::MatrixFrame));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(m) = self.matrix.as_mut() {
            m.resize(width, height);
        }
    }

    pub fn scheduler(&self) -> &Scheduler<Task> {
        &self.scheduler
    }

    // ----- easter egg ------------------------------------------------------

    /// Document-level key listener.
    pub fn global_keydown(&mut self, key: &str) -> bool {
        if !self.easter_egg.press(key) {
            return false;
        }
        self.god_mode = true;
        self.show_toast(GOD_MODE_TOAST);
        true
    }

    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    // ----- badge, toast ----------------------------------------------------

    /// Result of the one-shot release lookup. Success rewrites the badge and
    /// the `status` command; failure only changes the badge.
    pub fn apply_release(&mut self, result: Result<String, ReleaseError>) {
        self.revision += 1;
        match result {
            Ok(tag) => {
                self.badge = badge_text(&tag);
                self.shell.table_mut().set_release_version(&tag);
            }
            Err(e) => {
                report_failure(&e);
                self.badge = BADGE_OFFLINE.to_string();
            }
        }
    }

    pub fn release_url(&self) -> &str {
        &self.config.release_api_url
    }

    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn show_toast(&mut self, msg: &str) {
        self.revision += 1;
        self.toast_generation += 1;
        self.toast = Some(format!("{TOAST_PREFIX}{msg}"));
        self.scheduler
            .after(self.config.toast_ms, Task::HideToast(self.toast_generation));
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    /// Bumped by every change visible in a [`Snapshot`]. Matrix frames only
    /// touch the canvas and leave it alone.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lines: self
                .history()
                .lines()
                .iter()
                .map(|l| (l.kind, l.text.clone()))
                .collect(),
            typing_cursor: self.typing_cursor,
            input_enabled: self.input_enabled(),
            overlay_visible: self.overlay_visible,
            sections_revealed: self.sections_revealed,
            theme: self.prefs.theme,
            theme_label: self.prefs.theme.button_label(),
            sound_label: sound_label(self.prefs.sound_enabled),
            god_mode: self.god_mode,
            badge: self.badge.clone(),
            toast: self.toast.clone(),
        }
    }
}
