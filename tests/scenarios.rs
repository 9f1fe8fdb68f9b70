//! End-to-end page scenarios on a simulated clock.

use std::cell::RefCell;
use std::rc::Rc;

use focusd_site::commands::{not_recognized_text, status_text, HELP_TEXT};
use focusd_site::config::RELEASES_PAGE_URL;
use focusd_site::easter_egg::GOD_MODE_SEQUENCE;
use focusd_site::prefs::{SFX_KEY, THEME_KEY};
use focusd_site::prelude::*;

/// Store whose contents stay visible to the test after the site takes it.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().set(key, value)
    }
}

#[derive(Default)]
struct NullRenderer {
    glyphs: usize,
}

impl Renderer for NullRenderer {
    fn set_fill_style(&mut self, _style: &str) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
    fn set_font(&mut self, _font: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {
        self.glyphs += 1;
    }
}

#[derive(Default)]
struct CountingAudio {
    opened: Rc<RefCell<u32>>,
    voices: Rc<RefCell<u32>>,
}

impl AudioBackend for CountingAudio {
    fn open(&mut self) -> Result<u32, AudioError> {
        *self.opened.borrow_mut() += 1;
        Ok(1_000)
    }
    fn is_suspended(&self) -> bool {
        false
    }
    fn resume(&mut self) {}
    fn current_time(&self) -> f64 {
        0.0
    }
    fn install_noise(&mut self, _samples: &[f32]) -> Result<(), AudioError> {
        Ok(())
    }
    fn play(&mut self, _at: f64, _voice: &Voice) -> Result<(), AudioError> {
        *self.voices.borrow_mut() += 1;
        Ok(())
    }
}

fn ready_site(store: SharedStore) -> Site {
    let mut site = Site::new(SiteConfig::default(), Box::new(store), Box::new(SilentBackend));
    site.start_reduced_motion();
    site
}

#[test]
fn help_is_trimmed_and_lowercased() {
    let mut site = ready_site(SharedStore::default());
    assert_eq!(site.submit_line(" HELP "), Dispatch::Printed);
    let last = site.history().lines().last().unwrap();
    assert_eq!(last.text, HELP_TEXT);
}

#[test]
fn unknown_commands_touch_nothing_but_history() {
    let store = SharedStore::default();
    let mut site = ready_site(store.clone());
    let mut r = NullRenderer::default();
    for cmd in ["ls", "dir", "exit", "helpp", "themes"] {
        let theme = site.theme();
        let speed = site.matrix_speed();
        site.submit_line(cmd);
        assert_eq!(
            site.history().lines().last().unwrap().text,
            not_recognized_text(cmd)
        );
        assert_eq!(site.theme(), theme);
        assert_eq!(site.matrix_speed(), speed);
        assert!(site.advance(5_000, &mut r).is_empty());
    }
    assert!(store.get(THEME_KEY).is_none());
}

#[test]
fn clear_empties_history_regardless_of_length() {
    let mut site = ready_site(SharedStore::default());
    for n in [0usize, 1, 7, 50] {
        for _ in 0..n {
            site.submit_line("features");
        }
        site.submit_line("clear");
        assert!(site.history().is_empty());
    }
}

#[test]
fn theme_twice_round_trips_the_stored_value() {
    let store = SharedStore::default();
    store.0.borrow_mut().set(THEME_KEY, "paper").unwrap();
    let mut site = ready_site(store.clone());

    site.submit_line("theme");
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    site.submit_line("theme");
    assert_eq!(store.get(THEME_KEY).as_deref(), Some("paper"));
    assert_eq!(site.theme(), Theme::Paper);
}

#[test]
fn matrix_twice_restores_the_period() {
    let mut site = Site::new(
        SiteConfig::default(),
        Box::new(MemoryStore::new()),
        Box::new(SilentBackend),
    );
    site.start_system(640, 480);
    assert_eq!(site.matrix_task_period(), Some(50));

    // Let the boot finish so the shell accepts input.
    let mut r = NullRenderer::default();
    site.advance(5_000, &mut r);
    assert!(r.glyphs > 0);

    site.submit_line("matrix");
    assert_eq!(site.matrix_task_period(), Some(20));
    assert_eq!(
        site.history().lines().last().unwrap().text,
        "Matrix intensity: HIGH"
    );
    site.submit_line("matrix");
    assert_eq!(site.matrix_task_period(), Some(50));
    assert_eq!(
        site.history().lines().last().unwrap().text,
        "Matrix intensity: NORMAL"
    );
}

#[test]
fn matrix_frames_follow_the_active_period() {
    let mut site = Site::new(
        SiteConfig::default(),
        Box::new(MemoryStore::new()),
        Box::new(SilentBackend),
    );
    site.start_system(32, 10_000);
    let mut r = NullRenderer::default();
    site.advance(5_000, &mut r);

    // Two columns per frame.
    let mut fast = NullRenderer::default();
    site.submit_line("matrix");
    site.advance(200, &mut fast);
    assert_eq!(fast.glyphs, 2 * (200 / 20));

    let mut normal = NullRenderer::default();
    site.submit_line("matrix");
    site.advance(200, &mut normal);
    assert_eq!(normal.glyphs, 2 * (200 / 50));
}

#[test]
fn sound_disabled_builds_no_audio_graph() {
    let audio = CountingAudio::default();
    let opened = Rc::clone(&audio.opened);
    let voices = Rc::clone(&audio.voices);
    let store = MemoryStore::new().with(SFX_KEY, "false");
    let mut site = Site::new(SiteConfig::default(), Box::new(store), Box::new(audio));

    site.start_system(64, 64);
    let mut r = NullRenderer::default();
    site.advance(5_000, &mut r);
    site.input_keydown();
    site.submit_line("help");

    assert_eq!(*opened.borrow(), 0);
    assert_eq!(*voices.borrow(), 0);
    assert_eq!(site.snapshot().sound_label, "[SFX: OFF]");
}

#[test]
fn sound_enabled_clicks_and_chimes_during_boot() {
    let audio = CountingAudio::default();
    let opened = Rc::clone(&audio.opened);
    let voices = Rc::clone(&audio.voices);
    let mut site = Site::new(
        SiteConfig::default(),
        Box::new(MemoryStore::new()),
        Box::new(audio),
    );
    site.start_system(64, 64);
    let mut r = NullRenderer::default();
    site.advance(5_000, &mut r);

    assert_eq!(*opened.borrow(), 1);
    // ten typed characters (tone + noise each) plus the four-tone chime at least
    assert!(*voices.borrow() >= 10 * 2 + 4);
}

#[test]
fn download_opens_the_releases_page_exactly_once_after_one_second() {
    let mut site = ready_site(SharedStore::default());
    let mut r = NullRenderer::default();
    site.submit_line("download");

    assert!(site.advance(999, &mut r).is_empty());
    let effects = site.advance(1, &mut r);
    assert_eq!(effects, vec![Effect::OpenUrl(RELEASES_PAGE_URL.to_string())]);
    assert!(site.advance(60_000, &mut r).is_empty());
}

#[test]
fn successful_release_fetch_updates_badge_and_status() {
    struct Canned;
    impl HttpClient for Canned {
        fn get_text<'a>(&'a self, _url: &'a str) -> focusd_site::release::FetchFuture<'a> {
            Box::pin(async { Ok(r#"{"tag_name":"v2.0.0"}"#.to_string()) })
        }
    }

    let mut site = ready_site(SharedStore::default());
    assert_eq!(site.badge(), "Latest: checking...");
    let url = site.release_url().to_string();
    let result = pollster::block_on(fetch_latest_tag(&Canned, &url));
    site.apply_release(result);

    assert_eq!(site.badge(), "Latest: v2.0.0");
    site.submit_line("status");
    assert_eq!(
        site.history().lines().last().unwrap().text,
        status_text("v2.0.0")
    );
}

#[test]
fn network_failure_shows_the_offline_badge() {
    struct Down;
    impl HttpClient for Down {
        fn get_text<'a>(&'a self, _url: &'a str) -> focusd_site::release::FetchFuture<'a> {
            Box::pin(async { Err(FetchError::Network("offline".into())) })
        }
    }

    let mut site = ready_site(SharedStore::default());
    let result = pollster::block_on(fetch_latest_tag(&Down, "https://example.test"));
    site.apply_release(result);
    assert_eq!(site.badge(), "Latest: v1.0.0 (offline)");
    site.submit_line("status");
    assert_eq!(
        site.history().lines().last().unwrap().text,
        status_text("v1.0.0")
    );
}

#[test]
fn easter_egg_survives_a_wrong_tenth_key() {
    let mut site = ready_site(SharedStore::default());

    let triggers = GOD_MODE_SEQUENCE
        .iter()
        .filter(|k| site.global_keydown(k))
        .count();
    assert_eq!(triggers, 1);
    assert!(site.god_mode());
    assert_eq!(site.toast(), Some("[SYSTEM] GOD MODE ACTIVATED"));

    let mut site = ready_site(SharedStore::default());
    for k in &GOD_MODE_SEQUENCE[..9] {
        assert!(!site.global_keydown(k));
    }
    assert!(!site.global_keydown("Enter"));
    assert!(!site.god_mode());
    let triggers = GOD_MODE_SEQUENCE
        .iter()
        .filter(|k| site.global_keydown(k))
        .count();
    assert_eq!(triggers, 1);
    assert!(site.god_mode());
}

#[test]
fn reduced_motion_skips_the_boot() {
    let site = ready_site(SharedStore::default());
    let snap = site.snapshot();
    assert!(!snap.overlay_visible);
    assert!(snap.sections_revealed);
    assert!(snap.input_enabled);
    assert!(snap.lines.is_empty());
    assert_eq!(site.scheduler().pending(), 0);
}

#[test]
fn turning_sound_on_opens_audio_and_clicks() {
    let audio = CountingAudio::default();
    let opened = Rc::clone(&audio.opened);
    let voices = Rc::clone(&audio.voices);
    let store = MemoryStore::new().with(SFX_KEY, "false");
    let mut site = Site::new(SiteConfig::default(), Box::new(store), Box::new(audio));
    site.start_reduced_motion();

    assert!(site.toggle_sound());
    assert_eq!(*opened.borrow(), 1);
    // A click is a tone plus a noise burst.
    assert_eq!(*voices.borrow(), 2);

    // Every key in the input clicks, Enter included.
    site.input_keydown();
    assert_eq!(*voices.borrow(), 4);
    site.input_keydown();
    site.submit_line("help");
    assert_eq!(*voices.borrow(), 6);
    assert_eq!(*opened.borrow(), 1);
}

#[test]
fn sound_toggle_persists_and_relabels() {
    let store = SharedStore::default();
    let mut site = ready_site(store.clone());
    assert!(site.sound_enabled());
    assert!(!site.toggle_sound());
    assert_eq!(store.get(SFX_KEY).as_deref(), Some("false"));
    assert_eq!(site.snapshot().sound_label, "[SFX: OFF]");
    assert!(site.toggle_sound());
    assert_eq!(store.get(SFX_KEY).as_deref(), Some("true"));
}
