use std::cell::{Cell, RefCell};
use std::time::Duration;

use focusd_site::clipboard::InstallSnippet;
use focusd_site::config::SiteConfig;
use focusd_site::easter_egg::{GOD_MODE_CLASS, GOD_MODE_STYLE_OVERRIDES};
use focusd_site::prefs::Theme;
use focusd_site::release::fetch_latest_tag;
use focusd_site::site::{Effect as SiteEffect, Site, Snapshot};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_time::Instant;

mod audio;
mod canvas;
mod clipboard;
mod http;
mod page;
mod storage;

use canvas::{CanvasRenderer, Offscreen};
use page::{reveal_class, Header, SnippetBox, StartOverlay, Terminal, TiltCard, Toast};

const PUMP_INTERVAL_MS: i32 = 16;

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
    static RENDERER: RefCell<Option<CanvasRenderer>> = const { RefCell::new(None) };
    static SHOWN_REVISION: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Run `f` against the page session. `None` before [`start`] has installed it.
pub(crate) fn with_site<R>(f: impl FnOnce(&mut Site) -> R) -> Option<R> {
    SITE.with(|s| s.borrow_mut().as_mut().map(f))
}

pub(crate) fn js_err(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn console_warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// Copy the session state into the view signal when its revision moved.
pub(crate) fn refresh(snapshot: RwSignal<Snapshot>) {
    let next = with_site(|s| {
        let rev = s.revision();
        (SHOWN_REVISION.get() != Some(rev)).then(|| (rev, s.snapshot()))
    })
    .flatten();
    if let Some((rev, next)) = next {
        SHOWN_REVISION.set(Some(rev));
        snapshot.set(next);
    }
}

pub fn start() {
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let config = SiteConfig::default().with_seed(seed);
    let site = Site::new(
        config,
        Box::new(storage::LocalStore),
        Box::new(audio::WebAudio::default()),
    );
    SITE.with(|s| *s.borrow_mut() = Some(site));
    mount_to_body(|| view! { <App /> });
}

fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|m| m.matches())
}

fn apply_body_classes(theme: Theme, god_mode: bool) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(body) = doc.body() {
        let classes = body.class_list();
        let _ = classes.toggle_with_force("paper-mode", theme.body_class().is_some());
        let _ = classes.toggle_with_force(GOD_MODE_CLASS, god_mode);
    }
    if !god_mode {
        return;
    }
    let Some(root) = doc
        .document_element()
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return;
    };
    for (name, value) in GOD_MODE_STYLE_OVERRIDES {
        let _ = root.style().set_property(name, value);
    }
}

fn open_in_new_tab(url: &str) {
    if let Some(w) = web_sys::window() {
        if let Err(e) = w.open_with_url_and_target(url, "_blank") {
            console_warn(&format!("open {url}: {}", js_err(&e)));
        }
    }
}

/// Drive the session clock from real time. Runs for the life of the page so
/// timers (download redirect, toast) work with or without the animation.
fn start_pump(
    snapshot: RwSignal<Snapshot>,
    input_ref: NodeRef<leptos::html::Input>,
) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window".to_string())?;
    let mut last = Instant::now();
    let cb = Closure::wrap(Box::new(move || {
        let elapsed = Instant::now().duration_since(last).as_millis() as u64;
        last += Duration::from_millis(elapsed);

        let effects = RENDERER.with(|r| {
            let mut slot = r.borrow_mut();
            with_site(|site| match slot.as_mut() {
                Some(renderer) => site.pump(elapsed, renderer),
                None => site.pump(elapsed, &mut Offscreen),
            })
            .unwrap_or_default()
        });
        for effect in effects {
            match effect {
                SiteEffect::OpenUrl(url) => open_in_new_tab(&url),
                SiteEffect::FocusInput => {
                    if let Some(input) = input_ref.get_untracked() {
                        let _ = input.focus();
                    }
                }
            }
        }
        refresh(snapshot);
    }) as Box<dyn FnMut()>);

    window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            PUMP_INTERVAL_MS,
        )
        .map_err(|e| format!("failed to start interval: {}", js_err(&e)))?;
    cb.forget();
    Ok(())
}

/// Document-wide listeners: the easter egg and canvas resizing.
fn install_listeners(
    snapshot: RwSignal<Snapshot>,
    canvas_ref: NodeRef<leptos::html::Canvas>,
) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window".to_string())?;
    let doc = window.document().ok_or("no document".to_string())?;

    let on_key = Closure::wrap(Box::new(move |ev: web_sys::KeyboardEvent| {
        if with_site(|s| s.global_keydown(&ev.key())).unwrap_or(false) {
            refresh(snapshot);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())
        .map_err(|e| format!("keydown listener: {}", js_err(&e)))?;
    on_key.forget();

    let on_resize = Closure::wrap(Box::new(move || {
        if let Some(canvas) = canvas_ref.get_untracked() {
            let (w, h) = canvas::fit_to_window(&canvas);
            with_site(|s| s.resize(w, h));
        }
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|e| format!("resize listener: {}", js_err(&e)))?;
    on_resize.forget();
    Ok(())
}

#[component]
fn App() -> impl IntoView {
    let snapshot = RwSignal::new(with_site(|s| s.snapshot()).unwrap_or_default());
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let input_ref = NodeRef::<leptos::html::Input>::new();

    Effect::new(move |_| {
        let (theme, god_mode) = snapshot.with(|s| (s.theme, s.god_mode));
        apply_body_classes(theme, god_mode);
    });

    if prefers_reduced_motion() {
        with_site(|s| s.start_reduced_motion());
        refresh(snapshot);
    }

    if let Err(e) = start_pump(snapshot, input_ref) {
        console_warn(&e);
    }
    if let Err(e) = install_listeners(snapshot, canvas_ref) {
        console_warn(&e);
    }

    spawn_local(async move {
        let Some(url) = with_site(|s| s.release_url().to_string()) else {
            return;
        };
        let result = fetch_latest_tag(&http::BrowserFetch, &url).await;
        with_site(|s| s.apply_release(result));
        refresh(snapshot);
    });

    let start_system = move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let (w, h) = canvas::fit_to_window(&canvas);
        match CanvasRenderer::new(&canvas) {
            Ok(r) => RENDERER.with(|slot| *slot.borrow_mut() = Some(r)),
            Err(e) => console_warn(&e),
        }
        with_site(|s| s.start_system(w, h));
        refresh(snapshot);
    };

    view! {
        <canvas id="matrix-canvas" node_ref=canvas_ref></canvas>
        <StartOverlay snapshot=snapshot on_start=Callback::new(move |_| start_system()) />
        <Header snapshot=snapshot />
        <main class="container">
            <Terminal snapshot=snapshot input_ref=input_ref />
            <section class=move || reveal_class(snapshot, "features")>
                <TiltCard title="Privacy" body="Everything stays on your machine. No accounts, no cloud." />
                <TiltCard title="Performance" body="A tiny background daemon that stays out of your way." />
                <TiltCard title="Control" body="Limits, Pomodoro sessions and insights from the command line." />
            </section>
            <section class=move || reveal_class(snapshot, "install")>
                <SnippetBox snapshot=snapshot snippet=InstallSnippet::PowerShell />
                <SnippetBox snapshot=snapshot snippet=InstallSnippet::Cmd />
            </section>
        </main>
        <Toast snapshot=snapshot />
    }
}
