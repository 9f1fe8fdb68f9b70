use focusd_site::clipboard::{copy_snippet, InstallSnippet};
use focusd_site::commands::PROMPT;
use focusd_site::history::LineKind;
use focusd_site::site::Snapshot;
use focusd_site::tilt::{tilt_transform, PointerInCard, TILT_RESET};
use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::clipboard::BrowserClipboard;
use super::{refresh, with_site};

pub(super) fn reveal_class(snapshot: RwSignal<Snapshot>, base: &str) -> String {
    if snapshot.with(|s| s.sections_revealed) {
        format!("{base} delayed-reveal visible")
    } else {
        format!("{base} delayed-reveal")
    }
}

fn line_class(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Echo => "command-line",
        LineKind::Output => "command-output",
        LineKind::Success => "command-output success",
        LineKind::Blank => "command-output blank",
    }
}

#[component]
pub(super) fn StartOverlay(snapshot: RwSignal<Snapshot>, on_start: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || snapshot.with(|s| s.overlay_visible)>
            <div id="start-overlay" on:click=move |_| on_start.run(())>
                <div class="start-text">"[ CLICK TO INITIALIZE ]"</div>
            </div>
        </Show>
    }
}

#[component]
pub(super) fn Header(snapshot: RwSignal<Snapshot>) -> impl IntoView {
    view! {
        <header class="site-header">
            <span class="brand">"focusd"</span>
            <span id="github-badge">{move || snapshot.with(|s| s.badge.clone())}</span>
            <div class="header-controls">
                <button
                    id="theme-btn"
                    on:click=move |_| {
                        with_site(|s| s.toggle_theme());
                        refresh(snapshot);
                    }
                >
                    {move || snapshot.with(|s| s.theme_label)}
                </button>
                <button
                    id="sfx-btn"
                    on:click=move |_| {
                        with_site(|s| s.toggle_sound());
                        refresh(snapshot);
                    }
                >
                    {move || snapshot.with(|s| s.sound_label)}
                </button>
            </div>
        </header>
    }
}

#[component]
pub(super) fn Terminal(
    snapshot: RwSignal<Snapshot>,
    input_ref: NodeRef<leptos::html::Input>,
) -> impl IntoView {
    let on_keydown = move |ev: KeyboardEvent| {
        with_site(|s| s.input_keydown());
        if ev.key() != "Enter" {
            return;
        }
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let line = input.value();
        input.set_value("");
        with_site(|s| s.submit_line(&line));
        refresh(snapshot);
    };

    view! {
        <section class="terminal">
            <div id="terminal-history">
                {move || {
                    snapshot.with(|s| {
                        let last = s.lines.len().saturating_sub(1);
                        s.lines
                            .iter()
                            .enumerate()
                            .map(|(i, (kind, text))| {
                                let cursor = s.typing_cursor && i == last;
                                view! {
                                    <p class=line_class(*kind)>
                                        {text.clone()}
                                        {cursor.then(|| view! { <span class="typing-cursor"></span> })}
                                    </p>
                                }
                            })
                            .collect_view()
                    })
                }}
            </div>
            <div class=move || {
                if snapshot.with(|s| s.input_enabled) {
                    "terminal-input-area"
                } else {
                    "terminal-input-area hidden"
                }
            }>
                <span class="prompt">{PROMPT}</span>
                <input
                    id="cmd-input"
                    type="text"
                    autocomplete="off"
                    spellcheck="false"
                    node_ref=input_ref
                    on:keydown=on_keydown
                />
            </div>
        </section>
    }
}

#[component]
pub(super) fn TiltCard(title: &'static str, body: &'static str) -> impl IntoView {
    let card_ref = NodeRef::<leptos::html::Div>::new();
    let (transform, set_transform) = signal(TILT_RESET.to_string());

    let on_move = move |ev: MouseEvent| {
        let Some(card) = card_ref.get_untracked() else {
            return;
        };
        let rect = card.get_bounding_client_rect();
        set_transform.set(tilt_transform(PointerInCard {
            x: ev.client_x() as f64 - rect.left(),
            y: ev.client_y() as f64 - rect.top(),
            width: rect.width(),
            height: rect.height(),
        }));
    };

    view! {
        <div
            class="card"
            node_ref=card_ref
            style=move || format!("transform: {}", transform.get())
            on:mousemove=on_move
            on:mouseleave=move |_| set_transform.set(TILT_RESET.to_string())
        >
            <h3>{title}</h3>
            <p>{body}</p>
        </div>
    }
}

#[component]
pub(super) fn SnippetBox(snapshot: RwSignal<Snapshot>, snippet: InstallSnippet) -> impl IntoView {
    let label = match snippet {
        InstallSnippet::PowerShell => "PowerShell",
        InstallSnippet::Cmd => "CMD",
    };
    let copy = move |_| {
        spawn_local(async move {
            let msg = copy_snippet(&BrowserClipboard, snippet).await;
            with_site(|s| s.show_toast(&msg));
            refresh(snapshot);
        });
    };

    view! {
        <div class="install-snippet">
            <span class="install-label">{label}</span>
            <code>{snippet.command()}</code>
            <button class="copy-btn" on:click=copy>"[COPY]"</button>
        </div>
    }
}

#[component]
pub(super) fn Toast(snapshot: RwSignal<Snapshot>) -> impl IntoView {
    view! {
        <div
            id="toast"
            class=move || if snapshot.with(|s| s.toast.is_some()) { "show" } else { "" }
        >
            {move || snapshot.with(|s| s.toast.clone().unwrap_or_default())}
        </div>
    }
}
