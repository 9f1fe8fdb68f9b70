//! The landing-page shell in a terminal.
//!
//! Examples:
//!   focusd-shell
//!   focusd-shell --no-boot
//!   focusd-shell --config site.json
//!
//! Preferences (theme, sfx) persist to `<data dir>/focusd_site/prefs.json`.
//! There is no audio or canvas here: sound degrades to silence and the matrix
//! is not drawn. The release badge is not fetched.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use focusd_site::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_MS: u64 = 10;

fn usage() -> ! {
    eprintln!("focusd-shell: the focusd landing-page shell in your terminal\n");
    eprintln!("Usage: focusd-shell [--config <file.json>] [--no-boot]\n");
    eprintln!("Options:");
    eprintln!("  --config <file>   SiteConfig JSON (missing fields use defaults)");
    eprintln!("  --no-boot         Skip the boot animation");
    eprintln!("\nType 'help' at the prompt for commands, Ctrl-D to quit.");
    process::exit(1);
}

struct Args {
    config: Option<PathBuf>,
    boot: bool,
}

fn parse_args() -> Args {
    let mut args = std::env::args().skip(1);
    let mut out = Args {
        config: None,
        boot: true,
    };
    while let Some(a) = args.next() {
        match a.as_str() {
            "--config" => match args.next() {
                Some(p) => out.config = Some(PathBuf::from(p)),
                None => usage(),
            },
            "--no-boot" => out.boot = false,
            _ => usage(),
        }
    }
    out
}

fn load_config(path: Option<&PathBuf>) -> Result<SiteConfig, String> {
    let Some(path) = path else {
        return Ok(SiteConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    SiteConfig::from_json(&raw).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Preferences stored as a flat JSON object on disk.
struct JsonFileStore {
    path: Option<PathBuf>,
    items: BTreeMap<String, String>,
}

impl JsonFileStore {
    fn open() -> Self {
        let path = dirs::data_dir().map(|d| d.join("focusd_site").join("prefs.json"));
        let items = path
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, items }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        let path = self.path.as_ref().ok_or(StoreError::Unavailable)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::Write(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(&self.items)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        fs::write(path, raw).map_err(|e| StoreError::Write(e.to_string()))
    }
}

/// The terminal has no canvas.
struct NoCanvas;

impl Renderer for NoCanvas {
    fn set_fill_style(&mut self, _style: &str) {}
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}
    fn set_font(&mut self, _font: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64) {}
}

/// Prints the boot transcript as it grows, including the line being typed.
#[derive(Default)]
struct Printer {
    lines: usize,
    last_len: usize,
}

impl Printer {
    fn flush(&mut self, site: &Site, out: &mut impl Write) -> io::Result<()> {
        let lines = site.history().lines();
        for (i, line) in lines.iter().enumerate().skip(self.lines.saturating_sub(1)) {
            let from = if i + 1 == self.lines { self.last_len } else { 0 };
            if i + 1 != self.lines && i > 0 {
                writeln!(out)?;
            }
            let text = line.text.get(from..).unwrap_or("");
            match line.kind {
                LineKind::Success => write!(out, "\x1B[32m{text}\x1B[0m")?,
                _ => write!(out, "{text}")?,
            }
        }
        self.lines = lines.len();
        self.last_len = lines.last().map_or(0, |l| l.text.len());
        out.flush()
    }
}

fn pump_for(site: &mut Site, canvas: &mut NoCanvas, ms: u64) -> Vec<Effect> {
    let start = Instant::now();
    let mut effects = Vec::new();
    let mut elapsed_ms = 0;
    while elapsed_ms < ms {
        thread::sleep(Duration::from_millis(FRAME_MS));
        let now_ms = start.elapsed().as_millis() as u64;
        effects.extend(site.pump(now_ms.min(ms) - elapsed_ms, canvas));
        elapsed_ms = now_ms.min(ms);
    }
    effects
}

/// The terminal already shows the echo; print what came after it.
fn print_reply(site: &Site, out: &mut impl Write) -> io::Result<()> {
    let lines = site.history().lines();
    let start = lines
        .iter()
        .rposition(|l| l.kind == LineKind::Echo)
        .map_or(0, |i| i + 1);
    for line in &lines[start..] {
        writeln!(out, "{}", line.text)?;
    }
    Ok(())
}

fn report(effects: &[Effect], out: &mut impl Write) -> io::Result<()> {
    for e in effects {
        if let Effect::OpenUrl(url) = e {
            writeln!(out, "(open) {url}")?;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    let config = load_config(args.config.as_ref())?;
    let download_delay_ms = config.download_delay_ms;
    let mut site = Site::new(
        config,
        Box::new(JsonFileStore::open()),
        Box::new(SilentBackend),
    );
    let mut canvas = NoCanvas;
    let mut printer = Printer::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let io_err = |e: io::Error| format!("stdout: {e}");

    info!(theme = ?site.theme(), sound = site.sound_enabled(), "session start");

    if args.boot {
        site.start_system(0, 0);
        while site.booting() {
            thread::sleep(Duration::from_millis(FRAME_MS));
            site.advance(FRAME_MS, &mut canvas);
            printer.flush(&site, &mut out).map_err(io_err)?;
        }
    } else {
        site.start_reduced_motion();
    }
    writeln!(out).map_err(io_err)?;

    let stdin = io::stdin();
    loop {
        write!(out, "{}", focusd_site::commands::PROMPT).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("stdin: {e}");
                break;
            }
        }

        match site.submit_line(&line) {
            Dispatch::Ignored => continue,
            Dispatch::Cleared => write!(out, "\x1B[2J\x1B[H").map_err(io_err)?,
            dispatch => {
                print_reply(&site, &mut out).map_err(io_err)?;
                if dispatch == Dispatch::Redirect {
                    let effects = pump_for(&mut site, &mut canvas, download_delay_ms);
                    report(&effects, &mut out).map_err(io_err)?;
                }
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(parse_args()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
