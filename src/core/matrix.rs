//! "Matrix rain" background animation.
//!
//! One drop per glyph-wide column. Each tick paints a translucent veil over the
//! whole canvas (the fading trail), then one random glyph per column at the
//! drop's row, and advances every drop. A drop that has fallen past the bottom
//! restarts at the top with a small probability per tick, which staggers the
//! columns.

use crate::prefs::Theme;
use crate::prng::Prng;

const KATAKANA: &str = "アァカサタナハマヤャラワガザダバパイィキシチニヒミリヰギジヂビピウゥクスツヌフムユュルグズブヅプエェケセテネヘメレヱゲゼデベペオォコソトノホモヨョロヲゴゾドボポヴッン";
const LATIN: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const NUMS: &str = "0123456789";

/// Probability threshold for restarting a drop that left the canvas.
const RESET_ABOVE: f64 = 0.975;

/// Minimal 2D drawing surface, shaped after the Canvas2D calls the animation
/// needs.
pub trait Renderer {
    fn set_fill_style(&mut self, style: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_font(&mut self, font: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixSpeed {
    #[default]
    Normal,
    Fast,
}

impl MatrixSpeed {
    pub fn toggle(self) -> Self {
        match self {
            MatrixSpeed::Normal => MatrixSpeed::Fast,
            MatrixSpeed::Fast => MatrixSpeed::Normal,
        }
    }
}

/// Colors for one frame, derived from the active visual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub veil: &'static str,
    pub glyph: &'static str,
}

impl Palette {
    pub fn for_mode(theme: Theme, god_mode: bool) -> Self {
        let veil = match theme {
            Theme::Paper => "rgba(240, 240, 240, 0.1)",
            Theme::Dark => "rgba(12, 12, 12, 0.05)",
        };
        let glyph = if god_mode {
            "#ff0000"
        } else if theme == Theme::Paper {
            "#000"
        } else {
            "#0F0"
        };
        Self { veil, glyph }
    }
}

pub fn alphabet() -> Vec<char> {
    KATAKANA.chars().chain(LATIN.chars()).chain(NUMS.chars()).collect()
}

#[derive(Debug, Clone)]
pub struct MatrixRain {
    glyph_size: u32,
    width: u32,
    height: u32,
    drops: Vec<u32>,
    alphabet: Vec<char>,
    font: String,
}

impl MatrixRain {
    pub fn new(width: u32, height: u32, glyph_size: u32) -> Self {
        let glyph_size = glyph_size.max(1);
        let columns = (width / glyph_size) as usize;
        Self {
            glyph_size,
            width,
            height,
            drops: vec![1; columns],
            alphabet: alphabet(),
            font: format!("{glyph_size}px monospace"),
        }
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Track new canvas dimensions. The column set is left as it was.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn tick(&mut self, r: &mut dyn Renderer, rng: &mut Prng, palette: Palette) {
        let size = self.glyph_size as f64;

        r.set_fill_style(palette.veil);
        r.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);

        r.set_fill_style(palette.glyph);
        r.set_font(&self.font);

        let mut buf = [0u8; 4];
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.alphabet[rng.gen_range_usize(0, self.alphabet.len())];
            r.fill_text(
                glyph.encode_utf8(&mut buf),
                i as f64 * size,
                *drop as f64 * size,
            );

            if u64::from(*drop) * u64::from(self.glyph_size) > u64::from(self.height)
                && rng.above(RESET_ABOVE)
            {
                *drop = 0;
            }
            *drop += 1;
        }
    }
}
