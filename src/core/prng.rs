// Small deterministic PRNG for cosmetic randomness (glyph picks, typing jitter,
// noise samples). Not cryptographically secure.
//
// Tests seed it explicitly so animation frames and boot timings replay exactly.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f32_01(&mut self) -> f32 {
        unit_f32(self.next_u32())
    }

    #[inline]
    pub fn gen_range_u32(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        low + self.next_u32() % (high - low)
    }

    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u32;
        let v = self.next_u32() % span;
        low + v as usize
    }

    /// True when a fresh `[0, 1)` sample is strictly above `threshold`.
    #[inline]
    pub fn above(&mut self, threshold: f64) -> bool {
        self.next_f64_01() > threshold
    }
}

/// Top 24 bits only, so the result is exact and stays below 1.0.
#[inline]
fn unit_f32(x: u32) -> f32 {
    (x >> 8) as f32 / (1u32 << 24) as f32
}
