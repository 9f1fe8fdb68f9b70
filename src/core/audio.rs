//! Procedural sound effects.
//!
//! The two effects are described as plain data (`Voice`s with parameter
//! automation) and handed to an [`AudioBackend`], which owns the real audio
//! graph. Web Audio is the production backend; tests record what they are
//! asked to play.
//!
//! The context and the shared noise buffer are created lazily on first use and
//! reused afterwards. With sound disabled nothing reaches the backend at all.

use thiserror::Error;
use tracing::debug;

use crate::prng::Prng;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio is not supported on this host")]
    Unsupported,
    #[error("audio context could not be created: {0}")]
    Context(String),
    #[error("audio node setup failed: {0}")]
    Node(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sine,
}

/// One automation event on an audio parameter. `at` is seconds relative to the
/// moment the effect is triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    Set { value: f32, at: f64 },
    Linear { value: f32, at: f64 },
    Exponential { value: f32, at: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToneVoice {
    pub waveform: Waveform,
    pub frequency: Vec<Ramp>,
    pub gain: Vec<Ramp>,
    pub start: f64,
    pub stop: f64,
}

/// The shared noise buffer played through a lowpass filter.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseVoice {
    pub lowpass_hz: f32,
    pub gain: Vec<Ramp>,
    pub start: f64,
    pub stop: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Voice {
    Tone(ToneVoice),
    Noise(NoiseVoice),
}

pub const CHIME_FREQS_HZ: [f32; 4] = [523.25, 659.25, 783.99, 987.77];
const CHIME_STAGGER_S: f64 = 0.04;

/// Square blip sweeping 600Hz down to 100Hz over 15ms. The noise layer is only
/// included once the shared buffer exists.
pub fn click_voices(with_noise: bool) -> Vec<Voice> {
    let mut voices = vec![Voice::Tone(ToneVoice {
        waveform: Waveform::Square,
        frequency: vec![
            Ramp::Set { value: 600.0, at: 0.0 },
            Ramp::Exponential { value: 100.0, at: 0.015 },
        ],
        gain: vec![
            Ramp::Set { value: 0.08, at: 0.0 },
            Ramp::Exponential { value: 0.001, at: 0.015 },
        ],
        start: 0.0,
        stop: 0.02,
    })];
    if with_noise {
        voices.push(Voice::Noise(NoiseVoice {
            lowpass_hz: 2500.0,
            gain: vec![
                Ramp::Set { value: 0.12, at: 0.0 },
                Ramp::Exponential { value: 0.001, at: 0.02 },
            ],
            start: 0.0,
            stop: 0.025,
        }));
    }
    voices
}

/// Four staggered sine tones, each with its own attack and long decay.
pub fn chime_voices() -> Vec<Voice> {
    CHIME_FREQS_HZ
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            let delay = i as f64 * CHIME_STAGGER_S;
            Voice::Tone(ToneVoice {
                waveform: Waveform::Sine,
                frequency: vec![Ramp::Set { value: f, at: 0.0 }],
                gain: vec![
                    Ramp::Set { value: 0.0, at: 0.0 },
                    Ramp::Linear { value: 0.15, at: 0.05 },
                    Ramp::Exponential { value: 0.001, at: 1.2 },
                ],
                start: delay,
                stop: delay + 1.3,
            })
        })
        .collect()
}

/// One second of uniform samples in `[-1, 1)`.
pub fn noise_samples(sample_rate: u32, rng: &mut Prng) -> Vec<f32> {
    (0..sample_rate)
        .map(|_| rng.next_f32_01() * 2.0 - 1.0)
        .collect()
}

pub trait AudioBackend {
    /// Create the context. Returns its sample rate.
    fn open(&mut self) -> Result<u32, AudioError>;
    fn is_suspended(&self) -> bool;
    fn resume(&mut self);
    /// Context clock in seconds.
    fn current_time(&self) -> f64;
    fn install_noise(&mut self, samples: &[f32]) -> Result<(), AudioError>;
    /// Build and start the nodes for one voice, offset from `at`.
    fn play(&mut self, at: f64, voice: &Voice) -> Result<(), AudioError>;
}

/// Backend for hosts without audio output.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn open(&mut self) -> Result<u32, AudioError> {
        Err(AudioError::Unsupported)
    }

    fn is_suspended(&self) -> bool {
        false
    }

    fn resume(&mut self) {}

    fn current_time(&self) -> f64 {
        0.0
    }

    fn install_noise(&mut self, _samples: &[f32]) -> Result<(), AudioError> {
        Err(AudioError::Unsupported)
    }

    fn play(&mut self, _at: f64, _voice: &Voice) -> Result<(), AudioError> {
        Err(AudioError::Unsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextState {
    Closed,
    Open { noise: bool },
    Failed,
}

pub struct AudioFeedback {
    enabled: bool,
    backend: Box<dyn AudioBackend>,
    state: ContextState,
}

impl AudioFeedback {
    pub fn new(backend: Box<dyn AudioBackend>, enabled: bool) -> Self {
        Self {
            enabled,
            backend,
            state: ContextState::Closed,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn context_open(&self) -> bool {
        matches!(self.state, ContextState::Open { .. })
    }

    /// Open the context (first call only) and resume it if suspended. Returns
    /// false when audio is unavailable.
    pub fn ensure_context(&mut self, rng: &mut Prng) -> bool {
        match self.state {
            ContextState::Failed => return false,
            ContextState::Open { .. } => {}
            ContextState::Closed => match self.backend.open() {
                Ok(sample_rate) => {
                    let samples = noise_samples(sample_rate, rng);
                    let noise = match self.backend.install_noise(&samples) {
                        Ok(()) => true,
                        Err(e) => {
                            debug!("noise buffer unavailable: {e}");
                            false
                        }
                    };
                    self.state = ContextState::Open { noise };
                }
                Err(e) => {
                    debug!("audio disabled: {e}");
                    self.state = ContextState::Failed;
                    return false;
                }
            },
        }
        if self.backend.is_suspended() {
            self.backend.resume();
        }
        true
    }

    pub fn click(&mut self, rng: &mut Prng) {
        if !self.enabled || !self.ensure_context(rng) {
            return;
        }
        let noise = matches!(self.state, ContextState::Open { noise: true });
        self.play_all(&click_voices(noise));
    }

    pub fn chime(&mut self, rng: &mut Prng) {
        if !self.enabled || !self.ensure_context(rng) {
            return;
        }
        self.play_all(&chime_voices());
    }

    fn play_all(&mut self, voices: &[Voice]) {
        let t = self.backend.current_time();
        for v in voices {
            if let Err(e) = self.backend.play(t, v) {
                debug!("voice dropped: {e}");
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingBackend;
    use super::*;

    #[test]
    fn disabled_sound_never_touches_the_backend() {
        let (backend, log) = RecordingBackend::new();
        let mut audio = AudioFeedback::new(Box::new(backend), false);
        let mut rng = Prng::new(1);
        audio.click(&mut rng);
        audio.chime(&mut rng);

        let log = log.borrow();
        assert_eq!(log.opens, 0);
        assert!(log.played.is_empty());
        assert!(!audio.context_open());
    }

    #[test]
    fn context_and_noise_are_built_once_and_reused() {
        let (backend, log) = RecordingBackend::new();
        let mut audio = AudioFeedback::new(Box::new(backend), true);
        let mut rng = Prng::new(1);
        audio.click(&mut rng);
        audio.click(&mut rng);
        audio.chime(&mut rng);

        let log = log.borrow();
        assert_eq!(log.opens, 1);
        assert_eq!(log.resumes, 1);
        assert_eq!(log.noise_len, Some(8_000));
        // two clicks with noise layer + four chime tones
        assert_eq!(log.played.len(), 2 + 2 + 4);
    }

    #[test]
    fn blocked_context_degrades_to_silence() {
        let (mut backend, log) = RecordingBackend::new();
        backend.fail_open = true;
        let mut audio = AudioFeedback::new(Box::new(backend), true);
        let mut rng = Prng::new(1);
        audio.click(&mut rng);
        audio.chime(&mut rng);
        assert!(log.borrow().played.is_empty());
        assert!(!audio.ensure_context(&mut rng));
    }

    #[test]
    fn chime_tones_are_staggered_and_overlap() {
        let voices = chime_voices();
        assert_eq!(voices.len(), 4);
        for (i, v) in voices.iter().enumerate() {
            let Voice::Tone(t) = v else {
                panic!("chime is tones only");
            };
            assert_eq!(t.waveform, Waveform::Sine);
            assert!((t.start - i as f64 * 0.04).abs() < 1e-9);
            assert!((t.stop - t.start - 1.3).abs() < 1e-9);
            assert_eq!(t.frequency[0], Ramp::Set { value: CHIME_FREQS_HZ[i], at: 0.0 });
        }
    }

    #[test]
    fn click_sweeps_down_within_fifteen_ms() {
        let voices = click_voices(false);
        assert_eq!(voices.len(), 1);
        let Voice::Tone(t) = &voices[0] else {
            panic!("click starts with a tone");
        };
        assert_eq!(t.waveform, Waveform::Square);
        assert_eq!(t.frequency[1], Ramp::Exponential { value: 100.0, at: 0.015 });
    }

    #[test]
    fn noise_is_uniform_in_unit_range() {
        let mut rng = Prng::new(9);
        let s = noise_samples(4_410, &mut rng);
        assert_eq!(s.len(), 4_410);
        assert!(s.iter().all(|x| (-1.0..1.0).contains(x)));
    }
}
