use focusd_site::audio::{AudioBackend, AudioError, NoiseVoice, Ramp, ToneVoice, Voice, Waveform};
use web_sys::{
    AudioBuffer, AudioContext, AudioContextState, AudioParam, BiquadFilterType, OscillatorType,
};

use super::js_err;

/// Web Audio graph builder. The context is only created from a user gesture.
#[derive(Default)]
pub(super) struct WebAudio {
    ctx: Option<AudioContext>,
    noise: Option<AudioBuffer>,
}

impl WebAudio {
    fn ctx(&self) -> Result<&AudioContext, AudioError> {
        self.ctx.as_ref().ok_or(AudioError::Unsupported)
    }

    fn tone(&self, at: f64, v: &ToneVoice) -> Result<(), AudioError> {
        let ctx = self.ctx()?;
        let node = |e| AudioError::Node(js_err(&e));

        let osc = ctx.create_oscillator().map_err(node)?;
        osc.set_type(match v.waveform {
            Waveform::Square => OscillatorType::Square,
            Waveform::Sine => OscillatorType::Sine,
        });
        let gain = ctx.create_gain().map_err(node)?;
        automate(&osc.frequency(), at, &v.frequency)?;
        automate(&gain.gain(), at, &v.gain)?;

        osc.connect_with_audio_node(&gain).map_err(node)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(node)?;
        osc.start_with_when(at + v.start).map_err(node)?;
        osc.stop_with_when(at + v.stop).map_err(node)?;
        Ok(())
    }

    fn noise(&self, at: f64, v: &NoiseVoice) -> Result<(), AudioError> {
        let ctx = self.ctx()?;
        let Some(buffer) = self.noise.as_ref() else {
            return Ok(());
        };
        let node = |e| AudioError::Node(js_err(&e));

        let src = ctx.create_buffer_source().map_err(node)?;
        src.set_buffer(Some(buffer));
        let filter = ctx.create_biquad_filter().map_err(node)?;
        filter.set_type(BiquadFilterType::Lowpass);
        filter.frequency().set_value(v.lowpass_hz);
        let gain = ctx.create_gain().map_err(node)?;
        automate(&gain.gain(), at, &v.gain)?;

        src.connect_with_audio_node(&filter).map_err(node)?;
        filter.connect_with_audio_node(&gain).map_err(node)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(node)?;
        src.start_with_when(at + v.start).map_err(node)?;
        src.stop_with_when(at + v.stop).map_err(node)?;
        Ok(())
    }
}

fn automate(param: &AudioParam, at: f64, ramps: &[Ramp]) -> Result<(), AudioError> {
    for r in ramps {
        let res = match *r {
            Ramp::Set { value, at: t } => param.set_value_at_time(value, at + t),
            Ramp::Linear { value, at: t } => param.linear_ramp_to_value_at_time(value, at + t),
            Ramp::Exponential { value, at: t } => {
                param.exponential_ramp_to_value_at_time(value, at + t)
            }
        };
        res.map_err(|e| AudioError::Node(js_err(&e)))?;
    }
    Ok(())
}

impl AudioBackend for WebAudio {
    fn open(&mut self) -> Result<u32, AudioError> {
        let ctx = AudioContext::new().map_err(|e| AudioError::Context(js_err(&e)))?;
        let rate = ctx.sample_rate() as u32;
        self.ctx = Some(ctx);
        Ok(rate)
    }

    fn is_suspended(&self) -> bool {
        self.ctx
            .as_ref()
            .is_some_and(|c| c.state() == AudioContextState::Suspended)
    }

    fn resume(&mut self) {
        if let Some(ctx) = self.ctx.as_ref() {
            let _ = ctx.resume();
        }
    }

    fn current_time(&self) -> f64 {
        self.ctx.as_ref().map_or(0.0, |c| c.current_time())
    }

    fn install_noise(&mut self, samples: &[f32]) -> Result<(), AudioError> {
        let ctx = self.ctx()?;
        let buffer = ctx
            .create_buffer(1, samples.len() as u32, ctx.sample_rate())
            .map_err(|e| AudioError::Node(js_err(&e)))?;
        buffer
            .copy_to_channel(samples, 0)
            .map_err(|e| AudioError::Node(js_err(&e)))?;
        self.noise = Some(buffer);
        Ok(())
    }

    fn play(&mut self, at: f64, voice: &Voice) -> Result<(), AudioError> {
        match voice {
            Voice::Tone(v) => self.tone(at, v),
            Voice::Noise(v) => self.noise(at, v),
        }
    }
}
