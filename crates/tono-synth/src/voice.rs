//! A single synthesis chain: `filter(osc(n) * env(n) * mod(n))` (§4.7).
//!
//! A voice owns its generator, envelope, modulator and filter state
//! exclusively — nothing here is shared with any other voice. The `Synth`
//! allocates voices from a fixed pool; a voice returns to that pool once its
//! envelope reaches `Idle`.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::rc::Rc;

use tono_core::{Biquad, highpass_coefficients, lowpass_coefficients};

use crate::config::{FilterConfig, FilterKind};
use crate::envelope::{Envelope, EnvelopeParams, EnvelopeState};
use crate::generator::{Generator, GeneratorKind, OscillatorKind};
use crate::modulator::{Modulator, ModulatorParams};
use crate::oscillator::SineTable;

/// Upper bound on a processing block, matching §6's `block_size: 1..=256`.
/// Lets [`Voice::produce`] use fixed-size stack buffers instead of
/// allocating on the audio path.
pub const MAX_BLOCK_SIZE: usize = 256;

/// Converts a resonance specified in dB to the biquad `Q` the RBJ cookbook
/// formulas expect. `Q = 10^(resonance_dB / 20)`; `-3 dB` reproduces the
/// Butterworth `Q = 1/sqrt(2)` response, matching the property that a
/// `resonance_dB` of `-3` should read as "no peaking" at the cutoff.
fn resonance_db_to_q(resonance_db: f32) -> f32 {
    libm::powf(10.0, resonance_db / 20.0).max(0.1)
}

fn build_filter(config: FilterConfig, sample_rate: f32) -> Option<Biquad> {
    match config.kind {
        FilterKind::None => None,
        FilterKind::Lowpass => {
            let q = resonance_db_to_q(config.resonance_db);
            let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(config.cutoff_hz, q, sample_rate);
            let mut filter = Biquad::new();
            filter.set_coefficients(b0, b1, b2, a0, a1, a2);
            Some(filter)
        }
        FilterKind::Highpass => {
            let q = resonance_db_to_q(config.resonance_db);
            let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(config.cutoff_hz, q, sample_rate);
            let mut filter = Biquad::new();
            filter.set_coefficients(b0, b1, b2, a0, a1, a2);
            Some(filter)
        }
    }
}

/// One polyphonic voice: generator x envelope x modulator, through an
/// optional filter.
#[derive(Debug, Clone)]
pub struct Voice {
    generator: Generator,
    envelope: Envelope,
    modulator: Modulator,
    filter: Option<Biquad>,
    filter_config: FilterConfig,
    sample_rate: f32,

    /// MIDI note this voice is currently sounding, if any.
    note: Option<u8>,
    /// Whether this voice has been pressed and not yet returned to Idle.
    active: bool,
    /// Absolute sample index (stream-wide) of this voice's most recent Press.
    pressed_at: u64,
    /// Absolute sample index of this voice's most recent Release, if any.
    released_at: Option<u64>,
}

impl Voice {
    /// Builds an idle voice from shared construction parameters.
    #[must_use]
    pub fn new(
        generator_kind: GeneratorKind,
        oscillator_kind: OscillatorKind,
        sine_table: &Rc<SineTable>,
        envelope_params: EnvelopeParams,
        modulator_params: ModulatorParams,
        filter_config: FilterConfig,
        sample_rate: f32,
    ) -> Self {
        Self {
            generator: Generator::new(generator_kind, oscillator_kind, sine_table),
            envelope: Envelope::new(envelope_params),
            modulator: Modulator::new(modulator_params, sample_rate),
            filter: build_filter(filter_config, sample_rate),
            filter_config,
            sample_rate,
            note: None,
            active: false,
            pressed_at: 0,
            released_at: None,
        }
    }

    /// Whether the voice is free for allocation (envelope idle, not mid-note).
    #[must_use]
    pub fn is_free(&self) -> bool {
        !self.active
    }

    /// Note currently sounding, if any.
    #[must_use]
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Absolute sample index of the voice's most recent Press.
    #[must_use]
    pub fn pressed_at(&self) -> u64 {
        self.pressed_at
    }

    /// Absolute sample index of the voice's most recent Release, if any.
    #[must_use]
    pub fn released_at(&self) -> Option<u64> {
        self.released_at
    }

    /// Starts (or retriggers) this voice on `note` at frequency `freq`
    /// (normalized), recording `sample_index` as the stream-absolute time
    /// of the press.
    pub fn press(&mut self, note: u8, freq: f32, sample_index: u64) {
        if self.note != Some(note) {
            self.generator.set_frequency(freq);
        }
        self.note = Some(note);
        self.active = true;
        self.pressed_at = sample_index;
        self.released_at = None;
        self.envelope.press();
    }

    /// Releases the voice, recording `sample_index` as the stream-absolute
    /// time of the release.
    pub fn release(&mut self, sample_index: u64) {
        self.released_at = Some(sample_index);
        self.envelope.release();
    }

    /// Replaces the filter configuration, rebuilding its coefficients.
    pub fn set_filter_config(&mut self, filter_config: FilterConfig) {
        self.filter_config = filter_config;
        self.filter = build_filter(filter_config, self.sample_rate);
    }

    /// Current filter configuration.
    #[must_use]
    pub fn filter_config(&self) -> FilterConfig {
        self.filter_config
    }

    /// Fills `out` with this voice's signal, advancing all internal state
    /// by `out.len()` samples. Marks the voice free once its envelope
    /// reaches `Idle`.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `out.len()` exceeds [`MAX_BLOCK_SIZE`].
    pub fn produce(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);
        let n = out.len();

        let mut gen_buf = [0.0f32; MAX_BLOCK_SIZE];
        let mut env_buf = [0.0f32; MAX_BLOCK_SIZE];
        let mut mod_buf = [0.0f32; MAX_BLOCK_SIZE];

        self.generator.produce(&mut gen_buf[..n]);
        self.envelope.produce(&mut env_buf[..n]);
        self.modulator.produce(&mut mod_buf[..n]);

        for i in 0..n {
            let mut sample = gen_buf[i] * env_buf[i] * mod_buf[i];
            if let Some(filter) = &mut self.filter {
                sample = filter.process(sample);
            }
            out[i] = sample;
        }

        if self.envelope.state() == EnvelopeState::Idle {
            self.active = false;
            self.note = None;
        }
    }
}
