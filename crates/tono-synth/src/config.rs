//! Construction-time configuration surface.
//!
//! `SynthConfig` gathers every construction parameter enumerated in §6 into
//! one struct, validated once by [`SynthConfig::validate`] before
//! [`crate::synth::Synth::new`] builds the voice pool. Nothing here is
//! read again on the audio path; it is write-once, read-many at
//! construction.

use crate::envelope::EnvelopeParams;
use crate::error::ConfigurationError;
use crate::generator::{GeneratorKind, OscillatorKind};
use crate::modulator::ModulatorParams;

/// Filter topology selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// No filtering; the voice's raw signal passes through.
    #[default]
    None,
    /// RBJ-cookbook lowpass biquad.
    Lowpass,
    /// RBJ-cookbook highpass biquad.
    Highpass,
}

/// Per-voice filter configuration.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Topology.
    pub kind: FilterKind,
    /// Cutoff frequency, Hz. Ignored when `kind` is `None`.
    pub cutoff_hz: f32,
    /// Resonance, dB. Mapped to the biquad `Q` as `Q = 10^(resonance_dB/20)`
    /// — `resonance_dB = -3` reproduces the classic Butterworth
    /// `Q = 1/sqrt(2)` response.
    pub resonance_db: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { kind: FilterKind::None, cutoff_hz: 1000.0, resonance_db: -3.0 }
    }
}

/// Envelope configuration, in seconds/dB (resolved to samples at
/// construction).
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeConfig {
    /// Attack time, seconds.
    pub attack_s: f32,
    /// Decay time, seconds.
    pub decay_s: f32,
    /// Sustain level, dB, `[-100, 0]`.
    pub sustain_db: f32,
    /// Release time, seconds.
    pub release_s: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self { attack_s: 0.01, decay_s: 0.05, sustain_db: -6.0, release_s: 0.2 }
    }
}

/// Modulator configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModulatorConfig {
    /// Depth, `[0, 1]`.
    pub depth: f32,
    /// Frequency, Hz, `>= 0`.
    pub freq_hz: f32,
}

/// Full construction parameter set for a [`crate::synth::Synth`].
#[derive(Debug, Clone, Copy)]
pub struct SynthConfig {
    /// Sample rate, Hz.
    pub sample_rate: f32,
    /// Size of the internal micro-block used for event-dispatch and
    /// renormalization granularity, `1..=256`.
    pub block_size: usize,
    /// Number of voices in the pool.
    pub max_polyphony: usize,
    /// Waveform each voice generates.
    pub generator_kind: GeneratorKind,
    /// Which quadrature oscillator backs `GeneratorKind::Sine`.
    pub oscillator_kind: OscillatorKind,
    /// Envelope shape shared by every voice.
    pub envelope: EnvelopeConfig,
    /// Amplitude modulator shared by every voice.
    pub modulator: ModulatorConfig,
    /// Output filter shared by every voice.
    pub filter: FilterConfig,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 16,
            max_polyphony: 8,
            generator_kind: GeneratorKind::default(),
            oscillator_kind: OscillatorKind::default(),
            envelope: EnvelopeConfig::default(),
            modulator: ModulatorConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl SynthConfig {
    /// Validates every field, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.sample_rate > 0.0) || !self.sample_rate.is_finite() {
            return Err(ConfigurationError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_size == 0 || self.block_size > 256 {
            return Err(ConfigurationError::InvalidBlockSize(self.block_size));
        }
        if self.max_polyphony == 0 {
            return Err(ConfigurationError::InvalidPolyphony(self.max_polyphony));
        }
        for t in [self.envelope.attack_s, self.envelope.decay_s, self.envelope.release_s] {
            if t < 0.0 {
                return Err(ConfigurationError::InvalidEnvelopeTime(t));
            }
        }
        if !(-100.0..=0.0).contains(&self.envelope.sustain_db) {
            return Err(ConfigurationError::InvalidSustainDb(self.envelope.sustain_db));
        }
        if !(0.0..=1.0).contains(&self.modulator.depth) {
            return Err(ConfigurationError::InvalidModulatorDepth(self.modulator.depth));
        }
        if self.modulator.freq_hz < 0.0 {
            return Err(ConfigurationError::InvalidModulatorFreq(self.modulator.freq_hz));
        }
        if self.filter.kind != FilterKind::None {
            let nyquist = self.sample_rate / 2.0;
            if !(self.filter.cutoff_hz > 0.0 && self.filter.cutoff_hz < nyquist) {
                return Err(ConfigurationError::InvalidFilterCutoff(self.filter.cutoff_hz));
            }
        }
        Ok(())
    }

    /// Resolves [`EnvelopeConfig`] to sample-domain [`EnvelopeParams`].
    #[must_use]
    pub fn envelope_params(&self) -> EnvelopeParams {
        EnvelopeParams::from_seconds(
            self.envelope.attack_s,
            self.envelope.decay_s,
            self.envelope.sustain_db,
            self.envelope.release_s,
            self.sample_rate,
        )
    }

    /// Resolves [`ModulatorConfig`] to [`ModulatorParams`].
    #[must_use]
    pub fn modulator_params(&self) -> ModulatorParams {
        ModulatorParams { depth: self.modulator.depth, freq_hz: self.modulator.freq_hz }
    }
}
