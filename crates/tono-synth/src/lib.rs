//! Tono Synth — polyphonic synthesis engine built on `tono-core`.
//!
//! Converts a stream of keyed press/release events into a monaural audio
//! sample stream. The three load-bearing subsystems are band-limited
//! waveform generation ([`blit`], [`oscillator`]), a sample-accurate dB-domain
//! ADSR ([`envelope`]), and per-voice composition through a biquad filter
//! ([`voice`]); [`synth`] ties them together into a fixed-size polyphonic
//! voice pool.
//!
//! # Quick start
//!
//! ```rust
//! use tono_synth::{GeneratorKind, NoteEvent, Synth, SynthConfig};
//!
//! let config = SynthConfig { sample_rate: 48000.0, generator_kind: GeneratorKind::Sawtooth, ..SynthConfig::default() };
//! let mut synth = Synth::new(config).expect("valid config");
//!
//! let mut block = [0.0f32; 64];
//! synth.process(&mut block, &[NoteEvent::new(0, 60)], &[]).expect("valid events");
//! ```
//!
//! # Modules
//!
//! - [`freq_table`] — MIDI-note to normalized-frequency lookup.
//! - [`oscillator`] — quadrature (cos/sin) sinusoid, recurrence and
//!   lookup-table forms.
//! - [`blit`] — unipolar/bipolar band-limited impulse trains and their
//!   leaky-integrated sawtooth/square/triangle derivatives.
//! - [`generator`] — the `generator_kind` selector composing the above.
//! - [`envelope`] — dB-domain ADSR with retrigger semantics.
//! - [`modulator`] — unipolar amplitude modulator.
//! - [`voice`] — one synthesis chain: generator x envelope x modulator,
//!   through an optional filter.
//! - [`synth`] — polyphonic voice pool, allocation policy, event dispatch.
//! - [`config`] — construction-time parameter surface and validation.
//! - [`error`] — `ConfigurationError` / `EventError`.
//!
//! # no_std support
//!
//! `no_std` compatible (disable the default `std` feature); `alloc` is
//! still required for the voice pool and the shared sine lookup table.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod blit;
pub mod config;
pub mod envelope;
pub mod error;
pub mod freq_table;
pub mod generator;
pub mod modulator;
pub mod oscillator;
pub mod synth;
pub mod voice;

pub use blit::{BpBlit, Blit, Sawtooth, Square, Triangle, bipolar_harmonic_count, unipolar_harmonic_count};
pub use config::{EnvelopeConfig, FilterConfig, FilterKind, ModulatorConfig, SynthConfig};
pub use envelope::{Envelope, EnvelopeParams, EnvelopeState};
pub use error::{ConfigurationError, EventError};
pub use freq_table::{FrequencyTable, MIDI_NOTE_COUNT, midi_to_hz, midi_to_normalized_frequency};
pub use generator::{Generator, GeneratorKind, OscillatorKind};
pub use modulator::{Modulator, ModulatorParams};
pub use oscillator::{LookupOscillator, QuadratureOscillator, QuadratureSource, RecurrenceOscillator, RenormKind, SineTable};
pub use synth::{NoteEvent, Synth};
pub use voice::Voice;
