//! MIDI-note to normalized-frequency lookup.
//!
//! The table is built once at construction from a sample rate and is
//! immutable afterward, so it can be shared read-only across every voice in
//! a [`crate::synth::Synth`].

use libm::powf;

/// Number of MIDI notes covered by [`FrequencyTable`].
pub const MIDI_NOTE_COUNT: usize = 128;

/// Reference tuning: MIDI note 69 (A4) in Hz.
pub const A4_HZ: f32 = 440.0;

/// MIDI note 69 is A4.
pub const A4_NOTE: u8 = 69;

/// Converts a MIDI note number to its frequency in Hz under equal
/// temperament, A4 = 440 Hz.
#[inline]
#[must_use]
pub fn midi_to_hz(note: u8) -> f32 {
    A4_HZ * powf(2.0, (f32::from(note) - f32::from(A4_NOTE)) / 12.0)
}

/// Converts a MIDI note number directly to a normalized frequency (cycles
/// per sample) at the given sample rate.
#[inline]
#[must_use]
pub fn midi_to_normalized_frequency(note: u8, sample_rate: f32) -> f32 {
    midi_to_hz(note) / sample_rate
}

/// Precomputed table of 128 normalized frequencies, one per MIDI note.
///
/// Built once from `sample_rate` at construction time; entries never change
/// afterward. Accurate to within 0.5 cents of the ideal equal-tempered
/// frequency after single-precision computation.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    sample_rate: f32,
    entries: [f32; MIDI_NOTE_COUNT],
}

impl FrequencyTable {
    /// Builds the table for `sample_rate`.
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let mut entries = [0.0; MIDI_NOTE_COUNT];
        for (note, entry) in entries.iter_mut().enumerate() {
            *entry = midi_to_normalized_frequency(note as u8, sample_rate);
        }
        Self { sample_rate, entries }
    }

    /// Sample rate this table was built for.
    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Normalized frequency for `note` (cycles per sample).
    ///
    /// # Panics
    ///
    /// Panics if `note` is not a valid MIDI note. Callers on the construction
    /// path validate this ahead of time; callers on the event path go
    /// through [`crate::error::EventError`] instead.
    #[inline]
    #[must_use]
    pub fn get(&self, note: u8) -> f32 {
        self.entries[note as usize]
    }

    /// Returns the full 128-entry table, for testing and inspection.
    #[must_use]
    pub fn as_slice(&self) -> &[f32; MIDI_NOTE_COUNT] {
        &self.entries
    }
}
