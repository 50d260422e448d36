//! Construction- and event-time error types.
//!
//! The audio path itself is infallible (§7): everything here is raised
//! either once, at `Synth::new`, or per incoming event batch, never inside
//! the per-sample inner loops.

#[cfg(feature = "std")]
use thiserror::Error;

/// A construction parameter failed validation.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigurationError {
    /// `sample_rate` was not a positive, finite value.
    #[cfg_attr(feature = "std", error("sample_rate must be positive and finite, got {0}"))]
    InvalidSampleRate(f32),

    /// `block_size` was 0 or exceeded the implementation's maximum (256).
    #[cfg_attr(feature = "std", error("block_size must be in 1..=256, got {0}"))]
    InvalidBlockSize(usize),

    /// `max_polyphony` was 0.
    #[cfg_attr(feature = "std", error("max_polyphony must be at least 1, got {0}"))]
    InvalidPolyphony(usize),

    /// An envelope time (attack/decay/release) was negative.
    #[cfg_attr(feature = "std", error("envelope time must be >= 0, got {0}"))]
    InvalidEnvelopeTime(f32),

    /// `sustain_dB` fell outside `[-100, 0]`.
    #[cfg_attr(feature = "std", error("sustain_dB must be in [-100, 0], got {0}"))]
    InvalidSustainDb(f32),

    /// Modulator `depth` fell outside `[0, 1]`.
    #[cfg_attr(feature = "std", error("modulator depth must be in [0, 1], got {0}"))]
    InvalidModulatorDepth(f32),

    /// Modulator `freq_hz` was negative.
    #[cfg_attr(feature = "std", error("modulator freq_hz must be >= 0, got {0}"))]
    InvalidModulatorFreq(f32),

    /// Filter `cutoff_hz` fell outside `(0, sample_rate/2)`.
    #[cfg_attr(feature = "std", error("filter cutoff_hz must be in (0, fs/2), got {0}"))]
    InvalidFilterCutoff(f32),
}

/// An incoming press/release event list was malformed.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventError {
    /// A note number fell outside `0..=127`.
    #[cfg_attr(feature = "std", error("note {0} is outside 0..=127"))]
    InvalidNote(u8),

    /// `sample_index` fell outside the current block (`0..block_len`).
    #[cfg_attr(feature = "std", error("sample_index {sample_index} is outside the current block of length {block_len}"))]
    SampleIndexOutOfRange {
        /// The offending sample index.
        sample_index: u32,
        /// Length of the block being processed.
        block_len: usize,
    },

    /// A list's `sample_index` values were not monotonically
    /// non-decreasing.
    #[cfg_attr(feature = "std", error("event list is not sorted by sample_index"))]
    UnsortedEvents,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for EventError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}
