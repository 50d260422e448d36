//! Fixed-capacity circular delay buffer.
//!
//! The buffer is sized once at construction and never reallocates; reads use
//! a per-sample variable offset that may be fractional (linear-interpolated)
//! or truncated to the nearest sample.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolation method for fractional read offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Truncate to the nearest whole sample.
    None,
    /// Linear interpolation between the two surrounding samples.
    #[default]
    Linear,
}

/// Fixed-capacity circular delay buffer.
///
/// Capacity is fixed at construction from `max_delay_samples`; no further
/// allocation occurs. `read_offset` must satisfy `0 <= read_offset <
/// capacity` — offsets are clamped to `capacity - 1` rather than panicking,
/// since this type sits on the audio path and must stay infallible.
///
/// # Example
///
/// ```rust
/// use tono_core::DelayLine;
///
/// let mut delay = DelayLine::new(64);
/// delay.write(1.0);
/// for _ in 0..9 {
///     delay.write(0.0);
/// }
/// assert_eq!(delay.read(9.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl DelayLine {
    /// Creates a delay line with the given capacity, in samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "delay line capacity must be > 0");
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Creates a delay line sized from a sample rate and a maximum delay
    /// time in seconds.
    #[must_use]
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        let capacity = (sample_rate * max_seconds) as usize + 1;
        Self::new(capacity)
    }

    /// Sets the interpolation method used by [`DelayLine::read`].
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Returns the buffer capacity, in samples.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Reads a delayed sample `read_offset` samples behind the most
    /// recently written one. `read_offset` may be fractional; it is clamped
    /// to `[0, capacity - 1]`.
    #[inline]
    #[must_use]
    pub fn read(&self, read_offset: f32) -> f32 {
        let capacity = self.buffer.len();
        let clamped = read_offset.max(0.0).min((capacity - 1) as f32);
        let offset_int = clamped as usize;
        let frac = clamped - offset_int as f32;

        let last_written = if self.write_pos == 0 {
            capacity - 1
        } else {
            self.write_pos - 1
        };
        let read_pos = if last_written >= offset_int {
            last_written - offset_int
        } else {
            capacity + last_written - offset_int
        };

        match self.interpolation {
            Interpolation::None => self.buffer[read_pos],
            Interpolation::Linear => {
                let next_pos = if read_pos == 0 { capacity - 1 } else { read_pos - 1 };
                let a = self.buffer[read_pos];
                let b = self.buffer[next_pos];
                a + (b - a) * frac
            }
        }
    }

    /// Writes a sample and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Reads then writes in one call, as is typical inside a processing loop.
    #[inline]
    pub fn read_write(&mut self, sample: f32, read_offset: f32) -> f32 {
        let output = self.read(read_offset);
        self.write(sample);
        output
    }

    /// Clears the buffer and resets the write position to the start.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
