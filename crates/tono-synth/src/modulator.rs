//! Amplitude modulator: a unipolar scaling signal layered onto a voice's
//! output, reusing the oscillator abstraction for its carrier.

use tono_core::BlockProducer;

use crate::oscillator::{QuadratureOscillator, QuadratureSource, RenormKind};

/// Modulator parameters.
#[derive(Debug, Clone, Copy)]
pub struct ModulatorParams {
    /// Modulation depth, `[0, 1]`. `0` is unity (no modulation).
    pub depth: f32,
    /// Modulation frequency, Hz. `0` collapses to unity regardless of depth.
    pub freq_hz: f32,
}

impl Default for ModulatorParams {
    fn default() -> Self {
        Self { depth: 0.0, freq_hz: 0.0 }
    }
}

/// Produces `m[n] = (1 - depth) + depth * cos(2*pi*f_mod*n/fs)`.
#[derive(Debug, Clone)]
pub struct Modulator {
    depth: f32,
    osc: QuadratureOscillator,
}

impl Modulator {
    /// Creates a modulator at the given sample rate from `params`.
    #[must_use]
    pub fn new(params: ModulatorParams, sample_rate: f32) -> Self {
        let mut osc = QuadratureOscillator::recurrence(RenormKind::default());
        osc.set_frequency(params.freq_hz / sample_rate);
        Self { depth: params.depth, osc }
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        let (cos, _sin) = self.osc.advance();
        (1.0 - self.depth) + self.depth * cos
    }

    /// Resets modulator phase without changing depth/frequency.
    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

impl BlockProducer for Modulator {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        if let QuadratureOscillator::Recurrence(o) = &mut self.osc {
            o.renormalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_unity() {
        let mut m = Modulator::new(ModulatorParams { depth: 0.0, freq_hz: 5.0 }, 48000.0);
        for _ in 0..1000 {
            assert!((m.advance() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_freq_is_unity_regardless_of_depth() {
        let mut m = Modulator::new(ModulatorParams { depth: 0.7, freq_hz: 0.0 }, 48000.0);
        for _ in 0..1000 {
            assert!((m.advance() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn full_depth_swings_between_zero_and_two() {
        let mut m = Modulator::new(ModulatorParams { depth: 1.0, freq_hz: 10.0 }, 48000.0);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..48000 {
            let v = m.advance();
            min = min.min(v);
            max = max.max(v);
        }
        assert!(min < 0.05, "min={min}");
        assert!(max > 1.95, "max={max}");
    }
}
