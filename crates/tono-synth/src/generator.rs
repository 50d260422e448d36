//! The generator selector: one of the waveform kinds named in `generator_kind`
//! (§6), wrapped behind a single type so [`crate::voice::Voice`] composes by
//! value rather than by trait object.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::rc::Rc;

use tono_core::BlockProducer;

use crate::blit::{BpBlit, Blit, Sawtooth, Square, Triangle};
use crate::oscillator::{QuadratureOscillator, RenormKind, SineGenerator, SineTable};

/// Which waveform a [`crate::voice::Voice`] produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Pure sinusoid.
    #[default]
    Sine,
    /// Unipolar band-limited impulse train.
    Blit,
    /// Bipolar band-limited impulse train.
    BpBlit,
    /// Leaky-integrated BLIT.
    Sawtooth,
    /// Leaky-integrated BPBLIT.
    Square,
    /// Twice leaky-integrated BPBLIT, scaled by frequency.
    Triangle,
}

/// Which quadrature oscillator implementation backs [`GeneratorKind::Sine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OscillatorKind {
    /// Complex-phasor recurrence, renormalized once per block.
    #[default]
    Recurrence,
    /// Shared interpolated lookup table.
    Lookup,
}

/// A single voice's waveform source: exactly one of the six generator kinds,
/// each producing a mono signal.
#[derive(Debug, Clone)]
pub enum Generator {
    /// See [`GeneratorKind::Sine`].
    Sine(SineGenerator),
    /// See [`GeneratorKind::Blit`].
    Blit(Blit),
    /// See [`GeneratorKind::BpBlit`].
    BpBlit(BpBlit),
    /// See [`GeneratorKind::Sawtooth`].
    Sawtooth(Sawtooth),
    /// See [`GeneratorKind::Square`].
    Square(Square),
    /// See [`GeneratorKind::Triangle`].
    Triangle(Triangle),
}

impl Generator {
    /// Builds a generator of `kind`, using `sine_table` for
    /// [`GeneratorKind::Sine`] when `osc_kind` is [`OscillatorKind::Lookup`]
    /// (ignored otherwise).
    #[must_use]
    pub fn new(kind: GeneratorKind, osc_kind: OscillatorKind, sine_table: &Rc<SineTable>) -> Self {
        match kind {
            GeneratorKind::Sine => {
                let osc = match osc_kind {
                    OscillatorKind::Recurrence => QuadratureOscillator::recurrence(RenormKind::default()),
                    OscillatorKind::Lookup => QuadratureOscillator::lookup(Rc::clone(sine_table)),
                };
                Generator::Sine(SineGenerator::new(osc))
            }
            GeneratorKind::Blit => Generator::Blit(Blit::new()),
            GeneratorKind::BpBlit => Generator::BpBlit(BpBlit::new()),
            GeneratorKind::Sawtooth => Generator::Sawtooth(Sawtooth::new()),
            GeneratorKind::Square => Generator::Square(Square::new()),
            GeneratorKind::Triangle => Generator::Triangle(Triangle::new()),
        }
    }

    /// Sets the normalized frequency driving this generator.
    pub fn set_frequency(&mut self, freq: f32) {
        match self {
            Generator::Sine(g) => g.set_frequency(freq),
            Generator::Blit(g) => g.set_frequency(freq),
            Generator::BpBlit(g) => g.set_frequency(freq),
            Generator::Sawtooth(g) => g.set_frequency(freq),
            Generator::Square(g) => g.set_frequency(freq),
            Generator::Triangle(g) => g.set_frequency(freq),
        }
    }

    /// Advances by one sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self {
            Generator::Sine(g) => g.advance(),
            Generator::Blit(g) => g.advance(),
            Generator::BpBlit(g) => g.advance(),
            Generator::Sawtooth(g) => g.advance(),
            Generator::Square(g) => g.advance(),
            Generator::Triangle(g) => g.advance(),
        }
    }

    /// Resets phase/integrator state without changing frequency.
    pub fn reset(&mut self) {
        match self {
            Generator::Sine(g) => g.reset(),
            Generator::Blit(g) => g.reset(),
            Generator::BpBlit(g) => g.reset(),
            Generator::Sawtooth(g) => g.reset(),
            Generator::Square(g) => g.reset(),
            Generator::Triangle(g) => g.reset(),
        }
    }
}

impl BlockProducer for Generator {
    fn produce(&mut self, out: &mut [f32]) {
        match self {
            Generator::Sine(g) => g.produce(out),
            Generator::Blit(g) => g.produce(out),
            Generator::BpBlit(g) => g.produce(out),
            Generator::Sawtooth(g) => g.produce(out),
            Generator::Square(g) => g.produce(out),
            Generator::Triangle(g) => g.produce(out),
        }
    }
}
