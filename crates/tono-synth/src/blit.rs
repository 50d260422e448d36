//! Band-limited impulse trains (BLIT) and the waveforms derived from them.
//!
//! A BLIT's spectrum is a flat comb of `m` harmonics, computed in closed
//! form via the periodic sinc (Dirichlet) kernel rather than summed
//! harmonic-by-harmonic. The fundamental and the `m`-th harmonic phase are
//! each tracked by a [`RecurrenceOscillator`] so the argument to `sin`/`cos`
//! never grows with `n` — only the per-sample rotation does.

use libm::floorf;
use tono_core::{BlockProducer, LeakyIntegrator, THRESHOLD};

use crate::oscillator::{QuadratureSource, RecurrenceOscillator, RenormKind};

/// `0.4` rather than `0.5` Nyquist fraction used to pick the harmonic count
/// `m` — the safety margin below Nyquist that keeps the BLIT alias-free.
/// Load-bearing; not a tunable.
const NYQUIST_MARGIN: f32 = 0.4;

/// Harmonic count for a unipolar BLIT at normalized frequency `f`:
/// `m = 2*floor(0.4/f) + 1` (always odd, always >= 1).
#[must_use]
pub fn unipolar_harmonic_count(f: f32) -> u32 {
    let raw = floorf(NYQUIST_MARGIN / f.max(f32::MIN_POSITIVE)) as i64;
    (2 * raw.max(0) + 1) as u32
}

/// Harmonic count for a bipolar BLIT driven at `f_prime = 2f`:
/// `m = 2*floor(0.4/f_prime)` (always even); clamped to 2 so the bipolar
/// form never degenerates to a DC-only kernel.
#[must_use]
pub fn bipolar_harmonic_count(f_prime: f32) -> u32 {
    let raw = floorf(NYQUIST_MARGIN / f_prime.max(f32::MIN_POSITIVE)) as i64;
    (2 * raw.max(1)) as u32
}

/// Periodic sinc (Dirichlet kernel): `sin(pi*m*f*n) / (m*sin(pi*f*n))`,
/// evaluated from the fundamental and harmonic phasors directly rather than
/// from `n`, with the numerically safe cosine-ratio limit substituted
/// whenever the denominator nears zero.
#[inline]
fn msinc_from_phasors(m: u32, c1: f32, s1: f32, cm: f32, sm: f32) -> f32 {
    let threshold = THRESHOLD / m as f32;
    if s1.abs() < threshold { cm / c1 } else { sm / (m as f32 * s1) }
}

/// Unipolar band-limited impulse train.
///
/// `m` odd harmonics, recomputed whenever [`Blit::set_frequency`] changes
/// the fundamental. Output is the msinc kernel itself — a DC-biased
/// impulse train, per spec; the DC bias is removed by the leaky integrator
/// in the waveforms derived from it, not here.
#[derive(Debug, Clone)]
pub struct Blit {
    m: u32,
    fundamental: RecurrenceOscillator,
    harmonic: RecurrenceOscillator,
}

impl Blit {
    /// Creates a BLIT generator at frequency 0 (call [`Blit::set_frequency`]
    /// before use).
    #[must_use]
    pub fn new() -> Self {
        Self {
            m: 1,
            fundamental: RecurrenceOscillator::new(RenormKind::default()),
            harmonic: RecurrenceOscillator::new(RenormKind::default()),
        }
    }

    /// Sets the fundamental normalized frequency, recomputing the harmonic
    /// count `m` and the two driving phasors.
    pub fn set_frequency(&mut self, freq: f32) {
        self.m = unipolar_harmonic_count(freq);
        self.fundamental.set_frequency(freq / 2.0);
        self.harmonic.set_frequency(self.m as f32 * freq / 2.0);
    }

    /// Current harmonic count `m` (odd).
    #[must_use]
    pub fn harmonic_count(&self) -> u32 {
        self.m
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        let (c1, s1) = self.fundamental.advance();
        let (cm, sm) = self.harmonic.advance();
        msinc_from_phasors(self.m, c1, s1, cm, sm)
    }

    /// Resets phase without changing frequency.
    pub fn reset(&mut self) {
        self.fundamental.reset();
        self.harmonic.reset();
    }

    /// Renormalizes both driving phasors. Must be called once per block by
    /// any caller driving [`Blit::advance`] directly (as the waveforms
    /// derived from a BLIT do) rather than through [`BlockProducer::produce`].
    pub fn renormalize(&mut self) {
        self.fundamental.renormalize();
        self.harmonic.renormalize();
    }
}

impl Default for Blit {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockProducer for Blit {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        self.renormalize();
    }
}

/// Bipolar band-limited impulse train: driven at `f' = 2f`, `m` even,
/// alternating sign at period `1/f`. Integrating it gives a square wave.
#[derive(Debug, Clone)]
pub struct BpBlit {
    m: u32,
    fundamental: RecurrenceOscillator,
    harmonic: RecurrenceOscillator,
}

impl BpBlit {
    /// Creates a BPBLIT generator at frequency 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            m: 2,
            fundamental: RecurrenceOscillator::new(RenormKind::default()),
            harmonic: RecurrenceOscillator::new(RenormKind::default()),
        }
    }

    /// Sets `f` (the pre-doubling fundamental); the kernel itself is
    /// evaluated at `f' = 2f`.
    pub fn set_frequency(&mut self, freq: f32) {
        let f_prime = 2.0 * freq;
        self.m = bipolar_harmonic_count(f_prime);
        self.fundamental.set_frequency(f_prime / 2.0);
        self.harmonic.set_frequency(self.m as f32 * f_prime / 2.0);
    }

    /// Current harmonic count `m` (even).
    #[must_use]
    pub fn harmonic_count(&self) -> u32 {
        self.m
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        let (c1, s1) = self.fundamental.advance();
        let (cm, sm) = self.harmonic.advance();
        msinc_from_phasors(self.m, c1, s1, cm, sm)
    }

    /// Resets phase without changing frequency.
    pub fn reset(&mut self) {
        self.fundamental.reset();
        self.harmonic.reset();
    }

    /// Renormalizes both driving phasors. Must be called once per block by
    /// any caller driving [`BpBlit::advance`] directly (as the waveforms
    /// derived from a BPBLIT do) rather than through [`BlockProducer::produce`].
    pub fn renormalize(&mut self) {
        self.fundamental.renormalize();
        self.harmonic.renormalize();
    }
}

impl Default for BpBlit {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockProducer for BpBlit {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        self.renormalize();
    }
}

/// Sawtooth, `leaky_integrate(2 * BLIT)`. The `2x` gain and the integrator's
/// own scaling together normalize peak amplitude to roughly `±1`.
#[derive(Debug, Clone, Default)]
pub struct Sawtooth {
    blit: Blit,
    integrator: LeakyIntegrator,
}

impl Sawtooth {
    /// Creates a sawtooth generator at frequency 0.
    #[must_use]
    pub fn new() -> Self {
        Self { blit: Blit::new(), integrator: LeakyIntegrator::default() }
    }

    /// Sets the normalized frequency.
    pub fn set_frequency(&mut self, freq: f32) {
        self.blit.set_frequency(freq);
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        self.integrator.process(2.0 * self.blit.advance())
    }

    /// Resets BLIT phase and integrator memory.
    pub fn reset(&mut self) {
        self.blit.reset();
        self.integrator.clear();
    }
}

impl BlockProducer for Sawtooth {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        self.blit.renormalize();
    }
}

/// Square, `leaky_integrate(2 * BPBLIT)`.
#[derive(Debug, Clone, Default)]
pub struct Square {
    bpblit: BpBlit,
    integrator: LeakyIntegrator,
}

impl Square {
    /// Creates a square wave generator at frequency 0.
    #[must_use]
    pub fn new() -> Self {
        Self { bpblit: BpBlit::new(), integrator: LeakyIntegrator::default() }
    }

    /// Sets the normalized frequency.
    pub fn set_frequency(&mut self, freq: f32) {
        self.bpblit.set_frequency(freq);
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        self.integrator.process(2.0 * self.bpblit.advance())
    }

    /// Resets BPBLIT phase and integrator memory.
    pub fn reset(&mut self) {
        self.bpblit.reset();
        self.integrator.clear();
    }
}

impl BlockProducer for Square {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        self.bpblit.renormalize();
    }
}

/// Triangle, `leaky_integrate(4*f * Square)` — a second integration stage
/// over the square wave, scaled by `4f` to hold peak amplitude near `±1`
/// independent of frequency.
#[derive(Debug, Clone, Default)]
pub struct Triangle {
    square: Square,
    integrator: LeakyIntegrator,
    freq: f32,
}

impl Triangle {
    /// Creates a triangle wave generator at frequency 0.
    #[must_use]
    pub fn new() -> Self {
        Self { square: Square::new(), integrator: LeakyIntegrator::default(), freq: 0.0 }
    }

    /// Sets the normalized frequency.
    pub fn set_frequency(&mut self, freq: f32) {
        self.freq = freq;
        self.square.set_frequency(freq);
    }

    /// Advances by one sample.
    #[inline]
    #[must_use]
    pub fn advance(&mut self) -> f32 {
        let square = self.square.advance();
        self.integrator.process(4.0 * self.freq * square)
    }

    /// Resets square-wave phase and both integrator stages.
    pub fn reset(&mut self) {
        self.square.reset();
        self.integrator.clear();
    }
}

impl BlockProducer for Triangle {
    fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
        self.square.bpblit.renormalize();
    }
}
