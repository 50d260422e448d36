//! Biquad and general-order IIR filters in four canonical topologies.
//!
//! [`Biquad`] is the fast dedicated second-order path (Direct Form I).
//! [`BiquadDf2`], [`BiquadTdf1`] and [`BiquadTdf2`] are the same transfer
//! function realized in the other three canonical topologies, differing
//! only in numerical behavior and state layout. [`IirFilter`] generalizes
//! all four to arbitrary filter order.
//!
//! Coefficients for the lowpass/highpass cases use the RBJ Audio EQ
//! Cookbook formulas.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::f32::consts::PI;
use libm::{cosf, sinf};

/// Generic biquad coefficients and state, Direct Form I.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Four state samples: `x[n-1], x[n-2], y[n-1], y[n-2]`.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients (`y[n] = x[n]`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Processes one sample, Direct Form I.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter memory without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Same transfer function as [`Biquad`], Direct Form II.
///
/// ```text
/// w[n] = x[n] - a1*w[n-1] - a2*w[n-2]
/// y[n] = b0*w[n] + b1*w[n-1] + b2*w[n-2]
/// ```
///
/// Two state samples: `w[n-1], w[n-2]`.
#[derive(Debug, Clone)]
pub struct BiquadDf2 {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    w1: f32,
    w2: f32,
}

impl BiquadDf2 {
    #[must_use]
    pub fn new() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0, w1: 0.0, w2: 0.0 }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let w = input - self.a1 * self.w1 - self.a2 * self.w2;
        let output = self.b0 * w + self.b1 * self.w1 + self.b2 * self.w2;
        self.w2 = self.w1;
        self.w1 = w;
        output
    }

    pub fn clear(&mut self) {
        self.w1 = 0.0;
        self.w2 = 0.0;
    }
}

impl Default for BiquadDf2 {
    fn default() -> Self {
        Self::new()
    }
}

/// Same transfer function as [`Biquad`], Transposed Direct Form I.
///
/// The transpose of [`Biquad`]'s signal flow graph: the all-pole section
/// runs first (on two accumulators fed by `x`), the all-zero section
/// second (on two accumulators fed by the all-pole section's output).
/// Four state samples, but laid out as two independent accumulator pairs
/// rather than delay lines.
#[derive(Debug, Clone)]
pub struct BiquadTdf1 {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    q1: f32,
    q2: f32,
    p1: f32,
    p2: f32,
}

impl BiquadTdf1 {
    #[must_use]
    pub fn new() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0, q1: 0.0, q2: 0.0, p1: 0.0, p2: 0.0 }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let v = input + self.q1;
        self.q1 = -self.a1 * v + self.q2;
        self.q2 = -self.a2 * v;

        let output = self.b0 * v + self.p1;
        self.p1 = self.b1 * v + self.p2;
        self.p2 = self.b2 * v;

        output
    }

    pub fn clear(&mut self) {
        self.q1 = 0.0;
        self.q2 = 0.0;
        self.p1 = 0.0;
        self.p2 = 0.0;
    }
}

impl Default for BiquadTdf1 {
    fn default() -> Self {
        Self::new()
    }
}

/// Same transfer function as [`Biquad`], Transposed Direct Form II.
///
/// The canonical minimum-delay realization:
/// ```text
/// y[n] = b0*x[n] + z1[n-1]
/// z1[n] = b1*x[n] - a1*y[n] + z2[n-1]
/// z2[n] = b2*x[n] - a2*y[n]
/// ```
///
/// Two state samples: `z1, z2`.
#[derive(Debug, Clone)]
pub struct BiquadTdf2 {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl BiquadTdf2 {
    #[must_use]
    pub fn new() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0, z1: 0.0, z2: 0.0 }
    }

    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    pub fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

impl Default for BiquadTdf2 {
    fn default() -> Self {
        Self::new()
    }
}

/// The four canonical IIR realizations, selectable on [`IirFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IirForm {
    /// Separate `x` and `y` delay lines, `2N` state samples.
    DirectFormI,
    /// A single shared delay line, `N` state samples.
    DirectFormII,
    /// Transpose of Direct Form I: two accumulator chains, `2N` state samples.
    TransposedDirectFormI,
    /// Transpose of Direct Form II: one accumulator chain, `N` state samples.
    TransposedDirectFormII,
}

/// General N-th order IIR filter, any of the four [`IirForm`] topologies.
///
/// `b` and `a` are taken as-is except `a[0]`, which is divided out of both
/// during construction (so `a0` need not be 1 on input). Coefficient slices
/// must have equal, non-zero length (the filter order is `b.len() - 1`).
#[derive(Debug, Clone)]
pub struct IirFilter {
    b: Vec<f32>,
    a: Vec<f32>,
    form: IirForm,
    x_hist: Vec<f32>,
    y_hist: Vec<f32>,
    w_hist: Vec<f32>,
    q_hist: Vec<f32>,
    p_hist: Vec<f32>,
}

impl IirFilter {
    /// Builds a filter of order `b.len() - 1` from feedforward coefficients
    /// `b` and feedback coefficients `a` (with `a[0]` as the normalizer).
    ///
    /// # Panics
    ///
    /// Panics if `b.len() != a.len()`, if either is empty, or if `a[0]` is 0.
    #[must_use]
    pub fn new(b: &[f32], a: &[f32], form: IirForm) -> Self {
        assert_eq!(b.len(), a.len(), "b and a must have equal length");
        assert!(!b.is_empty(), "filter must have at least one coefficient");
        assert!(a[0] != 0.0, "a[0] must be non-zero");

        let a0_inv = 1.0 / a[0];
        let b: Vec<f32> = b.iter().map(|&c| c * a0_inv).collect();
        let a: Vec<f32> = a.iter().map(|&c| c * a0_inv).collect();
        let order = b.len() - 1;

        Self {
            b,
            a,
            form,
            x_hist: vec![0.0; order],
            y_hist: vec![0.0; order],
            w_hist: vec![0.0; order],
            q_hist: vec![0.0; order],
            p_hist: vec![0.0; order],
        }
    }

    /// Filter order (`b.len() - 1`).
    #[must_use]
    pub fn order(&self) -> usize {
        self.b.len() - 1
    }

    /// Processes one sample in the configured [`IirForm`].
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        match self.form {
            IirForm::DirectFormI => self.process_df1(input),
            IirForm::DirectFormII => self.process_df2(input),
            IirForm::TransposedDirectFormI => self.process_tdf1(input),
            IirForm::TransposedDirectFormII => self.process_tdf2(input),
        }
    }

    fn process_df1(&mut self, input: f32) -> f32 {
        let n = self.order();
        let mut output = self.b[0] * input;
        for k in 0..n {
            output += self.b[k + 1] * self.x_hist[k] - self.a[k + 1] * self.y_hist[k];
        }
        for k in (1..n).rev() {
            self.x_hist[k] = self.x_hist[k - 1];
            self.y_hist[k] = self.y_hist[k - 1];
        }
        if n > 0 {
            self.x_hist[0] = input;
            self.y_hist[0] = output;
        }
        output
    }

    fn process_df2(&mut self, input: f32) -> f32 {
        let n = self.order();
        let mut w = input;
        for k in 0..n {
            w -= self.a[k + 1] * self.w_hist[k];
        }
        let mut output = self.b[0] * w;
        for k in 0..n {
            output += self.b[k + 1] * self.w_hist[k];
        }
        for k in (1..n).rev() {
            self.w_hist[k] = self.w_hist[k - 1];
        }
        if n > 0 {
            self.w_hist[0] = w;
        }
        output
    }

    fn process_tdf1(&mut self, input: f32) -> f32 {
        let n = self.order();
        if n == 0 {
            return self.b[0] * input;
        }
        let v = input + self.q_hist[0];
        for k in 0..n - 1 {
            self.q_hist[k] = -self.a[k + 1] * v + self.q_hist[k + 1];
        }
        self.q_hist[n - 1] = -self.a[n] * v;

        let output = self.b[0] * v + self.p_hist[0];
        for k in 0..n - 1 {
            self.p_hist[k] = self.b[k + 1] * v + self.p_hist[k + 1];
        }
        self.p_hist[n - 1] = self.b[n] * v;

        output
    }

    fn process_tdf2(&mut self, input: f32) -> f32 {
        let n = self.order();
        if n == 0 {
            return self.b[0] * input;
        }
        let output = self.b[0] * input + self.w_hist[0];
        for k in 0..n - 1 {
            self.w_hist[k] = self.b[k + 1] * input - self.a[k + 1] * output + self.w_hist[k + 1];
        }
        self.w_hist[n - 1] = self.b[n] * input - self.a[n] * output;
        output
    }

    /// Clears all filter memory without changing coefficients.
    pub fn clear(&mut self) {
        self.x_hist.fill(0.0);
        self.y_hist.fill(0.0);
        self.w_hist.fill(0.0);
        self.q_hist.fill(0.0);
        self.p_hist.fill(0.0);
    }
}

/// Calculates lowpass coefficients using the RBJ cookbook formula.
///
/// Returns `(b0, b1, b2, a0, a1, a2)`.
#[must_use]
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates highpass coefficients using the RBJ cookbook formula.
///
/// Returns `(b0, b1, b2, a0, a1, a2)`.
#[must_use]
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_biquads_agree(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32, input: &[f32]) {
        let mut df1 = Biquad::new();
        let mut df2 = BiquadDf2::new();
        let mut tdf1 = BiquadTdf1::new();
        let mut tdf2 = BiquadTdf2::new();
        df1.set_coefficients(b0, b1, b2, a0, a1, a2);
        df2.set_coefficients(b0, b1, b2, a0, a1, a2);
        tdf1.set_coefficients(b0, b1, b2, a0, a1, a2);
        tdf2.set_coefficients(b0, b1, b2, a0, a1, a2);

        for &x in input {
            let y1 = df1.process(x);
            let y2 = df2.process(x);
            let y3 = tdf1.process(x);
            let y4 = tdf2.process(x);
            assert!((y1 - y2).abs() < 1e-3, "df1={y1} df2={y2}");
            assert!((y1 - y3).abs() < 1e-3, "df1={y1} tdf1={y3}");
            assert!((y1 - y4).abs() < 1e-3, "df1={y1} tdf2={y4}");
        }
    }

    #[test]
    fn topologies_agree_on_lowpass() {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 44100.0);
        let input: Vec<f32> = (0..200).map(|n| if n == 0 { 1.0 } else { 0.0 }).collect();
        all_biquads_agree(b0, b1, b2, a0, a1, a2, &input);
    }

    #[test]
    fn topologies_agree_on_highpass() {
        let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(2000.0, 1.0, 48000.0);
        let input: Vec<f32> = (0..200).map(|n| (n as f32 * 0.01).sin()).collect();
        all_biquads_agree(b0, b1, b2, a0, a1, a2, &input);
    }

    #[test]
    fn biquad_passthrough() {
        let mut biquad = Biquad::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            assert!((biquad.process(input) - input).abs() < 0.0001);
        }
    }

    #[test]
    fn biquad_clear_zeroes_state() {
        let mut biquad = Biquad::new();
        for _ in 0..10 {
            biquad.process(1.0);
        }
        biquad.clear();
        assert_eq!(biquad.process(0.0), 0.0);
    }

    #[test]
    fn lowpass_dc_passes_near_unity() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn highpass_dc_is_blocked() {
        let mut biquad = Biquad::new();
        let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(1000.0, 0.707, 44100.0);
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }
        assert!(output.abs() < 0.01);
    }

    #[test]
    fn general_iir_matches_dedicated_biquad() {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(500.0, 0.9, 44100.0);
        let mut biquad = Biquad::new();
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let b = [b0 / a0, b1 / a0, b2 / a0];
        let a = [1.0, a1 / a0, a2 / a0];
        let mut general = IirFilter::new(&b, &a, IirForm::DirectFormI);

        for n in 0..500 {
            let x = if n == 10 { 1.0 } else { 0.0 };
            let expected = biquad.process(x);
            let actual = general.process(x);
            assert!((expected - actual).abs() < 1e-4, "n={n} expected={expected} actual={actual}");
        }
    }

    #[test]
    fn general_iir_all_forms_agree_for_order_four() {
        // a stable 4th-order lowpass-ish set, well inside the unit circle.
        let b = [0.02, 0.08, 0.12, 0.08, 0.02];
        let a = [1.0, -1.8, 1.5, -0.6, 0.1];
        let forms = [
            IirForm::DirectFormI,
            IirForm::DirectFormII,
            IirForm::TransposedDirectFormI,
            IirForm::TransposedDirectFormII,
        ];
        let mut filters: Vec<IirFilter> = forms.iter().map(|&f| IirFilter::new(&b, &a, f)).collect();

        for n in 0..300 {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let outputs: Vec<f32> = filters.iter_mut().map(|f| f.process(x)).collect();
            for w in outputs.windows(2) {
                assert!((w[0] - w[1]).abs() < 1e-3, "n={n} outputs={outputs:?}");
            }
        }
    }
}
