//! Property-based tests for tono-core DSP primitives.

use proptest::prelude::*;
use tono_core::{
    Biquad, BiquadDf2, BiquadTdf1, BiquadTdf2, DelayLine, IirFilter, IirForm, LeakyIntegrator,
    highpass_coefficients, lowpass_coefficients,
};

fn configure(biquad: &mut Biquad, is_lowpass: bool, freq: f32, q: f32) {
    let sr = 48000.0;
    let (b0, b1, b2, a0, a1, a2) = if is_lowpass {
        lowpass_coefficients(freq, q, sr)
    } else {
        highpass_coefficients(freq, q, sr)
    };
    biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any valid cutoff (20-20000 Hz) and Q (0.1-10.0), Biquad filters
    /// produce finite output for 1024 samples of random finite input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.1f32..10.0f32,
        is_lowpass in any::<bool>(),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        configure(&mut biquad, is_lowpass, freq, q);

        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(out.is_finite(), "non-finite output {} for input {}", out, sample);
        }
    }

    /// The four biquad topologies agree (within tolerance) for any valid
    /// lowpass coefficient set and random finite input.
    #[test]
    fn all_biquad_topologies_agree(
        freq in 20.0f32..20000.0f32,
        q in 0.2f32..5.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(freq, q, 48000.0);
        let mut df1 = Biquad::new();
        let mut df2 = BiquadDf2::new();
        let mut tdf1 = BiquadTdf1::new();
        let mut tdf2 = BiquadTdf2::new();
        df1.set_coefficients(b0, b1, b2, a0, a1, a2);
        df2.set_coefficients(b0, b1, b2, a0, a1, a2);
        tdf1.set_coefficients(b0, b1, b2, a0, a1, a2);
        tdf2.set_coefficients(b0, b1, b2, a0, a1, a2);

        for &sample in &input {
            let y1 = df1.process(sample);
            let y2 = df2.process(sample);
            let y3 = tdf1.process(sample);
            let y4 = tdf2.process(sample);
            prop_assert!((y1 - y2).abs() < 1e-2, "df1 {} vs df2 {}", y1, y2);
            prop_assert!((y1 - y3).abs() < 1e-2, "df1 {} vs tdf1 {}", y1, y3);
            prop_assert!((y1 - y4).abs() < 1e-2, "df1 {} vs tdf2 {}", y1, y4);
        }
    }

    /// A general IirFilter built from a stable 2nd-order coefficient set
    /// produces the same output as the dedicated Biquad, regardless of form.
    #[test]
    fn general_iir_matches_biquad_for_any_stable_lowpass(
        freq in 20.0f32..20000.0f32,
        q in 0.2f32..5.0f32,
        form_idx in 0usize..4,
    ) {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(freq, q, 48000.0);
        let mut biquad = Biquad::new();
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);

        let forms = [
            IirForm::DirectFormI,
            IirForm::DirectFormII,
            IirForm::TransposedDirectFormI,
            IirForm::TransposedDirectFormII,
        ];
        let b = [b0 / a0, b1 / a0, b2 / a0];
        let a = [1.0, a1 / a0, a2 / a0];
        let mut general = IirFilter::new(&b, &a, forms[form_idx]);

        for n in 0..256 {
            let x = if n == 5 { 1.0 } else { 0.0 };
            let expected = biquad.process(x);
            let actual = general.process(x);
            prop_assert!((expected - actual).abs() < 1e-2, "n={} expected={} actual={}", n, expected, actual);
        }
    }

    /// The leaky integrator never produces non-finite output for bounded input.
    #[test]
    fn leaky_integrator_stays_finite(
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut integrator = LeakyIntegrator::default();
        for &sample in &input {
            let out = integrator.process(sample);
            prop_assert!(out.is_finite());
        }
    }

    /// Write N random samples to a DelayLine, read them back at integer
    /// offsets — they must match exactly (no interpolation at integer offsets).
    #[test]
    fn delay_line_integrity(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..=64),
    ) {
        let n = samples.len();
        let mut delay = DelayLine::new(n + 1);
        delay.set_interpolation(tono_core::Interpolation::None);

        for &s in &samples {
            delay.write(s);
        }

        for (i, &expected) in samples.iter().rev().enumerate() {
            let got = delay.read(i as f32);
            prop_assert!(
                (got - expected).abs() < 1e-6,
                "delay mismatch at offset={}: expected {}, got {}",
                i, expected, got
            );
        }
    }
}
