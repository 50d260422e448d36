//! Tono Core — DSP primitives shared by the synthesis layer.
//!
//! Sample-rate-agnostic building blocks used by `tono-synth`: the biquad and
//! general IIR filter families, the leaky integrator that turns BLIT impulse
//! trains into band-limited sawtooth/square/triangle waves, the fixed-capacity
//! delay line, and the `Effect`/`BlockProducer` processing traits.
//!
//! # Filters
//!
//! - [`Biquad`] — fast dedicated second-order path, Direct Form I.
//! - [`BiquadDf2`], [`BiquadTdf1`], [`BiquadTdf2`] — the same transfer
//!   function in the other three canonical topologies.
//! - [`IirFilter`] — general N-th order IIR, any of the four [`IirForm`] topologies.
//!
//! # Delay
//!
//! - [`DelayLine`] — fixed-capacity circular buffer, fractional read offset.
//!
//! # Integration
//!
//! - [`LeakyIntegrator`] — second-order near-integrator used to derive
//!   sawtooth/square/triangle from impulse trains.
//!
//! # Processing traits
//!
//! - [`Effect`] — sample/block processing for transformers.
//! - [`BlockProducer`] — block filling for generators.
//!
//! # no_std support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature to
//! build without it; [`DelayLine`] and [`IirFilter`] still need `alloc`.
//!
//! ```toml
//! [dependencies]
//! tono-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod effect;
pub mod leaky_integrator;
pub mod math;

pub use biquad::{
    Biquad, BiquadDf2, BiquadTdf1, BiquadTdf2, IirFilter, IirForm, highpass_coefficients,
    lowpass_coefficients,
};
pub use delay::{DelayLine, Interpolation};
pub use effect::{BlockProducer, Chain, Effect, EffectExt};
pub use leaky_integrator::{DEFAULT_R, LeakyIntegrator};
pub use math::{B, THRESHOLD, db_to_mag, flush_denormal, lerp, mag_to_db, ms_to_samples, seconds_to_samples};
