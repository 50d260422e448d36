//! dB-domain ADSR envelope with retrigger semantics.
//!
//! The envelope's internal state, `level_dB`, always satisfies
//! `-B <= level_dB <= 0`. A `Press` transitions to `Attack` from whatever
//! `level_dB` currently is — retrigger never resets to the floor first,
//! which is what makes a second press audibly rise from every phase.

use tono_core::{B, db_to_mag};

/// ADSR envelope state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Output held at the floor (`-B` dB, i.e. silence).
    #[default]
    Idle,
    /// Rising toward 0 dB.
    Attack,
    /// Falling from 0 dB toward the sustain level.
    Decay,
    /// Held at the sustain level.
    Sustain,
    /// Falling toward the floor after a release.
    Release,
}

/// Envelope timing and level parameters, already resolved to the
/// sample domain.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeParams {
    /// Attack time, in samples.
    pub attack_samples: f32,
    /// Decay time, in samples.
    pub decay_samples: f32,
    /// Release time, in samples.
    pub release_samples: f32,
    /// Sustain level, in dB, `[-B, 0]`.
    pub sustain_db: f32,
}

impl EnvelopeParams {
    /// Builds envelope params from times in seconds and a sample rate.
    #[must_use]
    pub fn from_seconds(
        attack_s: f32,
        decay_s: f32,
        sustain_db: f32,
        release_s: f32,
        sample_rate: f32,
    ) -> Self {
        Self {
            attack_samples: attack_s * sample_rate,
            decay_samples: decay_s * sample_rate,
            release_samples: release_s * sample_rate,
            sustain_db,
        }
    }

    /// Per-sample dB increment during attack: `B/a` if `a > 1`, else `B`
    /// (a single-sample jump to 0 dB).
    #[must_use]
    pub fn attack_delta(&self) -> f32 {
        if self.attack_samples > 1.0 { B / self.attack_samples } else { B }
    }

    /// Per-sample dB increment during decay (`<= 0`): `s/d` if `d > 1`,
    /// else `s`.
    #[must_use]
    pub fn decay_delta(&self) -> f32 {
        if self.decay_samples > 1.0 { self.sustain_db / self.decay_samples } else { self.sustain_db }
    }

    /// Per-sample dB increment during release (`<= 0`):
    /// `-(B+s)/r` if `r > 1`, else `-(B+s)`.
    #[must_use]
    pub fn release_delta(&self) -> f32 {
        let span = B + self.sustain_db;
        if self.release_samples > 1.0 { -span / self.release_samples } else { -span }
    }
}

/// Sample-accurate ADSR envelope generator in the dB domain.
///
/// Output is `db_to_mag(level_dB)`, always `<= 1.0` (0 dBFS).
#[derive(Debug, Clone)]
pub struct Envelope {
    params: EnvelopeParams,
    state: EnvelopeState,
    level_db: f32,
    attack_delta: f32,
    decay_delta: f32,
    release_delta: f32,
}

impl Envelope {
    /// Creates an idle envelope with the given parameters.
    #[must_use]
    pub fn new(params: EnvelopeParams) -> Self {
        let mut env = Self {
            params,
            state: EnvelopeState::Idle,
            level_db: -B,
            attack_delta: 0.0,
            decay_delta: 0.0,
            release_delta: 0.0,
        };
        env.recompute_deltas();
        env
    }

    fn recompute_deltas(&mut self) {
        self.attack_delta = self.params.attack_delta();
        self.decay_delta = self.params.decay_delta();
        self.release_delta = self.params.release_delta();
    }

    /// Replaces the envelope's parameters, recomputing per-sample deltas.
    /// Does not change the current state or level.
    pub fn set_params(&mut self, params: EnvelopeParams) {
        self.params = params;
        self.recompute_deltas();
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current level, in dB (`[-B, 0]`).
    #[must_use]
    pub fn level_db(&self) -> f32 {
        self.level_db
    }

    /// Whether the envelope has fully decayed to the floor and is not
    /// playing.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == EnvelopeState::Idle
    }

    /// Handles a `Press` event: transitions to `Attack` from the current
    /// level — retrigger, not reset.
    pub fn press(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Handles a `Release` event: transitions to `Release` from the
    /// current level. A no-op if already idle.
    pub fn release(&mut self) {
        if self.state != EnvelopeState::Idle {
            self.state = EnvelopeState::Release;
        }
    }

    /// Advances by one sample, returning the linear magnitude.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => {
                self.level_db = -B;
            }
            EnvelopeState::Attack => {
                self.level_db += self.attack_delta;
                if self.level_db >= 0.0 {
                    self.level_db = 0.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.level_db += self.decay_delta;
                if self.level_db <= self.params.sustain_db {
                    self.level_db = self.params.sustain_db;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Sustain => {
                self.level_db = self.params.sustain_db;
            }
            EnvelopeState::Release => {
                self.level_db += self.release_delta;
                if self.level_db <= -B {
                    self.level_db = -B;
                    self.state = EnvelopeState::Idle;
                }
            }
        }
        self.level_db = self.level_db.clamp(-B, 0.0);
        db_to_mag(self.level_db)
    }

    /// Fills `out` with one magnitude per sample, advancing state.
    pub fn produce(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(attack_s: f32, decay_s: f32, sustain_db: f32, release_s: f32) -> EnvelopeParams {
        EnvelopeParams::from_seconds(attack_s, decay_s, sustain_db, release_s, 48000.0)
    }

    #[test]
    fn idle_output_is_floor() {
        let mut env = Envelope::new(params(0.1, 0.05, -3.0, 0.1));
        assert_eq!(env.advance(), db_to_mag(-B));
    }

    #[test]
    fn full_adsr_cycle_reaches_sustain_then_idle() {
        let mut env = Envelope::new(params(0.1, 0.05, -3.0, 0.1));
        env.press();
        let mut reached_decay = false;
        for _ in 0..48000 {
            env.advance();
            if env.state() == EnvelopeState::Decay {
                reached_decay = true;
            }
        }
        assert!(reached_decay);
        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level_db() - (-3.0)).abs() < 1.0);

        env.release();
        for _ in 0..48000 {
            env.advance();
        }
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert!(env.advance() <= db_to_mag(0.0));
    }

    #[test]
    fn peak_never_exceeds_zero_dbfs() {
        let mut env = Envelope::new(params(0.01, 0.1, -20.0, 0.5));
        env.press();
        for _ in 0..96000 {
            let mag = env.advance();
            assert!(mag <= 1.0 + 1e-6, "envelope exceeded 0 dBFS: {mag}");
        }
    }

    #[test]
    fn retrigger_in_every_phase_causes_level_to_rise() {
        let (a, d, s, r) = (0.1, 0.1, -20.0, 0.2);
        let sample_rate = 48000.0;
        let block_size = 16usize;
        let params_v = params(a, d, s, r);

        let attack_len = (a * sample_rate) as usize;
        let decay_len = (d * sample_rate) as usize;
        let mid_attack = attack_len / 2;
        let mid_decay = attack_len + decay_len / 2;
        let mid_sustain = attack_len + decay_len + 4000;
        let mid_release = attack_len + decay_len + 4000 * 2 + (r * sample_rate) as usize / 2;

        for &press2_sample in &[mid_attack, mid_decay, mid_sustain, mid_release] {
            let mut env = Envelope::new(params_v);
            env.press();
            for n in 0..press2_sample {
                env.advance();
                if env.state() == EnvelopeState::Sustain && n == mid_sustain + 4000 {
                    env.release();
                }
            }
            env.press();
            let mut window_min = f32::MAX;
            for _ in 0..block_size {
                window_min = window_min.min(env.advance());
            }
            let mut level_after = window_min;
            for _ in 0..block_size {
                level_after = env.advance();
            }
            assert!(
                window_min < level_after,
                "press2 at {press2_sample}: window_min={window_min} level_after={level_after}"
            );
        }
    }
}
