//! Integration tests exercising full voice and synth behavior end to end.

use tono_synth::{
    EnvelopeConfig, FilterConfig, FilterKind, GeneratorKind, ModulatorConfig, NoteEvent, Synth,
    SynthConfig,
};

const SAMPLE_RATE: f32 = 48000.0;

fn config(generator_kind: GeneratorKind) -> SynthConfig {
    SynthConfig {
        sample_rate: SAMPLE_RATE,
        block_size: 16,
        max_polyphony: 8,
        generator_kind,
        envelope: EnvelopeConfig { attack_s: 0.01, decay_s: 0.05, sustain_db: -6.0, release_s: 0.2 },
        modulator: ModulatorConfig { depth: 0.0, freq_hz: 0.0 },
        filter: FilterConfig::default(),
        ..SynthConfig::default()
    }
}

#[test]
fn chord_of_three_notes_sums_without_clipping_immediately() {
    let mut synth = Synth::new(config(GeneratorKind::Sawtooth)).unwrap();
    let mut out = [0.0f32; 256];
    synth
        .process(
            &mut out,
            &[NoteEvent::new(0, 60), NoteEvent::new(0, 64), NoteEvent::new(0, 67)],
            &[],
        )
        .unwrap();
    assert_eq!(synth.active_voice_count(), 3);
    assert!(out.iter().any(|&x| x.abs() > 1e-6));
}

#[test]
fn releasing_one_note_does_not_silence_others() {
    let mut synth = Synth::new(config(GeneratorKind::Square)).unwrap();
    let mut out = [0.0f32; 256];
    synth.process(&mut out, &[NoteEvent::new(0, 60), NoteEvent::new(0, 64)], &[]).unwrap();
    synth.process(&mut out, &[], &[NoteEvent::new(0, 60)]).unwrap();
    for _ in 0..100 {
        synth.process(&mut out, &[], &[]).unwrap();
    }
    // note 60 released and decayed; note 64 should still be held
    assert_eq!(synth.active_voice_count(), 1);
}

#[test]
fn retriggering_same_note_does_not_allocate_a_second_voice() {
    let mut synth = Synth::new(config(GeneratorKind::Sine)).unwrap();
    let mut out = [0.0f32; 16];
    synth.process(&mut out, &[NoteEvent::new(0, 69)], &[]).unwrap();
    synth.process(&mut out, &[NoteEvent::new(0, 69)], &[]).unwrap();
    assert_eq!(synth.active_voice_count(), 1);
}

#[test]
fn releasing_a_retriggered_note_silences_it_completely() {
    let mut synth = Synth::new(config(GeneratorKind::Sine)).unwrap();
    let mut out = [0.0f32; 16];
    synth.process(&mut out, &[NoteEvent::new(0, 69)], &[]).unwrap();
    synth.process(&mut out, &[NoteEvent::new(0, 69)], &[]).unwrap();
    synth.process(&mut out, &[], &[NoteEvent::new(0, 69)]).unwrap();
    for _ in 0..200 {
        synth.process(&mut out, &[], &[]).unwrap();
    }
    assert_eq!(synth.active_voice_count(), 0, "retriggered note must not leave a stuck voice behind");
}

#[test]
fn voice_pool_exhaustion_steals_rather_than_drops_notes() {
    let mut synth = Synth::new(SynthConfig { max_polyphony: 2, ..config(GeneratorKind::Sine) }).unwrap();
    let mut out = [0.0f32; 16];
    synth
        .process(&mut out, &[NoteEvent::new(0, 60), NoteEvent::new(0, 64)], &[])
        .unwrap();
    synth.process(&mut out, &[NoteEvent::new(0, 67)], &[]).unwrap();
    assert_eq!(synth.active_voice_count(), 2);
}

#[test]
fn all_generator_kinds_produce_a_held_note_for_one_second() {
    for kind in [
        GeneratorKind::Sine,
        GeneratorKind::Blit,
        GeneratorKind::BpBlit,
        GeneratorKind::Sawtooth,
        GeneratorKind::Square,
        GeneratorKind::Triangle,
    ] {
        let mut synth = Synth::new(config(kind)).unwrap();
        let mut out = [0.0f32; 256];
        synth.process(&mut out, &[NoteEvent::new(0, 57)], &[]).unwrap();
        for _ in 0..(SAMPLE_RATE as usize / 256) {
            synth.process(&mut out, &[], &[]).unwrap();
            for &s in &out {
                assert!(s.is_finite(), "{kind:?} produced non-finite output");
                assert!(s.abs() <= 4.0, "{kind:?} sample out of sane range: {s}");
            }
        }
    }
}

#[test]
fn filtered_voice_applies_lowpass() {
    let mut cfg = config(GeneratorKind::Square);
    cfg.filter = FilterConfig { kind: FilterKind::Lowpass, cutoff_hz: 200.0, resonance_db: -3.0 };
    let mut synth = Synth::new(cfg).unwrap();
    let mut out = [0.0f32; 512];
    synth.process(&mut out, &[NoteEvent::new(0, 69)], &[]).unwrap();
    assert!(out.iter().all(|s| s.is_finite()));
}

#[test]
fn unknown_note_release_is_a_no_op() {
    let mut synth = Synth::new(config(GeneratorKind::Sine)).unwrap();
    let mut out = [0.0f32; 16];
    synth.process(&mut out, &[], &[NoteEvent::new(0, 42)]).unwrap();
    assert_eq!(synth.active_voice_count(), 0);
}
