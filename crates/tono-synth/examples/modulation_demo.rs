//! Modulation demo: the amplitude modulator, filtered voices, and
//! polyphonic event dispatch.
//!
//! Run with: cargo run -p tono-synth --example modulation_demo

use tono_core::BlockProducer;
use tono_synth::{
    EnvelopeConfig, FilterConfig, FilterKind, GeneratorKind, Modulator, ModulatorConfig,
    ModulatorParams, NoteEvent, Synth, SynthConfig,
};

fn main() {
    let sample_rate = 48000.0;

    // --- Amplitude modulator in isolation ---
    println!("=== Amplitude Modulator (5 Hz, depth 0.6) ===\n");

    let mut modulator = Modulator::new(ModulatorParams { depth: 0.6, freq_hz: 5.0 }, sample_rate);
    let mut buf = [0.0f32; 20];
    modulator.produce(&mut buf);

    println!("Sample | Gain");
    println!("-------+------");
    for (i, g) in buf.iter().enumerate() {
        if i % 2 == 0 {
            println!("{i:>6} | {g:>5.4}");
        }
    }

    // --- Depth sweep ---
    println!("\n=== Modulator Depth Sweep (min/max gain over one cycle) ===\n");
    for depth in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let mut m = Modulator::new(ModulatorParams { depth, freq_hz: 10.0 }, sample_rate);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for _ in 0..(sample_rate / 10.0) as usize {
            let g = m.advance();
            min = min.min(g);
            max = max.max(g);
        }
        println!("depth={depth:.2}  min={min:.4}  max={max:.4}");
    }

    // --- A filtered, modulated voice through the polyphonic synth ---
    println!("\n=== Filtered + Modulated Chord ===\n");

    let config = SynthConfig {
        sample_rate,
        block_size: 32,
        max_polyphony: 4,
        generator_kind: GeneratorKind::Sawtooth,
        envelope: EnvelopeConfig { attack_s: 0.02, decay_s: 0.1, sustain_db: -4.0, release_s: 0.3 },
        modulator: ModulatorConfig { depth: 0.3, freq_hz: 6.0 },
        filter: FilterConfig { kind: FilterKind::Lowpass, cutoff_hz: 1500.0, resonance_db: 2.0 },
        ..SynthConfig::default()
    };
    let mut synth = Synth::new(config).expect("valid demo config");

    let chord = [NoteEvent::new(0, 60), NoteEvent::new(0, 64), NoteEvent::new(0, 67)];
    let mut out = [0.0f32; 256];
    synth.process(&mut out, &chord, &[]).unwrap();

    println!("Active voices after chord: {}", synth.active_voice_count());
    let rms = (out.iter().map(|s| s * s).sum::<f32>() / out.len() as f32).sqrt();
    println!("First block RMS: {rms:.4}");

    for _ in 0..40 {
        synth.process(&mut out, &[], &[]).unwrap();
    }
    synth.process(&mut out, &[], &[NoteEvent::new(0, 64)]).unwrap();
    println!("Active voices after releasing one note: {}", synth.active_voice_count());

    println!("\nModulation demo complete.");
}
