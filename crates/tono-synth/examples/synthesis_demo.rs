//! Synthesis demo: generator waveforms, envelope shaping, and BLIT harmonic
//! counts.
//!
//! Run with: cargo run -p tono-synth --example synthesis_demo

use std::rc::Rc;

use tono_core::BlockProducer;
use tono_synth::{Envelope, EnvelopeParams, Generator, GeneratorKind, OscillatorKind, SineTable};

fn main() {
    let sample_rate = 48000.0;
    let table = Rc::new(SineTable::new(1024));

    // --- Generator waveforms ---
    println!("=== Generator Waveforms (440 Hz, first 10 samples) ===\n");

    let kinds = [
        ("Sine", GeneratorKind::Sine),
        ("Blit", GeneratorKind::Blit),
        ("BpBlit", GeneratorKind::BpBlit),
        ("Sawtooth", GeneratorKind::Sawtooth),
        ("Square", GeneratorKind::Square),
        ("Triangle", GeneratorKind::Triangle),
    ];

    for (name, kind) in kinds {
        let mut gen = Generator::new(kind, OscillatorKind::Recurrence, &table);
        gen.set_frequency(440.0 / sample_rate);

        let samples: Vec<f32> = (0..10).map(|_| gen.advance()).collect();
        print!("{name:<10}");
        for s in &samples {
            print!(" {s:>7.4}");
        }
        println!();
    }

    // --- BLIT harmonic count across frequency ---
    println!("\n=== BLIT Harmonic Count vs Frequency ===\n");
    println!("Freq (Hz) | Unipolar m | Bipolar m");
    println!("----------+------------+----------");
    for freq_hz in [55.0, 220.0, 440.0, 1760.0, 7040.0] {
        let f = freq_hz / sample_rate;
        let uni = tono_synth::unipolar_harmonic_count(f);
        let bi = tono_synth::bipolar_harmonic_count(2.0 * f);
        println!("{freq_hz:>9.1} | {uni:>10} | {bi:>8}");
    }

    // --- ADSR envelope shaping a held note ---
    println!("\n=== ADSR Envelope Shaping a 440 Hz Sawtooth ===\n");

    let mut gen = Generator::new(GeneratorKind::Sawtooth, OscillatorKind::Recurrence, &table);
    gen.set_frequency(440.0 / sample_rate);

    let params = EnvelopeParams::from_seconds(0.01, 0.05, -6.0, 0.1, sample_rate);
    let mut env = Envelope::new(params);
    env.press();

    let note_on_samples = (20.0 * sample_rate / 1000.0) as usize;
    let release_samples = (150.0 * sample_rate / 1000.0) as usize;

    println!("Phase    | Sample# | Env Level | Osc Out | Shaped Out");
    println!("---------+---------+-----------+---------+-----------");

    for i in 0..note_on_samples {
        let level = env.advance();
        let raw = gen.advance();
        let shaped = raw * level;
        if i % 100 == 0 {
            println!("{:<8} | {:>7} | {:>9.4} | {:>7.4} | {:>10.4}", format!("{:?}", env.state()), i, level, raw, shaped);
        }
    }

    env.release();
    println!("--- release ---");

    for i in 0..release_samples {
        let level = env.advance();
        let raw = gen.advance();
        let shaped = raw * level;
        if i % 500 == 0 {
            println!(
                "{:<8} | {:>7} | {:>9.4} | {:>7.4} | {:>10.4}",
                format!("{:?}", env.state()),
                note_on_samples + i,
                level,
                raw,
                shaped
            );
        }
    }

    println!("Final state: {:?}, level: {:.6} dB", env.state(), env.level_db());

    // --- Block-based production ---
    println!("\n=== Block Production (64-sample blocks) ===\n");

    let mut gen = Generator::new(GeneratorKind::Square, OscillatorKind::Recurrence, &table);
    gen.set_frequency(220.0 / sample_rate);
    let mut block = [0.0f32; 64];
    gen.produce(&mut block);
    let rms = (block.iter().map(|s| s * s).sum::<f32>() / block.len() as f32).sqrt();
    println!("Square @220Hz, first block RMS = {rms:.4}");

    println!("\nSynthesis demo complete.");
}
