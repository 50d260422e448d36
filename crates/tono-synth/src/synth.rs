//! Polyphonic voice allocation, event dispatch and mix-down (§4.8).
//!
//! `Synth` owns a fixed-size pool of [`Voice`]s and the [`FrequencyTable`]
//! exclusively; both are read-only by every voice after construction. Event
//! dispatch happens at the granularity of the configured `block_size` — an
//! event's effect lands on the voice within one `block_size` of its
//! `sample_index`, trading per-sample dispatch precision for the ability to
//! drive each voice in batches ([`Voice::produce`]).

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::config::SynthConfig;
use crate::error::EventError;
use crate::freq_table::{FrequencyTable, MIDI_NOTE_COUNT};
use crate::oscillator::SineTable;
use crate::voice::{MAX_BLOCK_SIZE, Voice};

/// A single press or release, timestamped relative to the start of the
/// current output block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// Sample offset within the current block, `0..block_len`.
    pub sample_index: u32,
    /// MIDI note, `0..=127`.
    pub note: u8,
}

impl NoteEvent {
    /// Builds a note event.
    #[must_use]
    pub fn new(sample_index: u32, note: u8) -> Self {
        Self { sample_index, note }
    }
}

fn validate_events(events: &[NoteEvent], block_len: usize) -> Result<(), EventError> {
    let mut prev = 0u32;
    for (i, event) in events.iter().enumerate() {
        if event.note > 127 {
            return Err(EventError::InvalidNote(event.note));
        }
        if event.sample_index as usize >= block_len {
            return Err(EventError::SampleIndexOutOfRange {
                sample_index: event.sample_index,
                block_len,
            });
        }
        if i > 0 && event.sample_index < prev {
            return Err(EventError::UnsortedEvents);
        }
        prev = event.sample_index;
    }
    Ok(())
}

/// Polyphonic synthesizer: a fixed pool of voices, a frequency table, and
/// the event-driven allocator that ties them together.
#[derive(Debug, Clone)]
pub struct Synth {
    voices: Vec<Voice>,
    freq_table: FrequencyTable,
    config: SynthConfig,
    /// Absolute sample index of the start of the next block to be processed.
    stream_position: u64,
}

impl Synth {
    /// Builds a synth from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigurationError`] if any field of
    /// `config` fails validation.
    pub fn new(config: SynthConfig) -> Result<Self, crate::error::ConfigurationError> {
        config.validate()?;

        let sine_table: Rc<SineTable> = Rc::new(SineTable::new(crate::oscillator::DEFAULT_TABLE_SIZE));
        let envelope_params = config.envelope_params();
        let modulator_params = config.modulator_params();

        let mut voices = Vec::with_capacity(config.max_polyphony);
        for _ in 0..config.max_polyphony {
            voices.push(Voice::new(
                config.generator_kind,
                config.oscillator_kind,
                &sine_table,
                envelope_params,
                modulator_params,
                config.filter,
                config.sample_rate,
            ));
        }

        Ok(Self { voices, freq_table: FrequencyTable::new(config.sample_rate), config, stream_position: 0 })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// The 128-entry normalized-frequency table, for testing/inspection.
    #[must_use]
    pub fn frequency_table(&self) -> &[f32; MIDI_NOTE_COUNT] {
        self.freq_table.as_slice()
    }

    /// Number of voices currently sounding (not free).
    #[must_use]
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| !v.is_free()).count()
    }

    /// Selects a voice for a new Press, per the policy in §4.8:
    /// first idle voice in pool order; else the voice released longest ago;
    /// else the oldest voice by press time.
    fn allocate_voice(&mut self) -> usize {
        if let Some(idx) = self.voices.iter().position(Voice::is_free) {
            #[cfg(feature = "tracing")]
            tracing::trace!(voice = idx, "allocated idle voice");
            return idx;
        }

        if let Some(idx) = self
            .voices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.released_at().map(|r| (i, r)))
            .min_by_key(|&(_, released_at)| released_at)
            .map(|(i, _)| i)
        {
            #[cfg(feature = "tracing")]
            tracing::debug!(voice = idx, "stole voice released longest ago");
            return idx;
        }

        let idx = self
            .voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.pressed_at())
            .map(|(i, _)| i)
            .unwrap_or(0);
        #[cfg(feature = "tracing")]
        tracing::debug!(voice = idx, "stole oldest voice (none ever released)");
        idx
    }

    /// Finds the voice currently sounding `note`, preferring the most
    /// recently pressed if more than one somehow matches.
    fn find_voice_sounding(&self, note: u8) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_free() && v.note() == Some(note))
            .max_by_key(|(_, v)| v.pressed_at())
            .map(|(i, _)| i)
    }

    fn dispatch_press(&mut self, note: u8, absolute_sample: u64) {
        let freq = self.freq_table.get(note);
        // A Press for a note already sounding retriggers that voice rather
        // than allocating a second one for the same note.
        let idx = self.find_voice_sounding(note).unwrap_or_else(|| self.allocate_voice());
        self.voices[idx].press(note, freq, absolute_sample);
    }

    fn dispatch_release(&mut self, note: u8, absolute_sample: u64) {
        if let Some(idx) = self.find_voice_sounding(note) {
            self.voices[idx].release(absolute_sample);
        }
    }

    /// Processes one output block: dispatches `presses`/`releases` (each
    /// sorted non-decreasing by `sample_index`, relative to this block),
    /// then fills `output` with the mix of every active voice.
    ///
    /// Events are dispatched in chunks of `block_size` — an event lands on
    /// its voice within one `block_size` of its `sample_index`, not
    /// necessarily on the exact sample (§4.3).
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if either list contains an invalid note, a
    /// `sample_index` outside `0..output.len()`, or is not sorted.
    pub fn process(
        &mut self,
        output: &mut [f32],
        presses: &[NoteEvent],
        releases: &[NoteEvent],
    ) -> Result<(), EventError> {
        validate_events(presses, output.len())?;
        validate_events(releases, output.len())?;

        output.fill(0.0);
        let block_size = self.config.block_size;
        let mut press_cursor = 0usize;
        let mut release_cursor = 0usize;
        let mut scratch = [0.0f32; MAX_BLOCK_SIZE];

        let mut chunk_start = 0usize;
        while chunk_start < output.len() {
            let chunk_len = block_size.min(output.len() - chunk_start);
            let chunk_end = chunk_start + chunk_len;

            // Press-before-Release when both land in this chunk, and when
            // timestamps tie within it.
            while press_cursor < presses.len()
                && (presses[press_cursor].sample_index as usize) < chunk_end
            {
                let event = presses[press_cursor];
                self.dispatch_press(event.note, self.stream_position + event.sample_index as u64);
                press_cursor += 1;
            }
            while release_cursor < releases.len()
                && (releases[release_cursor].sample_index as usize) < chunk_end
            {
                let event = releases[release_cursor];
                self.dispatch_release(event.note, self.stream_position + event.sample_index as u64);
                release_cursor += 1;
            }

            for voice in &mut self.voices {
                if voice.is_free() {
                    continue;
                }
                voice.produce(&mut scratch[..chunk_len]);
                for (out, &s) in output[chunk_start..chunk_end].iter_mut().zip(scratch[..chunk_len].iter()) {
                    *out += s;
                }
            }

            chunk_start = chunk_end;
        }

        self.stream_position += output.len() as u64;
        Ok(())
    }
}
