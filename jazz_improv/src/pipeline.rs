// Chord-set-by-chord-set generation of a timed score.
//
// For each chord set the model is asked for a sequence of indices, which are
// rendered to a tone string (tones.rs) and pushed through the notation
// collaborators:
//
//   render -> prune_grammar -> unparse_grammar(chords) -> prune_notes
//          -> clean_up_notes
//
// The collaborators (grammar smoothing, grammar-to-notes unparsing, note
// pruning, clean-up) live outside this crate behind `GrammarToolkit`. This
// module only sequences them and lays the results out in time: chords are
// re-homed into their bar (`offset mod bar_length`), and every set starts
// `bar_length` beats after the previous one.
//
// Chord sets are counted as `chord_groups.len() / 3` and iterated from 1, so
// group 0 and everything from the count onward are never voiced. That is
// how the progression has always been walked; see DESIGN.md.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::tones::render_tones;
use crate::vocab::Vocabulary;
use serde::{Deserialize, Serialize};

/// What sounds at an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Note { pitch: u8 },
    Chord { pitches: Vec<u8> },
    Rest,
}

/// One timed event; `offset` and `duration` are in beats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub offset: f64,
    pub duration: f64,
    pub kind: EventKind,
}

impl ScoreEvent {
    pub fn note(offset: f64, duration: f64, pitch: u8) -> Self {
        Self {
            offset,
            duration,
            kind: EventKind::Note { pitch },
        }
    }

    pub fn chord(offset: f64, duration: f64, pitches: Vec<u8>) -> Self {
        Self {
            offset,
            duration,
            kind: EventKind::Chord { pitches },
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self.kind, EventKind::Note { .. })
    }

    /// Same event moved to `offset`.
    fn placed_at(&self, offset: f64) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }
}

/// Generated piece: events sorted by offset, plus its tempo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub tempo_bpm: u32,
    pub events: Vec<ScoreEvent>,
}

impl Score {
    pub fn note_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_note()).count()
    }
}

/// External notation collaborators.
pub trait GrammarToolkit {
    /// Smooth a rendered tone string measure-wise.
    fn prune_grammar(&self, tones: &str) -> String;

    /// Turn a tone string into concrete sounds over `chords`. Offsets in the
    /// result are relative to the start of the chord set.
    fn unparse_grammar(&self, tones: &str, chords: &[ScoreEvent]) -> Result<Vec<ScoreEvent>>;

    /// Drop repeated and too-close-together sounds.
    fn prune_notes(&self, sounds: Vec<ScoreEvent>) -> Vec<ScoreEvent>;

    /// Final quality pass over the sounds.
    fn clean_up_notes(&self, sounds: Vec<ScoreEvent>) -> Vec<ScoreEvent>;
}

/// Generate a score over `chord_groups`, asking `sample_indices` for one
/// predicted index sequence per chord set.
pub fn generate_score<T, F>(
    chord_groups: &[Vec<ScoreEvent>],
    toolkit: &T,
    vocabulary: &Vocabulary,
    config: &RenderConfig,
    mut sample_indices: F,
) -> Result<Score>
where
    T: GrammarToolkit + ?Sized,
    F: FnMut() -> Result<Vec<usize>>,
{
    config.validate()?;
    let num_sets = chord_groups.len() / 3;
    let mut events = Vec::new();
    let mut current_offset = 0.0;

    for (set, group) in chord_groups.iter().enumerate().take(num_sets).skip(1) {
        let chords: Vec<ScoreEvent> = group
            .iter()
            .map(|c| c.placed_at(c.offset.rem_euclid(config.bar_length)))
            .collect();

        let indices = sample_indices()?;
        let tones = render_tones(&indices, vocabulary, config)?;
        let tones = toolkit.prune_grammar(&tones);
        let sounds = toolkit.unparse_grammar(&tones, &chords)?;
        let sounds = toolkit.prune_notes(sounds);
        let sounds = toolkit.clean_up_notes(sounds);

        let notes = sounds.iter().filter(|s| s.is_note()).count();
        tracing::info!(set, notes, "generated sounds for chord set after pruning");

        events.extend(
            sounds
                .iter()
                .chain(chords.iter())
                .map(|e| e.placed_at(current_offset + e.offset)),
        );
        current_offset += config.bar_length;
    }

    events.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    Ok(Score {
        tempo_bpm: config.tempo_bpm,
        events,
    })
}
