// Jazz improvisation data layer
//
// Glue between a corpus of abstract musical grammar values and a
// next-value sequence model: the corpus goes in as one-hot training
// tensors, and the model's predicted indices come back out as a timed
// score.
//
// Architecture:
// - corpus.rs: Flat symbol corpus built from per-measure grammars
// - vocab.rs: Bijective symbol <-> index mapping (JSON persistable)
// - sampler.rs: Random fixed-length windows -> (inputs, targets, V) tensors
// - tones.rs: Predicted indices -> tone string with class substitutions
// - pipeline.rs: Per-chord-set generation through external notation
//   collaborators (`GrammarToolkit`)
// - config.rs: JSON configuration with training defaults
// - error.rs: Error taxonomy
//
// All randomness flows through an explicit `jazz_improv_prng::SamplerRng`
// owned by the caller, so output is deterministic given a seed.

pub mod config;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod sampler;
pub mod tones;
pub mod vocab;

pub use error::{Error, Result};
