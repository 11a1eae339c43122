// Random-window sampler: corpus -> one-hot training tensors.
//
// Each sample is a contiguous window of `window_length` (Tx) symbols drawn at
// a uniformly random start offset. The window is encoded for next-symbol
// prediction in two steps:
//
//   1. Input encoding. Position 0 stays all-zero ("no prior symbol"); every
//      position j >= 1 is one-hot at the index of window[j].
//   2. Shift-by-one label derivation. targets[j - 1] = index of window[j], so
//      the label at step j - 1 is the symbol that actually occupies step j.
//
// The last label row (j = Tx - 1) has no write and stays 0, the same value an
// argmax over an all-zero one-hot row yields. That row is a boundary
// artifact, not a real label; it is kept so that batches match previously
// trained models.
//
// The one-hot width V is the number of distinct symbols in the corpus, not
// the vocabulary size. Every index the vocabulary hands out for a windowed
// symbol must fall inside [0, V).
//
// Randomness comes only from the caller's `SamplerRng`; the sampler holds no
// state between calls.

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::vocab::Vocabulary;
use jazz_improv_prng::SamplerRng;
use ndarray::{Array2, Array3, ArrayViewMut1, ArrayViewMut2};
use serde::{Deserialize, Serialize};

/// Encoded batch of `batch_size` windows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleBatch {
    /// One-hot inputs, shape `(batch_size, window_length, vocab_size)`.
    pub inputs: Array3<f32>,
    /// Next-symbol class indices, shape `(batch_size, window_length)`.
    ///
    /// The final column is always 0 (see module docs).
    pub targets: Array2<usize>,
    /// One-hot width: distinct symbols in the sampled corpus.
    pub vocab_size: usize,
}

impl SampleBatch {
    pub fn batch_size(&self) -> usize {
        self.inputs.dim().0
    }

    pub fn window_length(&self) -> usize {
        self.inputs.dim().1
    }
}

/// Draws fixed-length random windows and encodes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSampler {
    batch_size: usize,
    window_length: usize,
}

impl WindowSampler {
    pub fn new(batch_size: usize, window_length: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::invalid("batch_size must be positive"));
        }
        if window_length == 0 {
            return Err(Error::invalid("window_length must be positive"));
        }
        Ok(Self {
            batch_size,
            window_length,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Sample one batch from `corpus`.
    pub fn sample(
        &self,
        corpus: &Corpus,
        vocabulary: &Vocabulary,
        rng: &mut SamplerRng,
    ) -> Result<SampleBatch> {
        let tx = self.window_length;
        if tx > corpus.len() {
            return Err(Error::invalid(format!(
                "window_length {tx} exceeds corpus length {}",
                corpus.len()
            )));
        }
        let vocab_size = corpus.distinct_count();
        tracing::debug!(
            batch_size = self.batch_size,
            window_length = tx,
            vocab_size,
            corpus_len = corpus.len(),
            "sampling corpus windows"
        );

        let mut inputs = Array3::<f32>::zeros((self.batch_size, tx, vocab_size));
        let mut targets = Array2::<usize>::zeros((self.batch_size, tx));

        for i in 0..self.batch_size {
            let start = draw_offset(corpus.len(), tx, rng);
            let window = extract_window(corpus, start, tx)?;
            let indices = resolve_window(window, vocabulary, vocab_size)?;
            encode_inputs(&indices, inputs.index_axis_mut(ndarray::Axis(0), i));
            derive_labels(&indices, targets.row_mut(i));
        }

        Ok(SampleBatch {
            inputs,
            targets,
            vocab_size,
        })
    }
}

/// Sample `batch_size` windows of `window_length` symbols.
pub fn sample(
    corpus: &Corpus,
    vocabulary: &Vocabulary,
    batch_size: usize,
    window_length: usize,
    rng: &mut SamplerRng,
) -> Result<SampleBatch> {
    WindowSampler::new(batch_size, window_length)?.sample(corpus, vocabulary, rng)
}

/// Uniform start offset in `[0, corpus_len - window_length)`. A window that
/// spans the whole corpus has only offset 0 and draws nothing.
fn draw_offset(corpus_len: usize, window_length: usize, rng: &mut SamplerRng) -> usize {
    match corpus_len - window_length {
        0 => 0,
        n => rng.below(n),
    }
}

/// Step 1: the contiguous window starting at `start`.
pub fn extract_window(corpus: &Corpus, start: usize, window_length: usize) -> Result<&[String]> {
    corpus.window(start, window_length).ok_or_else(|| {
        Error::invalid(format!(
            "window [{start}, {start}+{window_length}) exceeds corpus length {}",
            corpus.len()
        ))
    })
}

/// Map each window symbol to its vocabulary index, checking it fits the
/// one-hot width.
fn resolve_window(
    window: &[String],
    vocabulary: &Vocabulary,
    vocab_size: usize,
) -> Result<Vec<usize>> {
    window
        .iter()
        .map(|symbol| {
            let idx = vocabulary.require_index(symbol)?;
            if idx >= vocab_size {
                return Err(Error::invalid(format!(
                    "vocabulary index {idx} for {symbol:?} exceeds symbol count {vocab_size}"
                )));
            }
            Ok(idx)
        })
        .collect()
}

/// One-hot rows for positions 1.., leaving position 0 empty.
fn encode_inputs(indices: &[usize], mut rows: ArrayViewMut2<'_, f32>) {
    for (j, &idx) in indices.iter().enumerate().skip(1) {
        rows[[j, idx]] = 1.0;
    }
}

/// Step 2: label at j - 1 is the symbol at j.
pub fn derive_labels(indices: &[usize], mut labels: ArrayViewMut1<'_, usize>) {
    for (j, &idx) in indices.iter().enumerate().skip(1) {
        labels[j - 1] = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Axis, s};

    fn abc_corpus() -> (Corpus, Vocabulary) {
        let corpus = Corpus::parse("A B C A B C A B");
        let vocab = Vocabulary::from_corpus(&corpus);
        (corpus, vocab)
    }

    /// Index of the single 1.0 in a one-hot row, or None for an empty row.
    fn hot_index(row: ndarray::ArrayView1<'_, f32>) -> Option<usize> {
        row.iter().position(|&v| v == 1.0)
    }

    #[test]
    fn scenario_shapes_and_values() {
        let (corpus, vocab) = abc_corpus();
        let mut rng = SamplerRng::new(0);
        let batch = sample(&corpus, &vocab, 2, 4, &mut rng).unwrap();
        assert_eq!(batch.inputs.dim(), (2, 4, 3));
        assert_eq!(batch.targets.dim(), (2, 4));
        assert_eq!(batch.vocab_size, 3);
        assert!(batch.targets.iter().all(|&t| t < 3));
        assert!(batch.inputs.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn scenario_windows_come_from_valid_offsets() {
        let (corpus, vocab) = abc_corpus();
        let batch = sample(&corpus, &vocab, 2, 4, &mut SamplerRng::new(0)).unwrap();
        // Every window of "ABCABCAB" is a rotation of the cycle A->B->C, so
        // each encoded successor must follow its predecessor cyclically.
        for sample in batch.inputs.axis_iter(Axis(0)) {
            let hot: Vec<usize> = (1..4).map(|j| hot_index(sample.row(j)).unwrap()).collect();
            assert_eq!(hot[1], (hot[0] + 1) % 3);
            assert_eq!(hot[2], (hot[1] + 1) % 3);
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let (corpus, vocab) = abc_corpus();
        let a = sample(&corpus, &vocab, 5, 3, &mut SamplerRng::new(0)).unwrap();
        let b = sample(&corpus, &vocab, 5, 3, &mut SamplerRng::new(0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn first_position_is_empty() {
        let (corpus, vocab) = abc_corpus();
        let batch = sample(&corpus, &vocab, 6, 4, &mut SamplerRng::new(11)).unwrap();
        assert!(batch.inputs.slice(s![.., 0, ..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn later_rows_are_one_hot() {
        let (corpus, vocab) = abc_corpus();
        let batch = sample(&corpus, &vocab, 6, 4, &mut SamplerRng::new(5)).unwrap();
        for sample in batch.inputs.axis_iter(Axis(0)) {
            for j in 1..4 {
                assert_eq!(sample.row(j).sum(), 1.0);
            }
        }
    }

    #[test]
    fn targets_are_next_symbol_of_inputs() {
        let corpus = Corpus::parse("A B B C D A C D B A");
        let vocab = Vocabulary::from_corpus(&corpus);
        let batch = sample(&corpus, &vocab, 8, 5, &mut SamplerRng::new(3)).unwrap();
        for i in 0..8 {
            for j in 0..4 {
                let next = hot_index(batch.inputs.slice(s![i, j + 1, ..])).unwrap();
                assert_eq!(batch.targets[[i, j]], next);
            }
            assert_eq!(batch.targets[[i, 4]], 0, "last label keeps the default");
        }
    }

    #[test]
    fn window_equal_to_corpus_uses_offset_zero() {
        let (corpus, vocab) = abc_corpus();
        let batch = sample(&corpus, &vocab, 3, 8, &mut SamplerRng::new(0)).unwrap();
        // Whole corpus: labels are B C A B C A B, then the 0 default.
        let expected: [usize; 8] = [1, 2, 0, 1, 2, 0, 1, 0];
        for row in batch.targets.rows() {
            assert_eq!(row.to_vec(), expected);
        }
    }

    #[test]
    fn whole_corpus_window_consumes_no_entropy() {
        let (corpus, vocab) = abc_corpus();
        let mut rng = SamplerRng::new(0);
        sample(&corpus, &vocab, 3, 8, &mut rng).unwrap();
        assert_eq!(rng, SamplerRng::new(0));
    }

    #[test]
    fn offsets_stay_below_the_last_window_start() {
        let mut rng = SamplerRng::new(0);
        let mut seen = [false; 2];
        for _ in 0..2000 {
            let start = draw_offset(5, 3, &mut rng);
            assert!(start < 2, "offset {start} reaches the last window");
            seen[start] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn last_window_is_never_sampled() {
        // Windows of "A B C D E" with Tx = 3: ABC, BCD, and CDE (never drawn).
        // Position 1 tells them apart: B, C, or D.
        let corpus = Corpus::parse("A B C D E");
        let vocab = Vocabulary::from_corpus(&corpus);
        let batch = sample(&corpus, &vocab, 2000, 3, &mut SamplerRng::new(17)).unwrap();
        let mut seen = [false; 5];
        for sample in batch.inputs.axis_iter(Axis(0)) {
            seen[hot_index(sample.row(1)).unwrap()] = true;
        }
        assert_eq!(seen, [false, true, true, false, false]);
    }

    #[test]
    fn window_longer_than_corpus_is_invalid() {
        let (corpus, vocab) = abc_corpus();
        let err = sample(&corpus, &vocab, 1, 9, &mut SamplerRng::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn zero_parameters_are_invalid() {
        assert!(matches!(
            WindowSampler::new(0, 4),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            WindowSampler::new(4, 0),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let corpus = Corpus::parse("A B Q A B");
        let vocab = Vocabulary::from_symbols(vec!["A".into(), "B".into(), "C".into()]).unwrap();
        let err = sample(&corpus, &vocab, 1, 5, &mut SamplerRng::new(0)).unwrap_err();
        assert!(matches!(err, Error::UnknownSymbol { symbol } if symbol == "Q"));
    }

    #[test]
    fn vocabulary_index_beyond_corpus_width_is_invalid() {
        let corpus = Corpus::parse("A B A B");
        let vocab =
            Vocabulary::from_symbols(vec!["X".into(), "Y".into(), "A".into(), "B".into()])
                .unwrap();
        let err = sample(&corpus, &vocab, 1, 4, &mut SamplerRng::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn extract_window_rejects_overrun() {
        let (corpus, _) = abc_corpus();
        assert_eq!(extract_window(&corpus, 5, 3).unwrap(), ["C", "A", "B"]);
        assert!(extract_window(&corpus, 6, 3).is_err());
    }

    #[test]
    fn derive_labels_shifts_by_one() {
        let mut labels = Array2::<usize>::zeros((1, 4));
        derive_labels(&[2, 0, 1, 2], labels.row_mut(0));
        assert_eq!(labels.row(0).to_vec(), [0, 1, 2, 0]);
    }

    #[test]
    fn independent_rngs_do_not_interfere() {
        let (corpus, vocab) = abc_corpus();
        let sampler = WindowSampler::new(4, 3).unwrap();
        let mut a = SamplerRng::new(21);
        let mut b = SamplerRng::new(21);
        let mut other = SamplerRng::new(99);
        let first = sampler.sample(&corpus, &vocab, &mut a).unwrap();
        sampler.sample(&corpus, &vocab, &mut other).unwrap();
        let second = sampler.sample(&corpus, &vocab, &mut b).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.batch_size(), 4);
        assert_eq!(first.window_length(), 3);
    }
}
