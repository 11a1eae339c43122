// Corpus of abstract grammar values.
//
// Upstream analysis of a source composition yields one abstract grammar per
// measure: a space-separated string of values such as `C,0.250` or
// `S,0.500,<m2,P-4>`. The corpus is the flat, ordered concatenation of every
// value across all measures. It is built once and then only read; the
// sampler borrows it.
//
// On disk a corpus is plain UTF-8 text with one grammar per line. Blank lines
// and runs of spaces are ignored.

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Ordered sequence of grammar symbols.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    symbols: Vec<String>,
}

impl Corpus {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    /// Flatten per-measure grammars into one symbol sequence.
    pub fn from_grammars<S: AsRef<str>>(grammars: &[S]) -> Self {
        let symbols = grammars
            .iter()
            .flat_map(|g| g.as_ref().split(' '))
            .filter(|tok| !tok.is_empty())
            .map(str::to_owned)
            .collect();
        Self { symbols }
    }

    /// Parse corpus text: one grammar per non-blank line.
    pub fn parse(text: &str) -> Self {
        let grammars: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_grammars(&grammars)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Number of distinct symbols, i.e. the one-hot width of encoded samples.
    pub fn distinct_count(&self) -> usize {
        self.distinct_symbols().len()
    }

    /// Distinct symbols in lexicographic order.
    pub fn distinct_symbols(&self) -> BTreeSet<&str> {
        self.symbols.iter().map(String::as_str).collect()
    }

    /// Contiguous slice of `len` symbols starting at `start`, or `None` if it
    /// would run past the end.
    pub fn window(&self, start: usize, len: usize) -> Option<&[String]> {
        let end = start.checked_add(len)?;
        self.symbols.get(start..end)
    }
}

impl FromIterator<String> for Corpus {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
