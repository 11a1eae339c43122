// Bijective symbol <-> index mapping.
//
// Index assignment follows symbol order: `from_corpus` sorts the distinct
// symbols lexicographically so the same corpus always yields the same
// indices, and `from_symbols` keeps the caller's order. The inverse mapping
// is what turns model predictions back into grammar values (see tones.rs).
//
// Serialized as the ordered symbol list, so a saved vocabulary is a plain
// JSON array and the index of each entry is its position.

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    symbols: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Vocabulary {
    /// Vocabulary over the distinct symbols of `corpus`, sorted.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let symbols: Vec<String> = corpus
            .distinct_symbols()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let indices = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        Self { symbols, indices }
    }

    /// Vocabulary with an explicit index order. Duplicate symbols would break
    /// the bijection and are rejected.
    pub fn from_symbols(symbols: Vec<String>) -> Result<Self> {
        let mut indices = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if indices.insert(symbol.clone(), i).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate vocabulary symbol {symbol:?}"
                )));
            }
        }
        Ok(Self { symbols, indices })
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

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.indices.get(symbol).copied()
    }

    pub fn symbol_at(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(String::as_str)
    }

    /// Like `index_of`, but an absent symbol is an error.
    pub fn require_index(&self, symbol: &str) -> Result<usize> {
        self.index_of(symbol).ok_or_else(|| Error::UnknownSymbol {
            symbol: symbol.to_owned(),
        })
    }

    /// Like `symbol_at`, but an out-of-range index is an error.
    pub fn require_symbol(&self, index: usize) -> Result<&str> {
        self.symbol_at(index).ok_or(Error::UnknownIndex {
            index,
            vocab_size: self.len(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = Error;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Self::from_symbols(symbols)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.symbols
    }
}
