// Error taxonomy for the corpus, sampler, and post-processing layers.
//
// Nothing here is recoverable at this layer: callers get the error back
// unchanged, with no retries and no partial batches.

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parameters or data that cannot be sampled or indexed as given.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A corpus symbol that the vocabulary does not cover.
    #[error("symbol {symbol:?} is not in the vocabulary")]
    UnknownSymbol { symbol: String },

    /// A predicted index past the end of the vocabulary.
    #[error("index {index} is outside the vocabulary (size {vocab_size})")]
    UnknownIndex { index: usize, vocab_size: usize },

    /// Failure reported by an external notation collaborator.
    #[error("{stage} failed: {reason}")]
    Collaborator { stage: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::UnknownSymbol {
            symbol: "Q,0.500".into(),
        };
        assert_eq!(err.to_string(), "symbol \"Q,0.500\" is not in the vocabulary");

        let err = Error::UnknownIndex {
            index: 9,
            vocab_size: 3,
        };
        assert_eq!(err.to_string(), "index 9 is outside the vocabulary (size 3)");

        let err = Error::invalid("window too long");
        assert_eq!(err.to_string(), "invalid input: window too long");
    }
}
