use thiserror::Error;

use crate::ids::SentenceId;

/// Failure categories shared by every stage of the pipeline.
///
/// Only `Structural` and `Configuration` ever leave a crate as hard errors.
/// The other two are produced for logging and then absorbed locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolclaError {
    #[error("sentence {sentence}: malformed parse ({details})")]
    Structural { sentence: SentenceId, details: String },

    #[error("no lexicon entry for '{form}' with POS {pos} (entry expects {expected})")]
    LexiconMismatch {
        form: String,
        pos: String,
        expected: String,
    },

    #[error("unknown scope rule '{0}'")]
    UnknownScopeRule(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl PolclaError {
    pub fn structural(sentence: SentenceId, details: impl Into<String>) -> Self {
        PolclaError::Structural {
            sentence,
            details: details.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PolclaError>;
