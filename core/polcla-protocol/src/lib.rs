//! Types shared by every polcla crate.

pub mod annotation;
pub mod constituency;
pub mod error;
pub mod flags;
pub mod ids;
pub mod lexicon;
pub mod scope;
pub mod token;

pub use annotation::{ExpressionAnnotation, Polarity, SentenceAnnotation, ShifterMark};
pub use constituency::{NonterminalSpec, TerminalSpec, TreeSpec};
pub use error::{PolclaError, Result};
pub use flags::AnnotatorFlags;
pub use ids::{SentenceId, TokenId};
pub use lexicon::{
    split_key, IntensifierEntry, LexiconBundle, LexiconEntry, LexiconPos, PolarityCategory,
    SentimentEntry, ShifterEntry, ShifterKind,
};
pub use scope::ScopeRule;
pub use token::Token;
