//! Readers for the flat-file inputs: ParZu CoNLL dependency parses,
//! bracketed constituency trees, the lexicon line formats and preset
//! expression positions.

pub mod conll;
pub mod error;
pub mod lexicon;
pub mod preset;
pub mod tree;

pub use conll::{read_conll, ConllRow, ConllSentence};
pub use error::{ReadError, Result};
pub use lexicon::{parse_lexicons, read_sentiment_rows, read_shifter_rows};
pub use preset::read_preset_expressions;
pub use tree::{parse_tree, read_trees};
