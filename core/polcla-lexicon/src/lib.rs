//! In-memory sentiment, shifter and intensifier tables.

pub mod flex;
pub mod load;
pub mod lookup;
pub mod row;
pub mod table;

use polcla_protocol::{
    AnnotatorFlags, IntensifierEntry, LexiconBundle, SentimentEntry, ShifterEntry,
};
use tracing::info;

pub use flex::alternatives;
pub use load::{sentiment_table, shifter_table};
pub use lookup::{lookup, LookupKind};
pub use row::{SentimentRow, ShifterRow};
pub use table::Lexicon;

/// Archive layout version written by `to_bundle`.
pub const BUNDLE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct Lexicons {
    pub sentiments: Lexicon<SentimentEntry>,
    pub shifters: Lexicon<ShifterEntry>,
    pub intensifiers: Lexicon<IntensifierEntry>,
}

impl Lexicons {
    /// Builds the tables from rows read off the flat lexicon files.
    pub fn from_rows(
        sentiment: Vec<SentimentRow>,
        shifter: Vec<ShifterRow>,
        intensifier: Option<Vec<ShifterRow>>,
        flags: AnnotatorFlags,
    ) -> Self {
        let flexible = flags.contains(AnnotatorFlags::FLEXIBLE_MWES);
        let include_neutral = flags.contains(AnnotatorFlags::INCLUDE_NEUTRAL);

        let lexicons = Self {
            sentiments: sentiment_table(sentiment, include_neutral, flexible),
            shifters: shifter_table(shifter, flexible),
            intensifiers: intensifier
                .map(|rows| shifter_table(rows, flexible))
                .unwrap_or_default(),
        };

        info!(
            sentiments = lexicons.sentiments.len(),
            shifters = lexicons.shifters.len(),
            intensifiers = lexicons.intensifiers.len(),
            "lexicons loaded"
        );
        lexicons
    }

    /// Entries are stored already expanded, so loading does not expand again.
    pub fn from_bundle(bundle: LexiconBundle) -> Self {
        Self {
            sentiments: bundle.sentiments.into_iter().collect(),
            shifters: bundle.shifters.into_iter().collect(),
            intensifiers: bundle.intensifiers.into_iter().collect(),
        }
    }

    pub fn to_bundle(&self) -> LexiconBundle {
        LexiconBundle {
            version: BUNDLE_VERSION,
            sentiments: self.sentiments.entries().to_vec(),
            shifters: self.shifters.entries().to_vec(),
            intensifiers: self.intensifiers.entries().to_vec(),
        }
    }

    /// First sentiment entry named `name`, as used for polarity values.
    pub fn sentiment(&self, name: &str) -> Option<&SentimentEntry> {
        self.sentiments.first(name)
    }

    pub fn shifter(&self, name: &str) -> Option<&ShifterEntry> {
        self.shifters.first(name)
    }

    pub fn intensifier(&self, name: &str) -> Option<&IntensifierEntry> {
        self.intensifiers.first(name)
    }
}
