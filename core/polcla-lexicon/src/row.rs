use polcla_protocol::{LexiconPos, PolarityCategory, ScopeRule, ShifterKind};

/// One row of the sentiment lexicon, e.g. `fehlschlagen NEG=0.7 verben`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRow {
    pub line: usize,
    pub key: String,
    pub category: PolarityCategory,
    pub value: f64,
    pub pos: LexiconPos,
}

/// One row of the shifter or intensifier lexicon,
/// e.g. `Fehlschlag p [subj,attr-rev] nomen`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShifterRow {
    pub line: usize,
    pub key: String,
    pub kind: ShifterKind,
    pub scope: Vec<ScopeRule>,
    pub pos: LexiconPos,
}
