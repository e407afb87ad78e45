use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::scope::ScopeRule;

/// Prior polarity class of a sentiment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PolarityCategory {
    Pos = 0,
    Neg = 1,
    Neu = 2,
    Unknown = 3,
}

impl PolarityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PolarityCategory::Pos => "POS",
            PolarityCategory::Neg => "NEG",
            PolarityCategory::Neu => "NEU",
            PolarityCategory::Unknown => "UNKNOWN",
        }
    }

    /// POS and NEG are the only classes a shifter may re-sign.
    pub fn is_polar(self) -> bool {
        matches!(self, PolarityCategory::Pos | PolarityCategory::Neg)
    }
}

impl fmt::Display for PolarityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolarityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POS" => Ok(PolarityCategory::Pos),
            "NEG" => Ok(PolarityCategory::Neg),
            "NEU" => Ok(PolarityCategory::Neu),
            "UNKNOWN" => Ok(PolarityCategory::Unknown),
            other => Err(format!("unknown polarity category '{other}'")),
        }
    }
}

/// Which polarities a shifter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum ShifterKind {
    #[cfg_attr(feature = "serde", serde(rename = "general"))]
    General = 0,
    #[cfg_attr(feature = "serde", serde(rename = "on positive"))]
    OnPositive = 1,
    #[cfg_attr(feature = "serde", serde(rename = "on negative"))]
    OnNegative = 2,
}

impl ShifterKind {
    /// Single-letter code of the lexicon files: `g`, `p`, `n`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'g' => Some(ShifterKind::General),
            'p' => Some(ShifterKind::OnPositive),
            'n' => Some(ShifterKind::OnNegative),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ShifterKind::General => 'g',
            ShifterKind::OnPositive => 'p',
            ShifterKind::OnNegative => 'n',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShifterKind::General => "general",
            ShifterKind::OnPositive => "on positive",
            ShifterKind::OnNegative => "on negative",
        }
    }
}

impl fmt::Display for ShifterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse word class a lexicon row is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub enum LexiconPos {
    Nomen,
    Verb,
    Adj,
    Adv,
    Appr,
    Ptkneg,
    Other(String),
}

impl LexiconPos {
    pub fn parse(s: &str) -> Self {
        match s {
            "nomen" => LexiconPos::Nomen,
            "verben" | "verb" => LexiconPos::Verb,
            "adj" => LexiconPos::Adj,
            "adv" => LexiconPos::Adv,
            "appr" => LexiconPos::Appr,
            "ptkneg" => LexiconPos::Ptkneg,
            other => LexiconPos::Other(other.to_string()),
        }
    }

    /// Does an STTS tag fit this class when looking up a subjective expression?
    pub fn admits_sentiment_tag(&self, tag: &str) -> bool {
        match self {
            LexiconPos::Nomen => tag.starts_with('N'),
            LexiconPos::Verb => tag.starts_with('V'),
            LexiconPos::Adj => tag.starts_with('A'),
            _ => false,
        }
    }

    /// Does an STTS tag fit this class when looking up a shifter?
    /// `PTKNEG` is accepted for every class.
    pub fn admits_shifter_tag(&self, tag: &str) -> bool {
        if tag == "PTKNEG" {
            return true;
        }
        match self {
            LexiconPos::Nomen => tag.starts_with('N') || tag == "PIS",
            LexiconPos::Adj => tag.starts_with("ADJ"),
            LexiconPos::Adv => tag.starts_with("ADV"),
            LexiconPos::Verb => tag.starts_with('V'),
            LexiconPos::Appr => tag == "APPR",
            _ => false,
        }
    }
}

impl fmt::Display for LexiconPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconPos::Nomen => f.write_str("nomen"),
            LexiconPos::Verb => f.write_str("verb"),
            LexiconPos::Adj => f.write_str("adj"),
            LexiconPos::Adv => f.write_str("adv"),
            LexiconPos::Appr => f.write_str("appr"),
            LexiconPos::Ptkneg => f.write_str("ptkneg"),
            LexiconPos::Other(s) => f.write_str(s),
        }
    }
}

/// Splits an underscore-joined lexicon key into head name and collocations.
/// `aus_der_Haut_fahren` becomes (`fahren`, [`aus`, `der`, `Haut`]).
pub fn split_key(key: &str) -> (String, Vec<String>) {
    let mut parts: Vec<String> = key.split('_').map(str::to_string).collect();
    let name = parts.pop().unwrap_or_default();
    (name, parts)
}

/// Common view over the three lexicon tables.
pub trait LexiconEntry: Clone {
    fn name(&self) -> &str;
    fn collocations(&self) -> &[String];
    fn pos(&self) -> &LexiconPos;
    fn with_collocations(&self, collocations: Vec<String>) -> Self;
    fn with_name(&self, name: &str) -> Self;

    fn is_mwe(&self) -> bool {
        !self.collocations().is_empty()
    }

    /// The key as written in the lexicon file.
    fn key(&self) -> String {
        let mut key = String::new();
        for part in self.collocations() {
            key.push_str(part);
            key.push('_');
        }
        key.push_str(self.name());
        key
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct SentimentEntry {
    pub name: String,
    pub collocations: Vec<String>,
    pub category: PolarityCategory,
    pub value: f64,
    pub pos: LexiconPos,
}

impl SentimentEntry {
    pub fn new(key: &str, category: PolarityCategory, value: f64, pos: LexiconPos) -> Self {
        let (name, collocations) = split_key(key);
        Self {
            name,
            collocations,
            category,
            value,
            pos,
        }
    }
}

impl LexiconEntry for SentimentEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn collocations(&self) -> &[String] {
        &self.collocations
    }

    fn pos(&self) -> &LexiconPos {
        &self.pos
    }

    fn with_collocations(&self, collocations: Vec<String>) -> Self {
        Self {
            collocations,
            ..self.clone()
        }
    }

    fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }
}

/// A shifter row. Intensifier rows share the same shape.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ShifterEntry {
    pub name: String,
    pub collocations: Vec<String>,
    pub kind: ShifterKind,
    pub scope: Vec<ScopeRule>,
    pub pos: LexiconPos,
}

impl ShifterEntry {
    pub fn new(key: &str, kind: ShifterKind, scope: Vec<ScopeRule>, pos: LexiconPos) -> Self {
        let (name, collocations) = split_key(key);
        Self {
            name,
            collocations,
            kind,
            scope,
            pos,
        }
    }
}

impl LexiconEntry for ShifterEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn collocations(&self) -> &[String] {
        &self.collocations
    }

    fn pos(&self) -> &LexiconPos {
        &self.pos
    }

    fn with_collocations(&self, collocations: Vec<String>) -> Self {
        Self {
            collocations,
            ..self.clone()
        }
    }

    fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }
}

pub type IntensifierEntry = ShifterEntry;

/// The three tables as one unit, the payload of a compiled lexicon archive.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct LexiconBundle {
    pub version: u32,
    pub sentiments: Vec<SentimentEntry>,
    pub shifters: Vec<ShifterEntry>,
    pub intensifiers: Vec<IntensifierEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key() {
        let (name, coll) = split_key("aus_der_Haut_fahren");
        assert_eq!(name, "fahren");
        assert_eq!(coll, vec!["aus", "der", "Haut"]);

        let (name, coll) = split_key("schlecht");
        assert_eq!(name, "schlecht");
        assert!(coll.is_empty());
    }

    #[test]
    fn test_entry_key_round_trip() {
        let entry = SentimentEntry::new("sich_freuen", PolarityCategory::Pos, 0.7, LexiconPos::Verb);
        assert!(entry.is_mwe());
        assert_eq!(entry.key(), "sich_freuen");
    }

    #[test]
    fn test_shifter_tag_admission() {
        assert!(LexiconPos::Nomen.admits_shifter_tag("PIS"));
        assert!(LexiconPos::Adj.admits_shifter_tag("ADJD"));
        assert!(!LexiconPos::Adj.admits_shifter_tag("ADV"));
        assert!(LexiconPos::Verb.admits_shifter_tag("PTKNEG"));
        assert!(LexiconPos::Appr.admits_shifter_tag("APPR"));
        assert!(!LexiconPos::Appr.admits_shifter_tag("APPRART"));
    }

    #[test]
    fn test_sentiment_tag_admission() {
        assert!(LexiconPos::Adj.admits_sentiment_tag("ADJD"));
        assert!(LexiconPos::Adj.admits_sentiment_tag("ADV"));
        assert!(LexiconPos::Verb.admits_sentiment_tag("VVPP"));
        assert!(!LexiconPos::Nomen.admits_sentiment_tag("VVFIN"));
    }
}
