use crate::ids::SentenceId;
use crate::lexicon::{PolarityCategory, ShifterKind};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A polarity class together with its (unsigned) strength.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Polarity {
    pub category: PolarityCategory,
    pub value: f64,
}

impl Polarity {
    pub fn new(category: PolarityCategory, value: f64) -> Self {
        Self { category, value }
    }

    /// Contribution to the sentence sum: NEG counts negative.
    pub fn signed(&self) -> f64 {
        match self.category {
            PolarityCategory::Neg => -self.value,
            _ => self.value,
        }
    }
}

/// The shifter that re-signed an expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct ShifterMark {
    pub positions: Vec<u32>,
    pub text: String,
    pub kind: ShifterKind,
}

/// One subjective expression found in a sentence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct ExpressionAnnotation {
    /// Sentence positions of the expression, its MWE collocations and
    /// fused particle, sorted and deduplicated.
    pub target: Vec<u32>,
    pub target_text: String,
    pub shifter: Option<ShifterMark>,
    pub before: Polarity,
    /// Polarity after shifting. `None` when no shifter applied.
    pub after: Option<Polarity>,
}

/// Everything emitted for one sentence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct SentenceAnnotation {
    pub sentence: SentenceId,
    pub text: String,
    pub expressions: Vec<ExpressionAnnotation>,
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "two_decimals", deserialize_with = "from_decimal_str")
    )]
    pub polarity_sum: f64,
    pub error: Option<String>,
}

impl SentenceAnnotation {
    pub fn empty(sentence: SentenceId, text: impl Into<String>) -> Self {
        Self {
            sentence,
            text: text.into(),
            expressions: Vec::new(),
            polarity_sum: 0.0,
            error: None,
        }
    }

    /// The sentence sum as written to the corpus, e.g. `0.60`.
    pub fn polarity_label(&self) -> String {
        format!("{:.2}", self.polarity_sum)
    }
}

#[cfg(feature = "serde")]
fn two_decimals<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

#[cfg(feature = "serde")]
fn from_decimal_str<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}
