use crate::ids::TokenId;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One parsed word of a sentence.
///
/// The identity (`id`, `form`) never changes. Normalization rewrites the
/// linguistic fields in place and records merged tokens in `absorbed`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct Token {
    pub id: TokenId,
    pub form: String,
    pub lemma: String,
    /// STTS tag, e.g. `VVPP`, `ADJD`, `PTKNEG`.
    pub pos: String,
    /// Label of the incoming dependency edge.
    pub relation: String,
    /// Governor as delivered by the parser. `None` only for ROOT.
    pub head: Option<TokenId>,
    /// Tokens merged into this one, in absorption order.
    pub absorbed: Vec<TokenId>,
    /// Separable particle fused onto this verb's lemma.
    pub particle: Option<TokenId>,
}

impl Token {
    pub fn new(
        id: TokenId,
        form: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        head: TokenId,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            form: form.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            relation: relation.into(),
            head: Some(head),
            absorbed: Vec::new(),
            particle: None,
        }
    }

    pub fn root() -> Self {
        Self {
            id: TokenId::ROOT,
            form: "root".to_string(),
            lemma: "root".to_string(),
            pos: String::new(),
            relation: String::new(),
            head: None,
            absorbed: Vec::new(),
            particle: None,
        }
    }

    /// 1-based sentence position. ROOT sits at 0.
    pub fn position(&self) -> u32 {
        self.id.0
    }

    pub fn is_particle_verb(&self) -> bool {
        self.particle.is_some()
    }

    /// True if `word` equals the lemma or the surface form.
    pub fn matches(&self, word: &str) -> bool {
        self.lemma == word || self.form == word
    }
}
