use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::error::PolclaError;

/// How a shifter looks for the expression it modifies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub enum ScopeRule {
    /// Nearest candidate inside the lowest clause containing the shifter.
    Clause,
    /// Outgoing edge of the shifter with exactly this label.
    Relation(String),
    /// Outgoing edge whose label contains `objp` (first one wins).
    ObjpWildcard,
    /// Incoming `attr` edge: the shifter modifies its governor.
    AttrRev,
    /// Outgoing `det` edge to a possessive determiner (`PPOSAT`).
    Det,
    /// Any `objp-ohne` edge in the sentence.
    ObjpOhne,
    /// Governor of the negation particle. Chosen by lemma, never declared.
    NegationSpecial,
}

impl ScopeRule {
    /// Name used for logging and for the per-rule hit counters.
    pub fn name(&self) -> &str {
        match self {
            ScopeRule::Clause => "clause",
            ScopeRule::Relation(label) => label,
            ScopeRule::ObjpWildcard => "objp-*",
            ScopeRule::AttrRev => "attr-rev",
            ScopeRule::Det => "det",
            ScopeRule::ObjpOhne => "objp-ohne",
            ScopeRule::NegationSpecial => "negation",
        }
    }
}

impl fmt::Display for ScopeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScopeRule {
    type Err = PolclaError;

    /// Parses one entry of a lexicon scope list such as `subj` or `objp-*`.
    /// Plain relation labels are lowercase ASCII letters and hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('"');
        match s {
            "clause" => Ok(ScopeRule::Clause),
            "objp-*" => Ok(ScopeRule::ObjpWildcard),
            "attr-rev" => Ok(ScopeRule::AttrRev),
            "det" => Ok(ScopeRule::Det),
            "objp-ohne" => Ok(ScopeRule::ObjpOhne),
            label
                if !label.is_empty()
                    && label.starts_with(|c: char| c.is_ascii_lowercase())
                    && label.chars().all(|c| c.is_ascii_lowercase() || c == '-') =>
            {
                Ok(ScopeRule::Relation(label.to_string()))
            }
            other => Err(PolclaError::UnknownScopeRule(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_patterns() {
        assert_eq!("clause".parse::<ScopeRule>(), Ok(ScopeRule::Clause));
        assert_eq!("objp-*".parse::<ScopeRule>(), Ok(ScopeRule::ObjpWildcard));
        assert_eq!("attr-rev".parse::<ScopeRule>(), Ok(ScopeRule::AttrRev));
        assert_eq!("\"det\"".parse::<ScopeRule>(), Ok(ScopeRule::Det));
        assert_eq!("objp-ohne".parse::<ScopeRule>(), Ok(ScopeRule::ObjpOhne));
    }

    #[test]
    fn test_plain_relation() {
        assert_eq!(
            " subj ".parse::<ScopeRule>(),
            Ok(ScopeRule::Relation("subj".to_string()))
        );
        assert_eq!("objp-von".parse::<ScopeRule>().map(|r| r.name().to_string()), Ok("objp-von".to_string()));
    }

    #[test]
    fn test_unknown_rule() {
        assert!(matches!("Obj*".parse::<ScopeRule>(), Err(PolclaError::UnknownScopeRule(_))));
        assert!(matches!("".parse::<ScopeRule>(), Err(PolclaError::UnknownScopeRule(_))));
    }
}
