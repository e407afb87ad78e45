use polcla_protocol::{Polarity, SentimentEntry, ShifterEntry, TokenId};

use crate::orientation::orientation_check;

/// A token that triggered a sentiment entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'l> {
    pub token: TokenId,
    pub entry: &'l SentimentEntry,
}

impl Candidate<'_> {
    /// Lexicon class and value before any shift.
    pub fn polarity(&self) -> Polarity {
        Polarity::new(self.entry.category, self.entry.value)
    }
}

/// A token that triggered a shifter entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShifterHit<'l> {
    pub token: TokenId,
    pub entry: &'l ShifterEntry,
}

impl ShifterHit<'_> {
    /// Orientation check against the candidate's matched entry. Always
    /// passes when `enabled` is false.
    pub fn accepts(&self, candidate: &Candidate<'_>, enabled: bool) -> bool {
        !enabled || orientation_check(self.entry.kind, Some(candidate.entry.category))
    }
}

/// The candidate standing at `token`, if any.
pub fn candidate_at<'a, 'l>(candidates: &'a [Candidate<'l>], token: TokenId) -> Option<&'a Candidate<'l>> {
    candidates.iter().find(|c| c.token == token)
}
