use polcla_protocol::{LexiconEntry, LexiconPos, PolclaError, Token};
use tracing::debug;

use crate::table::Lexicon;

/// Which POS admission table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Sentiment,
    Shifter,
}

impl LookupKind {
    fn admits(self, pos: &LexiconPos, tag: &str) -> bool {
        match self {
            LookupKind::Sentiment => pos.admits_sentiment_tag(tag),
            LookupKind::Shifter => pos.admits_shifter_tag(tag),
        }
    }
}

/// Finds the entry a token triggers.
///
/// Candidates are the entries named by the lemma that `accept` lets through
/// (callers use it to reject MWE entries whose collocations are not in the
/// sentence). With `pos_lookup` the entry must also fit the token's tag; if no
/// lemma entry does, the entries under the surface form are tried.
pub fn lookup<'a, E, F>(
    table: &'a Lexicon<E>,
    token: &Token,
    kind: LookupKind,
    pos_lookup: bool,
    accept: F,
) -> Option<&'a E>
where
    E: LexiconEntry,
    F: Fn(&E) -> bool,
{
    let mut by_lemma = table.find_all(&token.lemma).filter(|e| accept(e)).peekable();

    if !pos_lookup {
        return by_lemma.next();
    }

    let first = *by_lemma.peek()?;
    if let Some(entry) = by_lemma.find(|e| kind.admits(e.pos(), &token.pos)) {
        return Some(entry);
    }

    if token.form != token.lemma {
        let by_form = table
            .find_all(&token.form)
            .filter(|e| accept(e))
            .find(|e| kind.admits(e.pos(), &token.pos));
        if by_form.is_some() {
            return by_form;
        }
    }

    let mismatch = PolclaError::LexiconMismatch {
        form: token.form.clone(),
        pos: token.pos.clone(),
        expected: first.pos().to_string(),
    };
    debug!(kind = ?kind, "{mismatch}");
    None
}
