use polcla_protocol::TokenId;
use tracing::debug;

use crate::graph::DependencyGraph;

fn is_conjunction(form: &str) -> bool {
    matches!(form, "und" | "oder" | "bzw.")
}

impl DependencyGraph {
    /// Copies the relation of a first conjunct onto the following conjuncts,
    /// so that `gut und günstig` both modify the same noun and
    /// `lief und stolperte` share a subject.
    ///
    /// A comma is not a parser-level conjunction, so the token after a comma
    /// is treated as the second conjunct itself.
    pub fn normalize_conjunctions(&mut self) -> usize {
        let mut added = 0;
        let mut after_comma = false;

        for position in 1..self.tokens.len() {
            let word = TokenId::new(position as u32);
            if after_comma || is_conjunction(&self.tokens[position].form) {
                added += self.propagate_conjunct(word, after_comma);
            }
            after_comma = self.tokens[position].form == ",";
        }

        if added > 0 {
            debug!(added, "conjunct edges");
        }
        added
    }

    fn propagate_conjunct(&mut self, word: TokenId, after_comma: bool) -> usize {
        let Some(first) = self.parent(word, "kon") else {
            return 0;
        };
        let second = if after_comma {
            Some(word)
        } else {
            self.child(word, "cj")
        };
        let Some(second) = second else {
            return 0;
        };

        let pos = self.token(first).pos.clone();
        if pos != self.token(second).pos {
            return 0;
        }

        match pos.as_str() {
            "ADJA" => match self.parent(first, "attr") {
                Some(noun) => usize::from(self.add_edge(noun, second, "attr")),
                None => 0,
            },
            "VVFIN" | "ADJD" | "VVPP" => {
                let mut added = 0;
                if pos == "VVPP" && self.passive_normalized {
                    if let Some(object) = self.child(first, "obja") {
                        added += usize::from(self.add_edge(second, object, "obja"));
                    }
                }
                // a conjunct with its own subject heads an independent clause
                if self.child(second, "subj").is_some() {
                    return added;
                }
                if let Some(subject) = self.child(first, "subj") {
                    added += usize::from(self.add_edge(second, subject, "subj"));
                }
                added
            }
            _ => 0,
        }
    }
}
