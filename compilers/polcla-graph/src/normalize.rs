use polcla_protocol::{PolclaError, Result, TokenId};
use tracing::debug;

use crate::graph::{DependencyGraph, Edge};

/// Counts of the rewrites applied to one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub raised: usize,
    pub fused: usize,
    pub particles: usize,
    pub passive: usize,
    pub conjunctions: usize,
}

impl NormalizeReport {
    pub fn total(&self) -> usize {
        self.raised + self.fused + self.particles + self.passive + self.conjunctions
    }
}

enum Rewrite {
    Raise(TokenId),
    Fuse { edge: usize, prep: TokenId, head: TokenId },
}

fn is_raising_label(label: &str) -> bool {
    label == "pred" || label == "aux"
}

impl DependencyGraph {
    /// Rewrites the graph to its canonical argument structure.
    ///
    /// Raises predicates and auxiliaries and fuses prepositional chains until
    /// none is left, then fuses separable particles onto their verbs.
    /// Running it on a normalized graph changes nothing.
    pub fn normalize(&mut self) -> Result<NormalizeReport> {
        let mut report = NormalizeReport::default();
        // each rewrite either drops an edge or moves a pred/aux edge onto ROOT
        let limit = 2 * self.edges.len() + 1;

        while let Some(rewrite) = self.next_rewrite() {
            if report.raised + report.fused > limit {
                return Err(PolclaError::structural(
                    self.sentence(),
                    "normalization does not converge",
                ));
            }
            match rewrite {
                Rewrite::Raise(word) => {
                    self.raise(word);
                    report.raised += 1;
                }
                Rewrite::Fuse { edge, prep, head } => {
                    self.fuse(edge, prep, head);
                    report.fused += 1;
                }
            }
        }

        report.particles = self.correct_phrasal_verbs();
        Ok(report)
    }

    /// Scans the tokens in order and returns the first applicable rewrite.
    fn next_rewrite(&self) -> Option<Rewrite> {
        for token in self.tokens() {
            let word = token.id;
            if self
                .edges
                .iter()
                .any(|e| e.target == word && is_raising_label(&e.label))
            {
                return Some(Rewrite::Raise(word));
            }
            for label in ["objp", "pp"] {
                if let Some(rewrite) = self.find_prepositional_chain(word, label) {
                    return Some(rewrite);
                }
            }
        }
        None
    }

    fn find_prepositional_chain(&self, word: TokenId, label: &str) -> Option<Rewrite> {
        self.edges.iter().enumerate().find_map(|(i, edge)| {
            if edge.source != word || edge.label != label {
                return None;
            }
            self.child(edge.target, "pn").map(|head| Rewrite::Fuse {
                edge: i,
                prep: edge.target,
                head,
            })
        })
    }

    /// `word` takes over its governor: it inherits the governor's label and
    /// edges, and the governor is recorded as absorbed.
    fn raise(&mut self, word: TokenId) {
        let Some(index) = self
            .edges
            .iter()
            .position(|e| e.target == word && is_raising_label(&e.label))
        else {
            return;
        };
        let parent = self.edges[index].source;

        if parent.is_root() {
            // nothing to climb into
            self.edges[index].label = "root".to_string();
            self.tokens[word.index()].relation = "root".to_string();
            return;
        }

        let parent_relation = self.token(parent).relation.clone();
        debug!(
            word = %self.token(word).form,
            parent = %self.token(parent).form,
            "raising"
        );

        self.edges.remove(index);
        for edge in &mut self.edges {
            if edge.source == parent {
                edge.source = word;
            }
            if edge.target == parent {
                edge.target = word;
                edge.label = if edge.source.is_root() {
                    "root".to_string()
                } else {
                    parent_relation.clone()
                };
            }
        }

        self.tokens[word.index()].relation = parent_relation;
        self.absorb(word, parent);
    }

    /// `w -objp|pp-> prep -pn-> head` becomes `w -objp-<prep>-> head`.
    fn fuse(&mut self, edge: usize, prep: TokenId, head: TokenId) {
        let word = self.edges[edge].source;
        let label = format!("objp-{}", self.token(prep).form.to_lowercase());
        debug!(word = %self.token(word).form, %label, "fusing preposition");

        self.edges[edge] = Edge::new(word, head, label.clone());
        self.edges.retain(|e| !e.touches(prep));

        self.tokens[head.index()].relation = label;
        self.absorb(word, prep);
    }

    /// Prefixes the lemma of each verb with its `avz` particle.
    fn correct_phrasal_verbs(&mut self) -> usize {
        let pairs: Vec<(TokenId, TokenId)> = self
            .edges
            .iter()
            .filter(|e| e.label == "avz")
            .map(|e| (e.source, e.target))
            .collect();

        let mut fused = 0;
        for (verb, particle) in pairs {
            if self.token(verb).is_particle_verb() {
                continue;
            }
            let lemma = format!("{}{}", self.token(particle).lemma, self.token(verb).lemma);
            let token = &mut self.tokens[verb.index()];
            token.lemma = lemma;
            token.particle = Some(particle);
            fused += 1;
        }
        fused
    }

    /// True if no raising or fusion pattern is left.
    pub fn is_normalized(&self) -> bool {
        self.next_rewrite().is_none()
    }

    /// Runs the three passes in order: structural normalization,
    /// active/passive relabeling, conjunct propagation.
    pub fn normalize_all(&mut self) -> Result<NormalizeReport> {
        let mut report = self.normalize()?;
        report.passive = self.normalize_active_passive();
        report.conjunctions = self.normalize_conjunctions();
        debug!(sentence = %self.sentence(), ?report, "normalized");
        Ok(report)
    }
}
