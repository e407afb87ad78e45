use polcla_protocol::Token;
use tracing::debug;

use crate::graph::DependencyGraph;

/// A past participle that absorbed a `werden` auxiliary with no `haben`
/// before it. `haben` first marks the future perfect (`wird gegessen haben`).
fn is_passive(graph: &DependencyGraph, token: &Token) -> bool {
    if token.pos != "VVPP" {
        return false;
    }
    for &id in &token.absorbed {
        match graph.token(id).lemma.as_str() {
            "haben" => return false,
            "werden" => return true,
            _ => {}
        }
    }
    false
}

impl DependencyGraph {
    /// Relabels the arguments of passive participles to their active roles:
    /// `subj` becomes `obja`, `objp-von`/`objp-vom` becomes `subj`.
    ///
    /// Returns the number of relabeled edges. Any graph with edges is marked
    /// passive-normalized, which lets conjunct participles share an object.
    /// A second run is a no-op.
    pub fn normalize_active_passive(&mut self) -> usize {
        if self.passive_normalized || self.edges.is_empty() {
            return 0;
        }
        self.passive_normalized = true;

        let passive: Vec<bool> = self.tokens.iter().map(|t| is_passive(self, t)).collect();
        if !passive.iter().any(|&p| p) {
            return 0;
        }

        let mut relabeled = 0;
        for edge in &mut self.edges {
            if !passive[edge.source.index()] {
                continue;
            }
            let label = match edge.label.as_str() {
                "subj" => "obja",
                "objp-von" | "objp-vom" => "subj",
                _ => continue,
            };
            edge.label = label.to_string();
            self.tokens[edge.target.index()].relation = label.to_string();
            relabeled += 1;
        }

        debug!(relabeled, "passive normalized");
        relabeled
    }
}
