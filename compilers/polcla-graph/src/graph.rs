use core::fmt;

use polcla_parser::ConllRow;
use polcla_protocol::{PolclaError, Result, SentenceId, Token, TokenId};

/// A labeled dependency from governor (`source`) to dependent (`target`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: TokenId,
    pub target: TokenId,
    pub label: String,
}

impl Edge {
    pub fn new(source: TokenId, target: TokenId, label: impl Into<String>) -> Self {
        Self {
            source,
            target,
            label: label.into(),
        }
    }

    pub fn touches(&self, id: TokenId) -> bool {
        self.source == id || self.target == id
    }
}

/// Dependency graph of one sentence.
///
/// Tokens live in an arena indexed by sentence position, slot 0 being ROOT.
/// Edges are kept in insertion order; every query that picks "the first"
/// edge follows that order.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyGraph {
    sentence: SentenceId,
    pub(crate) tokens: Vec<Token>,
    pub(crate) edges: Vec<Edge>,
    /// Back-link from an absorbed token to the token that absorbed it.
    pub(crate) absorbed_by: Vec<Option<TokenId>>,
    /// Set once the active/passive pass has run over the edges.
    pub(crate) passive_normalized: bool,
}

impl DependencyGraph {
    /// Builds the graph from parser tokens given in sentence order.
    ///
    /// Fails with a structural error if ids are not consecutive from 1, a
    /// head is out of range or points at the token itself, or a token has no
    /// head chain up to ROOT.
    pub fn from_tokens(sentence: SentenceId, tokens: Vec<Token>) -> Result<Self> {
        let count = tokens.len();
        let mut arena = Vec::with_capacity(count + 1);
        arena.push(Token::root());

        for (i, token) in tokens.into_iter().enumerate() {
            let expected = TokenId::new(i as u32 + 1);
            if token.id != expected {
                return Err(PolclaError::structural(
                    sentence,
                    format!("token {} found at position {}", token.id, expected),
                ));
            }
            match token.head {
                Some(head) if head.index() > count => {
                    return Err(PolclaError::structural(
                        sentence,
                        format!("head {head} of token {} is out of range", token.id),
                    ));
                }
                Some(head) if head == token.id => {
                    return Err(PolclaError::structural(
                        sentence,
                        format!("token {} is its own head", token.id),
                    ));
                }
                Some(_) => {}
                None => {
                    return Err(PolclaError::structural(
                        sentence,
                        format!("token {} has no head", token.id),
                    ));
                }
            }
            arena.push(token);
        }

        for token in &arena[1..] {
            let mut current = token.head;
            let mut steps = 0;
            while let Some(id) = current {
                if id.is_root() {
                    break;
                }
                steps += 1;
                if steps > count {
                    return Err(PolclaError::structural(
                        sentence,
                        format!("token {} is part of a head cycle", token.id),
                    ));
                }
                current = arena[id.index()].head;
            }
        }

        let edges = arena[1..]
            .iter()
            .filter_map(|t| t.head.map(|head| Edge::new(head, t.id, t.relation.clone())))
            .collect();

        Ok(Self {
            sentence,
            absorbed_by: vec![None; arena.len()],
            tokens: arena,
            edges,
            passive_normalized: false,
        })
    }

    /// Builds the graph from CoNLL rows (head 0 is ROOT).
    pub fn from_rows(sentence: SentenceId, rows: &[ConllRow]) -> Result<Self> {
        let tokens = rows
            .iter()
            .map(|row| {
                Token::new(
                    TokenId::new(row.id),
                    row.form.as_str(),
                    row.lemma.as_str(),
                    row.pos.as_str(),
                    TokenId::new(row.head),
                    row.relation.as_str(),
                )
            })
            .collect();
        Self::from_tokens(sentence, tokens)
    }

    pub fn sentence(&self) -> SentenceId {
        self.sentence
    }

    pub fn root(&self) -> &Token {
        &self.tokens[0]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.index())
    }

    /// The sentence tokens in order, without ROOT.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[1..]
    }

    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// True once the active/passive pass has run on a graph with edges,
    /// whether or not it found a passive participle.
    pub fn is_passive_normalized(&self) -> bool {
        self.passive_normalized
    }

    /// Source of the first edge into `target` labeled `label`.
    pub fn parent(&self, target: TokenId, label: &str) -> Option<TokenId> {
        self.edges
            .iter()
            .find(|e| e.target == target && e.label == label)
            .map(|e| e.source)
    }

    /// Target of the first edge out of `source` labeled `label`.
    pub fn child(&self, source: TokenId, label: &str) -> Option<TokenId> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.label == label)
            .map(|e| e.target)
    }

    pub fn sources(&self, target: TokenId) -> Vec<TokenId> {
        self.edges
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.source)
            .collect()
    }

    pub fn targets(&self, source: TokenId) -> Vec<TokenId> {
        self.edges
            .iter()
            .filter(|e| e.source == source)
            .map(|e| e.target)
            .collect()
    }

    pub fn has_incoming(&self, target: TokenId, label: &str) -> bool {
        self.parent(target, label).is_some()
    }

    /// The live token that absorbed `id`, following absorption chains.
    /// `None` if `id` was never absorbed.
    pub fn carrier_of(&self, id: TokenId) -> Option<TokenId> {
        let mut carrier = *self.absorbed_by.get(id.index())?;
        while let Some(current) = carrier {
            match self.absorbed_by[current.index()] {
                Some(next) => carrier = Some(next),
                None => break,
            }
        }
        carrier
    }

    pub fn is_absorbed(&self, id: TokenId) -> bool {
        self.absorbed_by
            .get(id.index())
            .map_or(false, Option::is_some)
    }

    /// Adds an edge unless the same edge is already present.
    pub(crate) fn add_edge(&mut self, source: TokenId, target: TokenId, label: &str) -> bool {
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target && e.label == label)
        {
            return false;
        }
        self.edges.push(Edge::new(source, target, label));
        true
    }

    pub(crate) fn absorb(&mut self, carrier: TokenId, absorbed: TokenId) {
        self.tokens[carrier.index()].absorbed.push(absorbed);
        self.absorbed_by[absorbed.index()] = Some(carrier);
    }

    /// One `source\ttarget\tlabel` line per edge, surface forms for endpoints.
    pub fn edges_text(&self) -> String {
        let mut out = String::new();
        for edge in &self.edges {
            out.push_str(&self.edge_text(edge));
            out.push('\n');
        }
        out
    }

    pub fn edge_text(&self, edge: &Edge) -> String {
        format!(
            "{}\t{}\t{}",
            self.token(edge.source).form,
            self.token(edge.target).form,
            edge.label
        )
    }
}

impl fmt::Display for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.edges_text())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// (form, lemma, pos, head, relation) with 1-based positions.
    pub(crate) fn graph(rows: &[(&str, &str, &str, u32, &str)]) -> DependencyGraph {
        let tokens = rows
            .iter()
            .enumerate()
            .map(|(i, (form, lemma, pos, head, rel))| {
                Token::new(TokenId(i as u32 + 1), *form, *lemma, *pos, TokenId(*head), *rel)
            })
            .collect();
        DependencyGraph::from_tokens(SentenceId(1), tokens).expect("valid test graph")
    }

    pub(crate) fn has_edge(g: &DependencyGraph, source: &str, target: &str, label: &str) -> bool {
        g.edges().iter().any(|e| {
            g.token(e.source).form == source && g.token(e.target).form == target && e.label == label
        })
    }

    #[test]
    fn test_edges_from_heads() {
        let g = graph(&[
            ("Das", "die", "ART", 2, "det"),
            ("Auto", "Auto", "NN", 3, "subj"),
            ("ist", "sein", "VAFIN", 0, "root"),
        ]);

        assert_eq!(g.edges().len(), 3);
        assert!(has_edge(&g, "root", "ist", "root"));
        assert_eq!(g.parent(TokenId(2), "subj"), Some(TokenId(3)));
        assert_eq!(g.child(TokenId(3), "subj"), Some(TokenId(2)));
        assert_eq!(g.sources(TokenId(1)), vec![TokenId(2)]);
        assert_eq!(g.edges_text().lines().next(), Some("Auto\tDas\tdet"));
    }

    #[test]
    fn test_structural_errors() {
        let cycle = vec![
            Token::new(TokenId(1), "a", "a", "NN", TokenId(2), "x"),
            Token::new(TokenId(2), "b", "b", "NN", TokenId(1), "y"),
        ];
        assert!(matches!(
            DependencyGraph::from_tokens(SentenceId(4), cycle),
            Err(PolclaError::Structural { .. })
        ));

        let out_of_range = vec![Token::new(TokenId(1), "a", "a", "NN", TokenId(5), "x")];
        assert!(DependencyGraph::from_tokens(SentenceId(4), out_of_range).is_err());

        let self_head = vec![Token::new(TokenId(1), "a", "a", "NN", TokenId(1), "x")];
        assert!(DependencyGraph::from_tokens(SentenceId(4), self_head).is_err());

        let gap = vec![Token::new(TokenId(2), "a", "a", "NN", TokenId(0), "root")];
        assert!(DependencyGraph::from_tokens(SentenceId(4), gap).is_err());
    }

    #[test]
    fn test_carrier_chain() {
        let mut g = graph(&[("a", "a", "X", 0, "root"), ("b", "b", "X", 1, "x"), ("c", "c", "X", 2, "y")]);
        g.absorb(TokenId(2), TokenId(3));
        g.absorb(TokenId(1), TokenId(2));

        assert_eq!(g.carrier_of(TokenId(3)), Some(TokenId(1)));
        assert_eq!(g.carrier_of(TokenId(1)), None);
        assert!(g.is_absorbed(TokenId(2)));
    }
}
