//! Scope-rule dispatch over the normalized graph and the clause tree.

use std::collections::HashSet;

use polcla_graph::{DependencyGraph, Edge};
use polcla_protocol::{ScopeRule, TokenId};
use tracing::debug;

use crate::candidate::{candidate_at, Candidate};
use crate::sentence::ParsedSentence;

/// Lemma of the negation particle, which ignores its declared scopes.
pub const NEGATION_LEMMA: &str = "nicht";

/// Rules tried for a shifter, in order.
///
/// The negation particle keeps a declared `clause` rule and otherwise
/// searches its governor. Every other shifter uses its declared rules.
pub fn effective_rules(lemma: &str, declared: &[ScopeRule]) -> Vec<ScopeRule> {
    if lemma != NEGATION_LEMMA {
        return declared.to_vec();
    }

    let mut rules = Vec::new();
    for rule in declared {
        if *rule == ScopeRule::Clause {
            rules.push(ScopeRule::Clause);
        }
        if !rules.contains(&ScopeRule::NegationSpecial) {
            rules.push(ScopeRule::NegationSpecial);
        }
    }
    if rules.is_empty() {
        rules.push(ScopeRule::NegationSpecial);
    }
    rules
}

/// Nearest candidate inside the lowest `S` above the shifter (the whole
/// sentence if there is none). Ties go to the candidate earlier in the
/// sentence; the shifter itself never qualifies.
pub fn clause_target<'a, 'l>(
    shifter: TokenId,
    candidates: &'a [Candidate<'l>],
    sentence: &ParsedSentence,
) -> Option<&'a Candidate<'l>> {
    let tree = &sentence.tree;
    let clause = match tree
        .terminal_of(sentence.graph.token(shifter))
        .and_then(|terminal| tree.lowest_dominating(terminal, "S"))
    {
        Some(clause) => clause,
        None => {
            debug!(sentence = %sentence.id, %shifter, "no clause above shifter, using the whole sentence");
            tree.true_root()
        }
    };
    debug!(%shifter, clause = %tree.phrase_as_string(clause).trim_end(), "clause scope");

    let inside: HashSet<u32> = tree
        .terminals_under(clause)
        .into_iter()
        .filter_map(|terminal| tree.position(terminal))
        .collect();

    let origin = i64::from(shifter.0);
    candidates
        .iter()
        .filter(|c| c.token != shifter && inside.contains(&c.token.0))
        .map(|c| ((i64::from(c.token.0) - origin).abs(), c))
        .filter(|(distance, _)| *distance > 0)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, c)| c)
}

/// The token an edge points the shifter to under `rule`, and whether the
/// one-hop `attr` fallback may be tried from it.
fn endpoint(rule: &ScopeRule, shifter: TokenId, edge: &Edge, graph: &DependencyGraph) -> Option<(TokenId, bool)> {
    match rule {
        ScopeRule::Clause => None,
        ScopeRule::NegationSpecial => graph
            .edge_text(edge)
            .contains(NEGATION_LEMMA)
            .then_some((edge.source, true)),
        ScopeRule::ObjpWildcard => {
            (edge.source == shifter && edge.label.contains("objp")).then_some((edge.target, true))
        }
        ScopeRule::AttrRev => (edge.target == shifter && edge.label == "attr").then_some((edge.source, true)),
        ScopeRule::Det => (edge.source == shifter
            && edge.label == "det"
            && graph.token(edge.target).pos == "PPOSAT")
            .then_some((edge.target, true)),
        ScopeRule::ObjpOhne => (edge.label == "objp-ohne").then_some((edge.target, edge.source == shifter)),
        ScopeRule::Relation(label) => {
            (edge.source == shifter && edge.label == *label).then_some((edge.target, true))
        }
    }
}

/// Scans the graph edges in order for the first candidate `rule` reaches
/// from the shifter that `accept` lets through.
///
/// A direct endpoint that is a candidate but fails `accept` moves the scan
/// on to the next edge. An endpoint that is no candidate is retried through
/// its own `attr` dependent.
pub fn edge_target<'a, 'l, F>(
    rule: &ScopeRule,
    shifter: TokenId,
    candidates: &'a [Candidate<'l>],
    graph: &DependencyGraph,
    accept: F,
) -> Option<&'a Candidate<'l>>
where
    F: Fn(&Candidate<'l>) -> bool,
{
    for edge in graph.edges() {
        let Some((token, fallback)) = endpoint(rule, shifter, edge, graph) else {
            continue;
        };

        if token != shifter {
            if let Some(candidate) = candidate_at(candidates, token) {
                if accept(candidate) {
                    return Some(candidate);
                }
                continue;
            }
        }

        if !fallback {
            continue;
        }
        let attr = graph
            .child(token, "attr")
            .filter(|&attr| attr != shifter)
            .and_then(|attr| candidate_at(candidates, attr));
        if let Some(candidate) = attr.filter(|c| accept(c)) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::tests::parsed;
    use polcla_protocol::{AnnotatorFlags, LexiconPos, PolarityCategory, SentimentEntry};

    fn relation(label: &str) -> ScopeRule {
        ScopeRule::Relation(label.to_string())
    }

    fn neg(key: &str) -> SentimentEntry {
        SentimentEntry::new(key, PolarityCategory::Neg, 0.5, LexiconPos::Nomen)
    }

    #[test]
    fn test_effective_rules() {
        let declared = vec![relation("subj"), ScopeRule::AttrRev];
        assert_eq!(effective_rules("Fehlschlag", &declared), declared);

        assert_eq!(effective_rules("nicht", &declared), vec![ScopeRule::NegationSpecial]);
        assert_eq!(
            effective_rules("nicht", &[ScopeRule::Clause, relation("dependent")]),
            vec![ScopeRule::Clause, ScopeRule::NegationSpecial]
        );
        assert_eq!(effective_rules("nicht", &[]), vec![ScopeRule::NegationSpecial]);
    }

    #[test]
    fn test_clause_target_nearest_first() {
        // Ärger(1) kein(2) Problem(3) Sorge(4): both neighbours at distance 1
        let sentence = parsed(
            &[
                ("Ärger", "Ärger", "NN", 3, "app"),
                ("kein", "kein", "PIAT", 3, "det"),
                ("Problem", "Problem", "NN", 0, "root"),
                ("Sorge", "Sorge", "NN", 3, "app"),
            ],
            AnnotatorFlags::empty(),
        );
        let (e1, e3, e4) = (neg("Ärger"), neg("Problem"), neg("Sorge"));
        let candidates = [
            Candidate { token: TokenId(1), entry: &e1 },
            Candidate { token: TokenId(3), entry: &e3 },
            Candidate { token: TokenId(4), entry: &e4 },
        ];

        let found = clause_target(TokenId(2), &candidates, &sentence);
        assert_eq!(found.map(|c| c.token), Some(TokenId(1)));

        let found = clause_target(TokenId(3), &candidates, &sentence);
        assert_eq!(found.map(|c| c.token), Some(TokenId(4)));
    }

    #[test]
    fn test_clause_target_stays_in_subclause() {
        use crate::sentence::tests::rows;
        use polcla_protocol::{NonterminalSpec, SentenceId, TerminalSpec, TreeSpec};

        // Ärger(1) ,(2) weil(3) kein(4) Problem(5): the tree spells the shifter "Kein"
        let input = rows(&[
            ("Ärger", "Ärger", "NN", 0, "root"),
            (",", ",", "$,", 1, "punct"),
            ("weil", "weil", "KOUS", 5, "konjneb"),
            ("kein", "kein", "PIAT", 5, "det"),
            ("Problem", "Problem", "NN", 1, "app"),
        ]);
        let terminals = ["Ärger", ",", "weil", "Kein", "Problem"]
            .iter()
            .enumerate()
            .map(|(i, form)| TerminalSpec {
                id: format!("t{}", i + 1),
                form: form.to_string(),
                pos: None,
            })
            .collect();
        let nt = |id: &str, category: &str, children: &[&str]| NonterminalSpec {
            id: id.to_string(),
            category: category.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
        };
        let tree = TreeSpec {
            root: "n0".to_string(),
            nonterminals: vec![nt("n0", "S", &["t1", "t2", "n1"]), nt("n1", "S", &["t3", "t4", "t5"])],
            terminals,
        };
        let sentence = ParsedSentence::from_parse(SentenceId(1), &input, Some(tree), AnnotatorFlags::empty()).unwrap();

        let (e1, e5) = (neg("Ärger"), neg("Problem"));
        let candidates = [
            Candidate { token: TokenId(1), entry: &e1 },
            Candidate { token: TokenId(5), entry: &e5 },
        ];

        // the shifter sits in the subclause, the main-clause noun is out of reach
        let found = clause_target(TokenId(4), &candidates, &sentence);
        assert_eq!(found.map(|c| c.token), Some(TokenId(5)));

        let only_main = [Candidate { token: TokenId(1), entry: &e1 }];
        assert!(clause_target(TokenId(4), &only_main, &sentence).is_none());
    }

    #[test]
    fn test_relation_and_attr_fallback() {
        // Verlust(1) der(2) Hoffnung(3): Verlust -gmod-> Hoffnung
        let sentence = parsed(
            &[
                ("Verlust", "Verlust", "NN", 0, "root"),
                ("der", "die", "ART", 3, "det"),
                ("Hoffnung", "Hoffnung", "NN", 1, "gmod"),
            ],
            AnnotatorFlags::empty(),
        );
        let entry = neg("Hoffnung");
        let candidates = [Candidate { token: TokenId(3), entry: &entry }];

        let found = edge_target(&relation("gmod"), TokenId(1), &candidates, &sentence.graph, |_| true);
        assert_eq!(found.map(|c| c.token), Some(TokenId(3)));

        let rejected = edge_target(&relation("gmod"), TokenId(1), &candidates, &sentence.graph, |_| false);
        assert!(rejected.is_none());

        let wrong = edge_target(&relation("subj"), TokenId(1), &candidates, &sentence.graph, |_| true);
        assert!(wrong.is_none());
    }

    #[test]
    fn test_attr_one_hop() {
        // Mangel(1) an(2) guten(3) Ideen(4): Mangel -objp-an-> Ideen -attr-> guten
        let sentence = parsed(
            &[
                ("Mangel", "Mangel", "NN", 0, "root"),
                ("an", "an", "APPR", 1, "objp"),
                ("guten", "gut", "ADJA", 4, "attr"),
                ("Ideen", "Idee", "NN", 2, "pn"),
            ],
            AnnotatorFlags::NORMALIZE,
        );
        let entry = SentimentEntry::new("gut", PolarityCategory::Pos, 0.7, LexiconPos::Adj);
        let candidates = [Candidate { token: TokenId(3), entry: &entry }];

        let found = edge_target(&ScopeRule::ObjpWildcard, TokenId(1), &candidates, &sentence.graph, |_| true);
        assert_eq!(found.map(|c| c.token), Some(TokenId(3)));
    }

    #[test]
    fn test_attr_rev_and_det() {
        // seine(1) fehlende(2) Freude(3)
        let sentence = parsed(
            &[
                ("seine", "sein", "PPOSAT", 3, "det"),
                ("fehlende", "fehlend", "ADJA", 3, "attr"),
                ("Freude", "Freude", "NN", 0, "root"),
            ],
            AnnotatorFlags::empty(),
        );
        let entry = SentimentEntry::new("Freude", PolarityCategory::Pos, 1.0, LexiconPos::Nomen);
        let candidates = [Candidate { token: TokenId(3), entry: &entry }];

        let found = edge_target(&ScopeRule::AttrRev, TokenId(2), &candidates, &sentence.graph, |_| true);
        assert_eq!(found.map(|c| c.token), Some(TokenId(3)));

        // the det edge leaves Freude, not the shifter
        let det = edge_target(&ScopeRule::Det, TokenId(2), &candidates, &sentence.graph, |_| true);
        assert!(det.is_none());
    }

    #[test]
    fn test_negation_governor() {
        let sentence = parsed(
            &[
                ("ist", "sein", "VAFIN", 0, "root"),
                ("nicht", "nicht", "PTKNEG", 3, "adv"),
                ("gut", "gut", "ADJD", 1, "pred"),
            ],
            AnnotatorFlags::empty(),
        );
        let entry = SentimentEntry::new("gut", PolarityCategory::Pos, 0.7, LexiconPos::Adj);
        let candidates = [Candidate { token: TokenId(3), entry: &entry }];

        let found = edge_target(&ScopeRule::NegationSpecial, TokenId(2), &candidates, &sentence.graph, |_| true);
        assert_eq!(found.map(|c| c.token), Some(TokenId(3)));
    }
}
