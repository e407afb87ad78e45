use polcla_protocol::{ScopeRule, TokenId};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::candidate::{candidate_at, Candidate, ShifterHit};
use crate::scope::{clause_target, edge_target, effective_rules};
use crate::sentence::ParsedSentence;

/// The expression a shifter applies to, and the rule that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: TokenId,
    /// `None` for the window baseline, which uses no scope rule.
    pub rule: Option<ScopeRule>,
}

/// Finds the subjective expression a shifter modifies.
///
/// Implementations only read the sentence.
pub trait ShifterResolver {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        sentence: &ParsedSentence,
    ) -> Option<Resolution>;
}

/// Tries the scope rules declared on the shifter entry in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyScope {
    pub orientation: bool,
}

impl ShifterResolver for DependencyScope {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        sentence: &ParsedSentence,
    ) -> Option<Resolution> {
        let lemma = &sentence.graph.token(shifter.token).lemma;

        for rule in effective_rules(lemma, &shifter.entry.scope) {
            let found = match rule {
                ScopeRule::Clause => clause_target(shifter.token, candidates, sentence)
                    .filter(|c| shifter.accepts(c, self.orientation)),
                _ => edge_target(&rule, shifter.token, candidates, &sentence.graph, |c| {
                    shifter.accepts(c, self.orientation)
                }),
            };

            if let Some(candidate) = found {
                debug!(shifter = %lemma, rule = %rule, target = %candidate.token, "target found");
                return Some(Resolution {
                    target: candidate.token,
                    rule: Some(rule),
                });
            }
        }
        None
    }
}

/// Always the nearest candidate of the shifter's clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseBaseline {
    pub orientation: bool,
}

impl ShifterResolver for ClauseBaseline {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        sentence: &ParsedSentence,
    ) -> Option<Resolution> {
        clause_target(shifter.token, candidates, sentence)
            .filter(|c| shifter.accepts(c, self.orientation))
            .map(|c| Resolution {
                target: c.token,
                rule: Some(ScopeRule::Clause),
            })
    }
}

/// Side of the shifter the window baseline looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum WindowDirection {
    Left,
    Right,
    /// Alternates, right side first.
    #[default]
    Both,
}

/// First candidate within `window` tokens of the shifter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBaseline {
    pub direction: WindowDirection,
    pub window: u32,
    pub orientation: bool,
}

impl WindowBaseline {
    fn offsets(&self, origin: u32) -> Vec<u32> {
        let mut out = Vec::new();
        for i in 1..=self.window {
            let right = origin.checked_add(i);
            let left = origin.checked_sub(i).filter(|&p| p > 0);
            match self.direction {
                WindowDirection::Right => out.extend(right),
                WindowDirection::Left => out.extend(left),
                WindowDirection::Both => {
                    out.extend(right);
                    out.extend(left);
                }
            }
        }
        out
    }
}

impl ShifterResolver for WindowBaseline {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        _sentence: &ParsedSentence,
    ) -> Option<Resolution> {
        self.offsets(shifter.token.0)
            .into_iter()
            .filter_map(|position| candidate_at(candidates, TokenId(position)))
            .find(|c| shifter.accepts(c, self.orientation))
            .map(|c| Resolution {
                target: c.token,
                rule: None,
            })
    }
}

/// The strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DependencyScope(DependencyScope),
    ClauseBaseline(ClauseBaseline),
    WindowBaseline(WindowBaseline),
}

impl ShifterResolver for Strategy {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        sentence: &ParsedSentence,
    ) -> Option<Resolution> {
        match self {
            Strategy::DependencyScope(s) => s.resolve(shifter, candidates, sentence),
            Strategy::ClauseBaseline(s) => s.resolve(shifter, candidates, sentence),
            Strategy::WindowBaseline(s) => s.resolve(shifter, candidates, sentence),
        }
    }
}

/// Strategies tried in order for each shifter. The first resolution wins,
/// so a baseline listed after the dependency scope acts as its fallback.
impl ShifterResolver for [Strategy] {
    fn resolve(
        &self,
        shifter: &ShifterHit<'_>,
        candidates: &[Candidate<'_>],
        sentence: &ParsedSentence,
    ) -> Option<Resolution> {
        self.iter()
            .find_map(|strategy| strategy.resolve(shifter, candidates, sentence))
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::DependencyScope(DependencyScope { orientation: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::tests::parsed;
    use polcla_protocol::{
        AnnotatorFlags, LexiconPos, PolarityCategory, SentimentEntry, ShifterEntry, ShifterKind,
    };

    fn s(key: &str, category: PolarityCategory) -> SentimentEntry {
        SentimentEntry::new(key, category, 0.5, LexiconPos::Nomen)
    }

    fn sh(key: &str, kind: ShifterKind, scope: Vec<ScopeRule>) -> ShifterEntry {
        ShifterEntry::new(key, kind, scope, LexiconPos::Nomen)
    }

    // Angst(1) vor(2) dem(3) Verlust(4) der(5) Freude(6)
    fn verlust_sentence() -> ParsedSentence {
        parsed(
            &[
                ("Angst", "Angst", "NN", 0, "root"),
                ("vor", "vor", "APPR", 1, "pp"),
                ("dem", "die", "ART", 4, "det"),
                ("Verlust", "Verlust", "NN", 2, "pn"),
                ("der", "die", "ART", 6, "det"),
                ("Freude", "Freude", "NN", 4, "gmod"),
            ],
            AnnotatorFlags::empty(),
        )
    }

    #[test]
    fn test_dependency_scope_rule_order() {
        let sentence = verlust_sentence();
        let (angst, freude) = (s("Angst", PolarityCategory::Neg), s("Freude", PolarityCategory::Pos));
        let candidates = [
            Candidate { token: TokenId(1), entry: &angst },
            Candidate { token: TokenId(6), entry: &freude },
        ];
        let entry = sh(
            "Verlust",
            ShifterKind::OnPositive,
            vec![ScopeRule::Relation("subj".to_string()), ScopeRule::Relation("gmod".to_string())],
        );
        let hit = ShifterHit { token: TokenId(4), entry: &entry };

        let resolved = DependencyScope { orientation: true }.resolve(&hit, &candidates, &sentence);
        assert_eq!(
            resolved,
            Some(Resolution {
                target: TokenId(6),
                rule: Some(ScopeRule::Relation("gmod".to_string())),
            })
        );
    }

    #[test]
    fn test_orientation_blocks_target() {
        let sentence = verlust_sentence();
        let freude = s("Freude", PolarityCategory::Pos);
        let candidates = [Candidate { token: TokenId(6), entry: &freude }];
        let entry = sh("Verlust", ShifterKind::OnNegative, vec![ScopeRule::Relation("gmod".to_string())]);
        let hit = ShifterHit { token: TokenId(4), entry: &entry };

        assert!(DependencyScope { orientation: true }.resolve(&hit, &candidates, &sentence).is_none());
        assert!(DependencyScope { orientation: false }.resolve(&hit, &candidates, &sentence).is_some());
    }

    #[test]
    fn test_clause_baseline_ignores_scope() {
        let sentence = verlust_sentence();
        let (angst, freude) = (s("Angst", PolarityCategory::Neg), s("Freude", PolarityCategory::Pos));
        let candidates = [
            Candidate { token: TokenId(1), entry: &angst },
            Candidate { token: TokenId(6), entry: &freude },
        ];
        let entry = sh("Verlust", ShifterKind::General, vec![]);
        let hit = ShifterHit { token: TokenId(4), entry: &entry };

        let resolved = ClauseBaseline { orientation: true }.resolve(&hit, &candidates, &sentence);
        assert_eq!(resolved.map(|r| r.target), Some(TokenId(6)));
    }

    #[test]
    fn test_window_directions() {
        let sentence = verlust_sentence();
        let (angst, freude) = (s("Angst", PolarityCategory::Neg), s("Freude", PolarityCategory::Pos));
        let candidates = [
            Candidate { token: TokenId(1), entry: &angst },
            Candidate { token: TokenId(6), entry: &freude },
        ];
        let entry = sh("Verlust", ShifterKind::General, vec![]);
        let hit = ShifterHit { token: TokenId(4), entry: &entry };
        let window = |direction, window| WindowBaseline { direction, window, orientation: true };

        let target = |w: WindowBaseline| w.resolve(&hit, &candidates, &sentence).map(|r| r.target);
        assert_eq!(target(window(WindowDirection::Both, 4)), Some(TokenId(6)));
        assert_eq!(target(window(WindowDirection::Left, 4)), Some(TokenId(1)));
        assert_eq!(target(window(WindowDirection::Left, 2)), None);
        assert_eq!(target(window(WindowDirection::Right, 1)), None);
    }

    #[test]
    fn test_chain_falls_back_in_order() {
        let sentence = verlust_sentence();
        let angst = s("Angst", PolarityCategory::Neg);
        let candidates = [Candidate { token: TokenId(1), entry: &angst }];
        // gmod finds nothing negative here, the clause baseline takes over
        let entry = sh("Verlust", ShifterKind::General, vec![ScopeRule::Relation("gmod".to_string())]);
        let hit = ShifterHit { token: TokenId(4), entry: &entry };

        let chain = [
            Strategy::DependencyScope(DependencyScope { orientation: true }),
            Strategy::ClauseBaseline(ClauseBaseline { orientation: true }),
        ];
        assert_eq!(
            chain[..].resolve(&hit, &candidates, &sentence),
            Some(Resolution {
                target: TokenId(1),
                rule: Some(ScopeRule::Clause),
            })
        );
        assert!(chain[..1].resolve(&hit, &candidates, &sentence).is_none());
        assert!(<[Strategy]>::resolve(&[], &hit, &candidates, &sentence).is_none());
    }

    #[test]
    fn test_chain_prefers_first_strategy() {
        let sentence = verlust_sentence();
        let (angst, freude) = (s("Angst", PolarityCategory::Neg), s("Freude", PolarityCategory::Pos));
        let candidates = [
            Candidate { token: TokenId(1), entry: &angst },
            Candidate { token: TokenId(6), entry: &freude },
        ];
        let entry = sh("Verlust", ShifterKind::General, vec![ScopeRule::Relation("gmod".to_string())]);
        let hit = ShifterHit { token: TokenId(4), entry: &entry };
        let window = Strategy::WindowBaseline(WindowBaseline {
            direction: WindowDirection::Left,
            window: 4,
            orientation: true,
        });

        let chain = [Strategy::default(), window];
        let resolved = chain[..].resolve(&hit, &candidates, &sentence);
        assert_eq!(resolved.map(|r| r.target), Some(TokenId(6)));

        let reversed = [window, Strategy::default()];
        let resolved = reversed[..].resolve(&hit, &candidates, &sentence);
        assert_eq!(resolved.map(|r| r.target), Some(TokenId(1)));
    }

    #[test]
    fn test_window_offsets_alternate() {
        let w = WindowBaseline { direction: WindowDirection::Both, window: 2, orientation: false };
        assert_eq!(w.offsets(2), vec![3, 1, 4]);
    }
}
