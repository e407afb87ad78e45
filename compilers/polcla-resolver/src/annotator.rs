use polcla_graph::MweMatcher;
use polcla_lexicon::{lookup, LookupKind, Lexicons};
use polcla_parser::{ConllRow, ConllSentence};
use polcla_protocol::{
    AnnotatorFlags, ExpressionAnnotation, LexiconEntry, Polarity, SentenceAnnotation, SentenceId,
    ShifterMark, TokenId, TreeSpec,
};
use tracing::{debug, warn};

use crate::candidate::{Candidate, ShifterHit};
use crate::hits::RuleHits;
use crate::sentence::ParsedSentence;
use crate::shift::shift;
use crate::strategy::{ShifterResolver, Strategy};

/// Runs lookup, resolution and shifting sentence by sentence and keeps the
/// scope-rule counters across the corpus.
pub struct SentenceAnnotator<'l> {
    lexicons: &'l Lexicons,
    /// Tried in order for every shifter.
    strategies: Vec<Strategy>,
    flags: AnnotatorFlags,
    /// Expression positions per sentence, indexed by sentence id - 1.
    presets: Option<Vec<Vec<u32>>>,
    hits: RuleHits,
}

impl<'l> SentenceAnnotator<'l> {
    pub fn new(lexicons: &'l Lexicons, strategies: Vec<Strategy>, flags: AnnotatorFlags) -> Self {
        Self {
            lexicons,
            strategies,
            flags,
            presets: None,
            hits: RuleHits::default(),
        }
    }

    /// Restricts subjective expressions to the given positions. A sentence
    /// without a preset line gets no expressions.
    pub fn with_presets(mut self, presets: Vec<Vec<u32>>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn hits(&self) -> &RuleHits {
        &self.hits
    }

    /// Annotates one sentence as read from the CoNLL file. A sentence with
    /// a malformed row yields an empty record carrying the read error.
    pub fn annotate_conll(&mut self, id: SentenceId, sentence: &ConllSentence, tree: Option<TreeSpec>) -> SentenceAnnotation {
        match &sentence.error {
            Some(err) => failed(id, &sentence.rows, err.to_string()),
            None => self.annotate_parse(id, &sentence.rows, tree),
        }
    }

    /// Annotates one parsed sentence. A structural fault yields an empty
    /// record carrying the error message.
    pub fn annotate_parse(&mut self, id: SentenceId, rows: &[ConllRow], tree: Option<TreeSpec>) -> SentenceAnnotation {
        match ParsedSentence::from_parse(id, rows, tree, self.flags) {
            Ok(sentence) => self.annotate(&sentence),
            Err(err) => failed(id, rows, err.to_string()),
        }
    }

    pub fn annotate(&mut self, sentence: &ParsedSentence) -> SentenceAnnotation {
        let lexicons = self.lexicons;
        let graph = &sentence.graph;
        let matcher = MweMatcher::new(graph);
        let pos_sentiment = self.flags.contains(AnnotatorFlags::POS_LOOKUP_SENTIMENT);
        let pos_shifter = self.flags.contains(AnnotatorFlags::POS_LOOKUP_SHIFTER);

        let mut candidates = Vec::new();
        let mut shifters = Vec::new();
        for token in graph.tokens() {
            let shifter = lookup(&lexicons.shifters, token, LookupKind::Shifter, pos_shifter, |e| {
                !e.is_mwe() || matcher.is_match(token.id, e)
            });
            if let Some(entry) = shifter {
                shifters.push(ShifterHit { token: token.id, entry });
            }

            let sentiment = lookup(&lexicons.sentiments, token, LookupKind::Sentiment, pos_sentiment, |e| {
                !e.is_mwe() || matcher.is_match(token.id, e)
            });
            if let Some(entry) = sentiment {
                candidates.push(Candidate { token: token.id, entry });
            }
        }

        if let Some(presets) = &self.presets {
            let preset = sentence
                .id
                .index()
                .checked_sub(1)
                .and_then(|i| presets.get(i))
                .map(Vec::as_slice)
                .unwrap_or_default();
            retain_presets(sentence, &mut candidates, preset);
        }

        let mut record = SentenceAnnotation::empty(sentence.id, sentence.text());
        let mut sum = 0.0;

        for hit in &shifters {
            let Some(resolution) = self.strategies.as_slice().resolve(hit, &candidates, sentence) else {
                continue;
            };
            let Some(index) = candidates.iter().position(|c| c.token == resolution.target) else {
                continue;
            };
            let candidate = candidates.remove(index);
            if let Some(rule) = &resolution.rule {
                self.hits.record(rule);
            }

            let shifted = shift(hit.entry.kind, candidate.polarity());
            sum += shifted.contribution;

            let (positions, text) = span(sentence, &matcher, hit.token, hit.entry);
            let mark = ShifterMark {
                positions,
                text,
                kind: hit.entry.kind,
            };
            record
                .expressions
                .push(expression(sentence, &matcher, &candidate, Some(mark), Some(shifted.after)));
        }

        for candidate in &candidates {
            sum += candidate.polarity().signed();
            record
                .expressions
                .push(expression(sentence, &matcher, candidate, None, None));
        }

        record.polarity_sum = sum;
        debug!(
            sentence = %sentence.id,
            expressions = record.expressions.len(),
            polarity = %record.polarity_label(),
            "sentence annotated"
        );
        record
    }
}

fn failed(id: SentenceId, rows: &[ConllRow], error: String) -> SentenceAnnotation {
    warn!(sentence = %id, "{error}");
    let text = rows.iter().map(|r| r.form.as_str()).collect::<Vec<_>>().join(" ");
    let mut record = SentenceAnnotation::empty(id, text);
    record.error = Some(error);
    record
}

fn expression(
    sentence: &ParsedSentence,
    matcher: &MweMatcher<'_>,
    candidate: &Candidate<'_>,
    shifter: Option<ShifterMark>,
    after: Option<Polarity>,
) -> ExpressionAnnotation {
    let (target, target_text) = span(sentence, matcher, candidate.token, candidate.entry);
    ExpressionAnnotation {
        target,
        target_text,
        shifter,
        before: candidate.polarity(),
        after,
    }
}

/// Keeps the candidates a preset position points at, either directly or
/// through the separable particle of a particle verb.
fn retain_presets(sentence: &ParsedSentence, candidates: &mut Vec<Candidate<'_>>, preset: &[u32]) {
    let graph = &sentence.graph;
    candidates.retain(|c| {
        preset.contains(&c.token.0)
            || graph
                .token(c.token)
                .particle
                .map_or(false, |particle| preset.contains(&particle.0))
    });

    for &position in preset {
        let covered = candidates.iter().any(|c| {
            c.token.0 == position || graph.token(c.token).particle.map(|p| p.0) == Some(position)
        });
        if !covered {
            debug!(sentence = %sentence.id, position, "preset expression has no lexicon entry");
        }
    }
}

/// Positions and text of a trigger token together with its MWE
/// collocations and fused particle.
fn span<E: LexiconEntry>(
    sentence: &ParsedSentence,
    matcher: &MweMatcher<'_>,
    token: TokenId,
    entry: &E,
) -> (Vec<u32>, String) {
    let graph = &sentence.graph;
    let mut ids = matcher.matches(token, entry.collocations());
    ids.extend(graph.token(token).particle);
    ids.sort_unstable();
    ids.dedup();

    let text = ids
        .iter()
        .map(|&id| graph.token(id).form.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    (ids.into_iter().map(|id| id.0).collect(), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::tests::rows;
    use crate::strategy::{ClauseBaseline, WindowBaseline, WindowDirection};
    use polcla_parser::parse_lexicons;
    use polcla_protocol::PolarityCategory;

    const SENTIMENTS: &str = "schlecht NEG=0.7 adj\ngut POS=0.7 adj\nFreude POS=1.0 nomen\n";
    const SHIFTERS: &str = "nicht g [dependent] ptkneg\nVerlust p [gmod] nomen\n";

    fn lexicons() -> Lexicons {
        parse_lexicons(SENTIMENTS, SHIFTERS, None, AnnotatorFlags::default())
    }

    fn das_auto() -> Vec<ConllRow> {
        rows(&[
            ("Das", "die", "ART", 2, "det"),
            ("Auto", "Auto", "NN", 3, "subj"),
            ("ist", "sein", "VAFIN", 0, "root"),
            ("nicht", "nicht", "PTKNEG", 5, "adv"),
            ("schlecht", "schlecht", "ADJD", 3, "pred"),
        ])
    }

    #[test]
    fn test_negated_negative_sentence() {
        let lex = lexicons();
        let mut annotator = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());

        let record = annotator.annotate_parse(SentenceId(1), &das_auto(), None);

        assert!(record.error.is_none());
        assert_eq!(record.expressions.len(), 1);
        let expression = &record.expressions[0];
        assert_eq!(expression.target, vec![5]);
        assert_eq!(expression.target_text, "schlecht");
        assert_eq!(expression.before.category, PolarityCategory::Neg);

        let after = expression.after.expect("expression is shifted");
        assert_eq!(after.category, PolarityCategory::Pos);
        assert!((after.value - 0.6).abs() < 1e-9);

        let shifter = expression.shifter.as_ref().expect("shifter mark");
        assert_eq!(shifter.positions, vec![4]);
        assert_eq!(shifter.text, "nicht");

        assert_eq!(record.polarity_label(), "0.60");
        assert_eq!(annotator.hits().get("governor"), 1);
    }

    #[test]
    fn test_unshifted_sum() {
        let lex = lexicons();
        let mut annotator = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());
        let input = rows(&[
            ("Das", "die", "ART", 2, "det"),
            ("Auto", "Auto", "NN", 3, "subj"),
            ("ist", "sein", "VAFIN", 0, "root"),
            ("schlecht", "schlecht", "ADJD", 3, "pred"),
        ]);

        let record = annotator.annotate_parse(SentenceId(2), &input, None);

        assert_eq!(record.expressions.len(), 1);
        assert!(record.expressions[0].shifter.is_none());
        assert!(record.expressions[0].after.is_none());
        assert_eq!(record.polarity_label(), "-0.70");
    }

    #[test]
    fn test_structural_error_gives_empty_record() {
        let lex = lexicons();
        let mut annotator = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());
        let input = rows(&[("gut", "gut", "ADJD", 2, "root"), ("nicht", "nicht", "PTKNEG", 1, "adv")]);

        let record = annotator.annotate_parse(SentenceId(3), &input, None);

        assert!(record.expressions.is_empty());
        assert!(record.error.is_some());
        assert_eq!(record.polarity_label(), "0.00");
        assert_eq!(record.text, "gut nicht");
    }

    #[test]
    fn test_baselines_shift_the_same_target() {
        let lex = lexicons();
        let strategies = [
            Strategy::ClauseBaseline(ClauseBaseline { orientation: true }),
            Strategy::WindowBaseline(WindowBaseline {
                direction: WindowDirection::Both,
                window: 4,
                orientation: true,
            }),
        ];

        for strategy in strategies {
            let mut annotator = SentenceAnnotator::new(&lex, vec![strategy], AnnotatorFlags::default());
            let record = annotator.annotate_parse(SentenceId(1), &das_auto(), None);
            assert!(record.expressions.iter().any(|e| e.shifter.is_some() && e.target == vec![5]));
        }
    }

    #[test]
    fn test_on_positive_shifter_on_noun() {
        let lex = lexicons();
        let mut annotator = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());
        let input = rows(&[
            ("Verlust", "Verlust", "NN", 0, "root"),
            ("der", "die", "ART", 3, "det"),
            ("Freude", "Freude", "NN", 1, "gmod"),
        ]);

        let record = annotator.annotate_parse(SentenceId(4), &input, None);

        assert_eq!(record.expressions.len(), 1);
        let after = record.expressions[0].after.expect("shifted");
        assert_eq!(after.category, PolarityCategory::Neg);
        assert_eq!(record.polarity_label(), "-0.30");
        assert_eq!(annotator.hits().get("gmod"), 1);
    }

    #[test]
    fn test_window_falls_back_when_dependency_scope_misses() {
        let lex = parse_lexicons(SENTIMENTS, "nicht g [dependent] ptkneg\n", None, AnnotatorFlags::default());
        // `nicht` hangs off the verb, so the dependency scope finds no target.
        let input = rows(&[
            ("Das", "die", "ART", 2, "det"),
            ("Auto", "Auto", "NN", 3, "subj"),
            ("ist", "sein", "VAFIN", 0, "root"),
            ("nicht", "nicht", "PTKNEG", 3, "adv"),
            ("schlecht", "schlecht", "ADJD", 3, "pred"),
        ]);
        let window = Strategy::WindowBaseline(WindowBaseline {
            direction: WindowDirection::Right,
            window: 2,
            orientation: true,
        });

        let mut alone = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());
        let record = alone.annotate_parse(SentenceId(1), &input, None);
        assert!(record.expressions.iter().all(|e| e.shifter.is_none()));

        let mut chained = SentenceAnnotator::new(&lex, vec![Strategy::default(), window], AnnotatorFlags::default());
        let record = chained.annotate_parse(SentenceId(1), &input, None);
        assert_eq!(record.expressions.len(), 1);
        assert!(record.expressions[0].shifter.is_some());
        assert_eq!(record.polarity_label(), "0.60");
        assert_eq!(chained.hits().total(), 0);
    }

    #[test]
    fn test_presets_select_expressions() {
        let lex = lexicons();
        let input = rows(&[
            ("Freude", "Freude", "NN", 2, "subj"),
            ("ist", "sein", "VAFIN", 0, "root"),
            ("schlecht", "schlecht", "ADJD", 2, "pred"),
        ]);
        let mut annotator =
            SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default()).with_presets(vec![vec![3]]);

        let record = annotator.annotate_parse(SentenceId(1), &input, None);
        assert_eq!(record.expressions.len(), 1);
        assert_eq!(record.expressions[0].target, vec![3]);
        assert_eq!(record.polarity_label(), "-0.70");

        let record = annotator.annotate_parse(SentenceId(2), &input, None);
        assert!(record.expressions.is_empty());
        assert_eq!(record.polarity_label(), "0.00");
    }

    #[test]
    fn test_broken_conll_sentence_gives_error_record() {
        let lex = lexicons();
        let mut annotator = SentenceAnnotator::new(&lex, vec![Strategy::default()], AnnotatorFlags::default());
        let sentences = polcla_parser::read_conll(
            "1\tGut\tgut\tADJD\tADJD\t_\tx\troot\n\n1\tschlecht\tschlecht\tADJD\tADJD\t_\t0\troot\n",
        );

        let broken = annotator.annotate_conll(SentenceId(1), &sentences[0], None);
        assert!(broken.expressions.is_empty());
        assert!(broken.error.as_deref().is_some_and(|e| e.contains("head")));

        let next = annotator.annotate_conll(SentenceId(2), &sentences[1], None);
        assert!(next.error.is_none());
        assert_eq!(next.polarity_label(), "-0.70");
    }
}
