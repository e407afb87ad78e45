use polcla_protocol::{LexiconEntry, TokenId};

use crate::graph::DependencyGraph;

/// Finds multi-word expressions as connected token sets (catenae) in a
/// normalized graph.
pub struct MweMatcher<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> MweMatcher<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    /// Tokens connected to `trigger` whose lemma or form is one of `words`,
    /// `trigger` first. If more tokens than `words.len() + 1` are found,
    /// the duplicates lying farthest from the rest are dropped.
    pub fn matches(&self, trigger: TokenId, words: &[String]) -> Vec<TokenId> {
        let mut found = self.collect(trigger, words);
        dedup(&mut found);

        let min_len = words.len() + 1;
        if found.len() > min_len {
            found = remove_distant_duplicates(self.graph, found, min_len);
        }
        found
    }

    /// True if the entry's collocations and name are all found around
    /// `trigger`, and the match is larger than the collocations alone.
    pub fn is_match<E: LexiconEntry>(&self, trigger: TokenId, entry: &E) -> bool {
        let collocations = entry.collocations();
        let found = self.matches(trigger, collocations);
        if found.len() <= collocations.len() {
            return false;
        }

        collocations
            .iter()
            .map(String::as_str)
            .chain(core::iter::once(entry.name()))
            .all(|word| found.iter().any(|&id| self.graph.token(id).matches(word)))
    }

    fn collect(&self, start: TokenId, words: &[String]) -> Vec<TokenId> {
        let mut found = vec![start];
        if words.is_empty() {
            return found;
        }

        let root = self.graph.carrier_of(start).unwrap_or(start);
        let root_token = self.graph.token(root);

        // the root and everything merged into it count as one node
        let mut matched: Vec<&str> = Vec::new();
        for &id in root_token.absorbed.iter().chain(core::iter::once(&root)) {
            let token = self.graph.token(id);
            if words.iter().any(|w| token.matches(w)) {
                found.push(id);
                matched.push(&token.lemma);
                matched.push(&token.form);
            }
        }

        let mut remaining: Vec<String> = words
            .iter()
            .filter(|w| !matched.contains(&w.as_str()))
            .cloned()
            .collect();
        let mut to_match = remaining.clone();

        let neighbors = self
            .graph
            .targets(root)
            .into_iter()
            .chain(self.graph.sources(root));

        for neighbor in neighbors {
            let token = self.graph.token(neighbor);
            let mut i = 0;
            while i < remaining.len() {
                if !token.matches(&remaining[i]) {
                    i += 1;
                    continue;
                }
                let word = remaining.remove(i);
                if let Some(pos) = to_match.iter().position(|w| *w == word) {
                    to_match.remove(pos);
                }
                found.extend(self.collect(neighbor, &to_match));
            }
        }

        found
    }
}

fn dedup(ids: &mut Vec<TokenId>) {
    let mut seen = Vec::with_capacity(ids.len());
    ids.retain(|id| {
        if seen.contains(id) {
            false
        } else {
            seen.push(*id);
            true
        }
    });
}

/// Tokens of `ids` that share a lemma or a form with another one.
fn duplicates(graph: &DependencyGraph, ids: &[TokenId]) -> Vec<TokenId> {
    ids.iter()
        .copied()
        .filter(|&a| {
            let ta = graph.token(a);
            ids.iter().any(|&b| {
                let tb = graph.token(b);
                a != b && (ta.lemma == tb.lemma || ta.form == tb.form)
            })
        })
        .collect()
}

/// Drops duplicate matches one at a time, always the one farthest from the
/// mean position of the non-duplicates, while more than `min_len` remain.
pub fn remove_distant_duplicates(
    graph: &DependencyGraph,
    mut matches: Vec<TokenId>,
    min_len: usize,
) -> Vec<TokenId> {
    dedup(&mut matches);

    while matches.len() > min_len {
        let dups = duplicates(graph, &matches);
        if dups.is_empty() {
            break;
        }

        let others: Vec<f64> = matches
            .iter()
            .filter(|id| !dups.contains(id))
            .map(|id| f64::from(id.0))
            .collect();
        if others.is_empty() {
            break;
        }
        let mean = others.iter().sum::<f64>() / others.len() as f64;

        let mut farthest = dups[0];
        let mut max = (f64::from(farthest.0) - mean).abs();
        for &dup in &dups[1..] {
            let distance = (f64::from(dup.0) - mean).abs();
            if distance > max {
                max = distance;
                farthest = dup;
            }
        }
        matches.retain(|&id| id != farthest);
    }

    matches
}
