use std::collections::BTreeMap;

use polcla_protocol::ScopeRule;
use tracing::info;

/// Relations that get their own counter; every other label counts as `other`.
const COUNTED_RELATIONS: [&str; 6] = ["subj", "obja", "gmod", "objd", "obji", "objg"];

/// How often each scope rule produced a shifter target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleHits {
    counts: BTreeMap<&'static str, usize>,
}

impl RuleHits {
    pub fn record(&mut self, rule: &ScopeRule) {
        *self.counts.entry(Self::bucket(rule)).or_default() += 1;
    }

    fn bucket(rule: &ScopeRule) -> &'static str {
        match rule {
            ScopeRule::Clause => "clause",
            ScopeRule::NegationSpecial => "governor",
            ScopeRule::ObjpWildcard => "objp",
            ScopeRule::AttrRev => "attr-rev",
            ScopeRule::Det => "det",
            ScopeRule::ObjpOhne => "objp-ohne",
            ScopeRule::Relation(label) => COUNTED_RELATIONS
                .iter()
                .find(|r| **r == label.as_str())
                .copied()
                .unwrap_or("other"),
        }
    }

    pub fn get(&self, bucket: &str) -> usize {
        self.counts.get(bucket).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn log(&self) {
        for (bucket, count) in &self.counts {
            info!(rule = bucket, hits = count, "scope rule hits");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        let mut hits = RuleHits::default();
        hits.record(&ScopeRule::Clause);
        hits.record(&ScopeRule::Relation("subj".to_string()));
        hits.record(&ScopeRule::Relation("dependent".to_string()));
        hits.record(&ScopeRule::NegationSpecial);

        assert_eq!(hits.get("clause"), 1);
        assert_eq!(hits.get("subj"), 1);
        assert_eq!(hits.get("other"), 1);
        assert_eq!(hits.get("governor"), 1);
        assert_eq!(hits.total(), 4);
    }
}
