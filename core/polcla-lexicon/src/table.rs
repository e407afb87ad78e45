use std::collections::HashMap;

use polcla_protocol::LexiconEntry;

/// Entries indexed by head name. Several entries may share a name
/// (a single word plus any number of multi-word expressions).
#[derive(Debug, Clone)]
pub struct Lexicon<E> {
    entries: Vec<E>,
    by_name: HashMap<String, Vec<usize>>,
}

impl<E> Default for Lexicon<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<E: LexiconEntry> Lexicon<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: E) {
        let index = self.entries.len();
        self.by_name
            .entry(entry.name().to_string())
            .or_default()
            .push(index);
        self.entries.push(entry);
    }

    /// All entries whose head name is `name`, in insertion order.
    pub fn find_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a E> + 'a {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    pub fn first(&self, name: &str) -> Option<&E> {
        self.find_all(name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entry written as `key` in the source file.
    pub fn by_key(&self, key: &str) -> Option<&E> {
        let name = key.rsplit('_').next().unwrap_or(key);
        self.find_all(name).find(|e| e.key() == key)
    }

    /// Drops every entry spelled `key`.
    pub fn remove_key(&mut self, key: &str) {
        self.entries.retain(|e| e.key() != key);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_name.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.by_name
                .entry(entry.name().to_string())
                .or_default()
                .push(i);
        }
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: LexiconEntry> FromIterator<E> for Lexicon<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut table = Lexicon::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polcla_protocol::{LexiconPos, PolarityCategory, SentimentEntry};

    fn t(key: &str) -> SentimentEntry {
        SentimentEntry::new(key, PolarityCategory::Neg, 0.5, LexiconPos::Verb)
    }

    #[test]
    fn test_find_all_by_head() {
        let table: Lexicon<_> = vec![t("fahren"), t("aus_der_Haut_fahren"), t("gehen")]
            .into_iter()
            .collect();

        assert_eq!(table.find_all("fahren").count(), 2);
        assert_eq!(table.first("gehen").map(|e| e.key()), Some("gehen".to_string()));
        assert!(table.find_all("laufen").next().is_none());
    }

    #[test]
    fn test_remove_key_keeps_siblings() {
        let mut table: Lexicon<_> = vec![t("fahren"), t("aus_der_Haut_fahren")].into_iter().collect();
        table.remove_key("fahren");

        assert_eq!(table.len(), 1);
        assert!(table.by_key("aus_der_Haut_fahren").is_some());
        assert!(table.by_key("fahren").is_none());
    }
}
