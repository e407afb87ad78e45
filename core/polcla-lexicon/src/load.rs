use std::collections::HashSet;

use polcla_protocol::{LexiconEntry, PolarityCategory, SentimentEntry, ShifterEntry};
use tracing::{debug, warn};

use crate::flex::alternatives;
use crate::row::{SentimentRow, ShifterRow};
use crate::table::Lexicon;

/// Builds the sentiment table.
///
/// `POS`/`NEG` rows are kept. `NEU` rows are kept only with `include_neutral`
/// and a value of exactly `0.0`. For a repeated key a later polar row replaces
/// an earlier neutral one, otherwise the first row stays.
pub fn sentiment_table(
    rows: Vec<SentimentRow>,
    include_neutral: bool,
    flexible: bool,
) -> Lexicon<SentimentEntry> {
    let mut table = Lexicon::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut neutral: HashSet<String> = HashSet::new();

    for row in rows {
        let entry = SentimentEntry::new(&row.key, row.category, row.value, row.pos.clone());

        match row.category {
            PolarityCategory::Pos | PolarityCategory::Neg => {}
            PolarityCategory::Neu if include_neutral => {
                if row.value != 0.0 {
                    warn!(line = row.line, key = %row.key, value = row.value, "neutral row with non-zero value, skipped");
                    continue;
                }
            }
            _ => {
                debug!(line = row.line, key = %row.key, category = %row.category, "row not used");
                continue;
            }
        }

        if seen.contains(&row.key) {
            if neutral.contains(&row.key) && row.category != PolarityCategory::Neu {
                warn!(line = row.line, key = %row.key, "polar row replaces earlier neutral row");
                remove_with_variants(&mut table, &row.key);
                neutral.remove(&row.key);
            } else {
                warn!(line = row.line, key = %row.key, "duplicate row ignored");
                continue;
            }
        }

        seen.insert(row.key.clone());
        if row.category == PolarityCategory::Neu {
            neutral.insert(row.key.clone());
        }

        if flexible {
            if entry.name == "sein" {
                table.insert(entry.with_name("werden"));
            }
            for alt in alternatives(&entry) {
                table.insert(alt);
            }
        }
        table.insert(entry);
    }

    table
}

/// Builds a shifter or intensifier table. The first row of a key wins.
pub fn shifter_table(rows: Vec<ShifterRow>, flexible: bool) -> Lexicon<ShifterEntry> {
    let mut table = Lexicon::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        if !seen.insert(row.key.clone()) {
            warn!(line = row.line, key = %row.key, "duplicate row ignored");
            continue;
        }

        let entry = ShifterEntry::new(&row.key, row.kind, row.scope, row.pos);
        if flexible {
            for alt in alternatives(&entry) {
                table.insert(alt);
            }
        }
        table.insert(entry);
    }

    table
}

fn remove_with_variants(table: &mut Lexicon<SentimentEntry>, key: &str) {
    let original = table.by_key(key).cloned();
    table.remove_key(key);

    if let Some(original) = original {
        for alt in alternatives(&original) {
            table.remove_key(&alt.key());
        }
        if original.name == "sein" {
            table.remove_key(&original.with_name("werden").key());
        }
    }
}
