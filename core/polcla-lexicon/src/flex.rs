use polcla_protocol::LexiconEntry;

/// Collocation slots that may be filled by other inflected or negated forms.
/// Each row: the words that mark the slot, then the replacements.
const SLOTS: &[(&[&str], &[&str])] = &[
    (
        &["sich"],
        &["mich", "Mich", "dich", "Dich", "ihn", "Ihn", "es", "Es", "euch", "Euch", "Sie"],
    ),
    (
        &["seinen", "seinem"],
        &["meine", "Meine", "deine", "Deine", "ihre", "eure", "Ihre", "unsere", "Unsere"],
    ),
    (&["den"], &["einen", "dem"]),
    (&["ein"], &["kein"]),
    (&["einen"], &["keinen"]),
    (&["sein"], &["werden"]),
];

/// Variants of a multi-word entry with one slot word replaced.
/// If a slot word occurs twice only the last occurrence is varied.
pub fn alternatives<E: LexiconEntry>(entry: &E) -> Vec<E> {
    let collocations = entry.collocations();
    let mut out = Vec::new();

    for (markers, replacements) in SLOTS {
        let Some(slot) = collocations.iter().rposition(|c| markers.contains(&c.as_str())) else {
            continue;
        };

        for replacement in *replacements {
            let mut varied = collocations.to_vec();
            varied[slot] = replacement.to_string();
            out.push(entry.with_collocations(varied));
        }
    }

    out
}
