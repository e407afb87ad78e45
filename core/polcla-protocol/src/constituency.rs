#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Flat description of a constituency tree as delivered by a parser adapter.
/// Children refer to node ids; terminals are listed in sentence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct TreeSpec {
    pub root: String,
    pub nonterminals: Vec<NonterminalSpec>,
    pub terminals: Vec<TerminalSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct NonterminalSpec {
    pub id: String,
    pub category: String,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub struct TerminalSpec {
    pub id: String,
    pub form: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pos: Option<String>,
}

impl TreeSpec {
    /// `ROOT -> S -> terminals`, used when no constituency parse is available.
    pub fn flat<'a>(forms: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let terminals: Vec<TerminalSpec> = forms
            .into_iter()
            .enumerate()
            .map(|(i, (form, pos))| TerminalSpec {
                id: format!("t{}", i + 1),
                form: form.to_string(),
                pos: Some(pos.to_string()),
            })
            .collect();

        let clause = NonterminalSpec {
            id: "n1".to_string(),
            category: "S".to_string(),
            children: terminals.iter().map(|t| t.id.clone()).collect(),
        };
        let root = NonterminalSpec {
            id: "n0".to_string(),
            category: "ROOT".to_string(),
            children: vec![clause.id.clone()],
        };

        Self {
            root: root.id.clone(),
            nonterminals: vec![root, clause],
            terminals,
        }
    }
}
