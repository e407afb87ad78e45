//! Constituency tree of a sentence and its clause queries.

pub mod tree;

use polcla_protocol::{PolclaError, Result, SentenceId, Token, TreeSpec};
use tracing::warn;

pub use tree::{ConstituencyTree, Node};

/// Pairs the terminals of `spec` with the parsed tokens by position and
/// fills in missing POS tags from them.
pub fn align(sentence: SentenceId, spec: &mut TreeSpec, tokens: &[Token]) -> Result<()> {
    if spec.terminals.len() != tokens.len() {
        return Err(PolclaError::structural(
            sentence,
            format!(
                "tree has {} terminals, dependency parse has {} tokens",
                spec.terminals.len(),
                tokens.len()
            ),
        ));
    }

    for (terminal, token) in spec.terminals.iter_mut().zip(tokens) {
        if terminal.form != token.form {
            warn!(
                %sentence,
                position = token.position(),
                tree = %terminal.form,
                parse = %token.form,
                "terminal and token differ"
            );
        }
        if terminal.pos.is_none() {
            terminal.pos = Some(token.pos.clone());
        }
    }
    Ok(())
}

/// Builds the tree for a sentence, falling back to a flat `ROOT -> S` tree
/// when no constituency parse is available.
pub fn build(sentence: SentenceId, spec: Option<TreeSpec>, tokens: &[Token]) -> Result<ConstituencyTree> {
    let spec = match spec {
        Some(mut spec) => {
            align(sentence, &mut spec, tokens)?;
            spec
        }
        None => TreeSpec::flat(tokens.iter().map(|t| (t.form.as_str(), t.pos.as_str()))),
    };
    ConstituencyTree::from_spec(sentence, &spec)
}
