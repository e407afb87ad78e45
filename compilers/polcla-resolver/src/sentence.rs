use polcla_graph::DependencyGraph;
use polcla_parser::ConllRow;
use polcla_protocol::{AnnotatorFlags, Result, SentenceId, TreeSpec};
use polcla_tree::ConstituencyTree;

/// A sentence ready for resolution: the normalized dependency graph and the
/// constituency tree over the same tokens. Resolvers only read it.
#[derive(Debug, Clone)]
pub struct ParsedSentence {
    pub id: SentenceId,
    pub graph: DependencyGraph,
    pub tree: ConstituencyTree,
}

impl ParsedSentence {
    /// Builds the graph from CoNLL rows, normalizes it when
    /// `AnnotatorFlags::NORMALIZE` is set, and builds the tree (flat when no
    /// constituency parse is given).
    pub fn from_parse(
        id: SentenceId,
        rows: &[ConllRow],
        tree: Option<TreeSpec>,
        flags: AnnotatorFlags,
    ) -> Result<Self> {
        let mut graph = DependencyGraph::from_rows(id, rows)?;
        if flags.contains(AnnotatorFlags::NORMALIZE) {
            graph.normalize_all()?;
        }
        let tree = polcla_tree::build(id, tree, graph.tokens())?;
        Ok(Self { id, graph, tree })
    }

    /// Surface forms joined by single spaces.
    pub fn text(&self) -> String {
        self.graph
            .tokens()
            .iter()
            .map(|t| t.form.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
