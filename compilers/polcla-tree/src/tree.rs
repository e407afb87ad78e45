use core::fmt;
use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use petgraph::{Directed, Direction};
use polcla_protocol::{PolclaError, Result, SentenceId, Token, TreeSpec};

/// Categories a parser uses for the synthetic node above the sentence.
const WRAPPER_CATEGORIES: [&str; 2] = ["PSEUDO", "VROOT"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Nonterminal {
        id: String,
        category: String,
    },
    Terminal {
        id: String,
        form: String,
        pos: Option<String>,
        /// 1-based sentence position.
        position: u32,
    },
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Nonterminal { id, .. } | Node::Terminal { id, .. } => id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal { .. })
    }
}

/// Constituency tree of one sentence. Edges point from parent to child and
/// carry the child's rank among its siblings.
#[derive(Debug, Clone)]
pub struct ConstituencyTree {
    graph: Graph<Node, u32, Directed>,
    root: NodeIndex,
    terminals: Vec<NodeIndex>,
    nonterminals: Vec<NodeIndex>,
}

impl ConstituencyTree {
    /// Builds the tree from its flat description.
    ///
    /// Fails if ids repeat, a child id is unknown, a node has two parents,
    /// the structure has a cycle or a terminal is not reachable from the root.
    pub fn from_spec(sentence: SentenceId, spec: &TreeSpec) -> Result<Self> {
        let broken = |details: String| PolclaError::structural(sentence, details);

        let mut graph = Graph::new();
        let mut by_id: HashMap<&str, NodeIndex> = HashMap::new();
        let mut terminals = Vec::with_capacity(spec.terminals.len());
        let mut nonterminals = Vec::with_capacity(spec.nonterminals.len());

        for (i, t) in spec.terminals.iter().enumerate() {
            let index = graph.add_node(Node::Terminal {
                id: t.id.clone(),
                form: t.form.clone(),
                pos: t.pos.clone(),
                position: i as u32 + 1,
            });
            if by_id.insert(t.id.as_str(), index).is_some() {
                return Err(broken(format!("duplicate node id {}", t.id)));
            }
            terminals.push(index);
        }

        for nt in &spec.nonterminals {
            let index = graph.add_node(Node::Nonterminal {
                id: nt.id.clone(),
                category: nt.category.clone(),
            });
            if by_id.insert(nt.id.as_str(), index).is_some() {
                return Err(broken(format!("duplicate node id {}", nt.id)));
            }
            nonterminals.push(index);
        }

        for nt in &spec.nonterminals {
            let parent = by_id[nt.id.as_str()];
            for (rank, child_id) in nt.children.iter().enumerate() {
                let child = *by_id
                    .get(child_id.as_str())
                    .ok_or_else(|| broken(format!("unknown child {child_id} of {}", nt.id)))?;
                if graph.neighbors_directed(child, Direction::Incoming).next().is_some() {
                    return Err(broken(format!("node {child_id} has two parents")));
                }
                graph.add_edge(parent, child, rank as u32);
            }
        }

        let root = match by_id.get(spec.root.as_str()) {
            Some(&index) if !graph[index].is_terminal() => index,
            _ => return Err(broken(format!("root {} is not a nonterminal", spec.root))),
        };
        if petgraph::algo::is_cyclic_directed(&graph) {
            return Err(broken("constituency tree has a cycle".to_string()));
        }

        let tree = Self {
            graph,
            root,
            terminals,
            nonterminals,
        };
        if let Some(&orphan) = tree.terminals.iter().find(|&&t| !tree.dominates(root, t)) {
            return Err(broken(format!(
                "terminal {} is not under the root",
                tree.graph[orphan].id()
            )));
        }
        Ok(tree)
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The sentence node below a synthetic wrapper root, or the root itself.
    pub fn true_root(&self) -> NodeIndex {
        if !WRAPPER_CATEGORIES.contains(&self.category(self.root).unwrap_or_default()) {
            return self.root;
        }
        let children = self.children(self.root);
        let mut phrases = children.iter().filter(|&&c| !self.graph[c].is_terminal());
        match (children.first(), phrases.next(), phrases.next()) {
            (Some(&first), Some(&phrase), None) if first == phrase => phrase,
            _ => self.root,
        }
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.graph[index]
    }

    /// Terminals in sentence order.
    pub fn terminals(&self) -> &[NodeIndex] {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &[NodeIndex] {
        &self.nonterminals
    }

    pub fn category(&self, index: NodeIndex) -> Option<&str> {
        match &self.graph[index] {
            Node::Nonterminal { category, .. } => Some(category),
            Node::Terminal { .. } => None,
        }
    }

    pub fn form(&self, index: NodeIndex) -> Option<&str> {
        match &self.graph[index] {
            Node::Terminal { form, .. } => Some(form),
            Node::Nonterminal { .. } => None,
        }
    }

    pub fn position(&self, index: NodeIndex) -> Option<u32> {
        match &self.graph[index] {
            Node::Terminal { position, .. } => Some(*position),
            Node::Nonterminal { .. } => None,
        }
    }

    /// Children in their original order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut ranked: Vec<(u32, NodeIndex)> = self
            .graph
            .edges(index)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        ranked.sort_unstable();
        ranked.into_iter().map(|(_, child)| child).collect()
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .next()
    }

    /// The terminal at the token's sentence position. `align` has already
    /// checked that terminals and tokens pair up one to one.
    pub fn terminal_of(&self, token: &Token) -> Option<NodeIndex> {
        self.terminals
            .get(token.position().checked_sub(1)? as usize)
            .copied()
    }

    /// Breadth-first reachability from `ancestor`. A node dominates itself.
    pub fn dominates(&self, ancestor: NodeIndex, node: NodeIndex) -> bool {
        let mut bfs = Bfs::new(&self.graph, ancestor);
        while let Some(current) = bfs.next(&self.graph) {
            if current == node {
                return true;
            }
        }
        false
    }

    /// Nearest ancestor of `node` with the given category.
    pub fn lowest_dominating(&self, node: NodeIndex, category: &str) -> Option<NodeIndex> {
        let mut cursor = self.parent(node)?;
        loop {
            if self.category(cursor) == Some(category) {
                return Some(cursor);
            }
            cursor = self.parent(cursor)?;
        }
    }

    /// Terminals below `index` from left to right.
    pub fn terminals_under(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            if self.graph[current].is_terminal() {
                out.push(current);
            } else {
                stack.extend(self.children(current).into_iter().rev());
            }
        }
        out
    }

    /// The forms of the terminals under `index`, each followed by a space.
    pub fn phrase_as_string(&self, index: NodeIndex) -> String {
        let mut phrase = String::new();
        for terminal in self.terminals_under(index) {
            if let Some(form) = self.form(terminal) {
                phrase.push_str(form);
                phrase.push(' ');
            }
        }
        phrase
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, index: NodeIndex) -> fmt::Result {
        match &self.graph[index] {
            Node::Terminal { form, .. } => f.write_str(form),
            Node::Nonterminal { category, .. } => {
                write!(f, "({category}")?;
                for child in self.children(index) {
                    f.write_str(" ")?;
                    self.write_node(f, child)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ConstituencyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root)
    }
}
