use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use polcla_protocol::{NonterminalSpec, TerminalSpec, TreeSpec};

use crate::error::{ReadError, Result};

#[derive(Debug, Clone, PartialEq)]
enum Bracket<'a> {
    Node(&'a str, Vec<Bracket<'a>>),
    Leaf(&'a str),
}

fn atom(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')')(input)
}

fn node(input: &str) -> IResult<&str, Bracket> {
    map(
        delimited(
            pair(char('('), multispace0),
            pair(atom, many0(preceded(multispace0, alt((node, map(atom, Bracket::Leaf)))))),
            pair(multispace0, char(')')),
        ),
        |(category, children)| Bracket::Node(category, children),
    )(input)
}

/// Brackets cannot appear as bare leaves, so they are escaped.
fn unescape(form: &str) -> &str {
    match form {
        "-LRB-" => "(",
        "-RRB-" => ")",
        other => other,
    }
}

#[derive(Default)]
struct Flattener {
    nonterminals: Vec<NonterminalSpec>,
    terminals: Vec<TerminalSpec>,
}

impl Flattener {
    /// Preorder walk assigning `n<k>` to nonterminals and `t<k>` to terminals.
    fn visit(&mut self, bracket: &Bracket) -> String {
        match bracket {
            Bracket::Leaf(form) => {
                let id = format!("t{}", self.terminals.len() + 1);
                self.terminals.push(TerminalSpec {
                    id: id.clone(),
                    form: unescape(form).to_string(),
                    pos: None,
                });
                id
            }
            Bracket::Node(category, children) => {
                let id = format!("n{}", self.nonterminals.len());
                let slot = self.nonterminals.len();
                self.nonterminals.push(NonterminalSpec {
                    id: id.clone(),
                    category: category.to_string(),
                    children: Vec::new(),
                });
                let child_ids: Vec<String> = children.iter().map(|c| self.visit(c)).collect();
                self.nonterminals[slot].children = child_ids;
                id
            }
        }
    }
}

/// Parses one bracketed tree such as `(S (NP Das Auto) ist nicht (AP schlecht))`.
pub fn parse_tree(line: usize, input: &str) -> Result<TreeSpec> {
    let (_, bracket) = all_consuming(terminated(preceded(multispace0, node), multispace0))(input)
        .map_err(|_| ReadError::Unbalanced { line })?;

    let mut flat = Flattener::default();
    let root = flat.visit(&bracket);

    Ok(TreeSpec {
        root,
        nonterminals: flat.nonterminals,
        terminals: flat.terminals,
    })
}

/// One tree per non-empty line, in sentence order.
pub fn read_trees(text: &str) -> Result<Vec<TreeSpec>> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| parse_tree(i + 1, l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tree() {
        let spec = parse_tree(1, "(S (NP Das Auto) ist nicht (AP schlecht))").unwrap();

        assert_eq!(spec.root, "n0");
        assert_eq!(spec.terminals.len(), 5);
        assert_eq!(spec.terminals[4].form, "schlecht");

        let s = &spec.nonterminals[0];
        assert_eq!(s.category, "S");
        assert_eq!(s.children, vec!["n1", "t3", "t4", "n2"]);
        assert_eq!(spec.nonterminals[1].children, vec!["t1", "t2"]);
    }

    #[test]
    fn test_escaped_brackets() {
        let spec = parse_tree(1, "(ROOT (S gut -LRB- sehr -RRB-))").unwrap();
        assert_eq!(spec.terminals[1].form, "(");
        assert_eq!(spec.terminals[3].form, ")");
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(parse_tree(7, "(S (NP Das Auto)"), Err(ReadError::Unbalanced { line: 7 }));
    }

    #[test]
    fn test_read_many() {
        let trees = read_trees("(S gut)\n\n(S schlecht)\n").unwrap();
        assert_eq!(trees.len(), 2);
    }
}
