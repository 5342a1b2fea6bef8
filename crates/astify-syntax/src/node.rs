//! Output nodes produced by block and token reactions.
//!
//! A [`Node`] is either a leaf token or a branch: an ordered list of nodes
//! with an optional tag. Rendered with [`Display`](std::fmt::Display) they
//! read like s-expressions:
//!
//! ```text
//! id("a")                 leaf
//! [id("a"), id("b")]      untagged branch
//! group(id("b"))          tagged branch
//! ```

use std::fmt;

use serde::Serialize;

use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(Token),
    Branch {
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<TokenKind>,
        children: Vec<Node>,
    },
}

impl Node {
    /// An untagged branch.
    pub fn list(children: Vec<Node>) -> Self {
        Node::Branch {
            kind: None,
            children,
        }
    }

    /// A branch tagged with `kind`, e.g. `group(...)`.
    pub fn tagged(kind: impl Into<TokenKind>, children: Vec<Node>) -> Self {
        Node::Branch {
            kind: Some(kind.into()),
            children,
        }
    }

    /// The token kind of a leaf or the tag of a branch.
    pub fn kind(&self) -> Option<&TokenKind> {
        match self {
            Node::Leaf(token) => Some(&token.kind),
            Node::Branch { kind, .. } => kind.as_ref(),
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Node::Leaf(token) => Some(token),
            Node::Branch { .. } => None,
        }
    }

    /// Children of a branch; empty for a leaf.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf(_) => &[],
            Node::Branch { children, .. } => children,
        }
    }

    /// Number of nested branches on the deepest path, a leaf being 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch { children, .. } => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
        }
    }

    /// All leaf tokens in document order.
    pub fn leaves(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        collect_leaves(std::slice::from_ref(self), &mut out);
        out
    }
}

fn collect_leaves<'n>(nodes: &'n [Node], out: &mut Vec<&'n Token>) {
    for node in nodes {
        match node {
            Node::Leaf(token) => out.push(token),
            Node::Branch { children, .. } => collect_leaves(children, out),
        }
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Leaf(token)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(token) => write!(f, "{token}"),
            Node::Branch { kind, children } => {
                let (open, close) = match kind {
                    Some(kind) => {
                        write!(f, "{kind}")?;
                        ("(", ")")
                    }
                    None => ("[", "]"),
                };
                f.write_str(open)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(close)
            }
        }
    }
}
