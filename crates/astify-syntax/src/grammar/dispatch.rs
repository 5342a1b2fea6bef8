//! Token reaction dispatch over a matched tree.
//!
//! Walks the tree depth-first. Each leaf is handed to the reaction registered
//! for its kind (or passed through unchanged); each branch is dispatched in
//! turn and keeps its tag. A reaction receives the enclosing [`Tree`]
//! positioned after the triggering leaf and may `scan`/`check`/`scan_until`
//! further siblings; anything it consumes is not visited again.
//!
//! Nesting is tracked on an explicit stack of levels, so tree depth costs
//! heap, not call stack. Nodes are moved out of the input as they are
//! visited.

use super::Grammar;
use crate::cursor::Tree;
use crate::error::Result;
use crate::node::Node;
use crate::token::TokenKind;

/// One branch being dispatched.
struct Level {
    kind: Option<TokenKind>,
    tree: Tree,
    out: Vec<Node>,
}

impl Level {
    fn new(kind: Option<TokenKind>, tree: Tree) -> Self {
        Self {
            kind,
            out: Vec::with_capacity(tree.len()),
            tree,
        }
    }
}

impl Grammar {
    /// Run token reactions over `tree`, returning the output nodes in order.
    pub fn dispatch(&self, tree: Tree) -> Result<Vec<Node>> {
        let mut stack: Vec<Level> = Vec::new();
        let mut level = Level::new(None, tree);

        loop {
            // Taking the node clears the undo history, so a reaction may
            // rewind over siblings it scans but never onto its trigger.
            match level.tree.take_current(Node::list(Vec::new())) {
                Some(Node::Leaf(token)) => {
                    let node = match self.token_reaction(token.kind.as_str()) {
                        Some(descriptor) => descriptor.react(token, &mut level.tree, self)?,
                        None => Node::Leaf(token),
                    };
                    level.out.push(node);
                }
                Some(Node::Branch { kind, children }) => {
                    let child = Level::new(kind, Tree::new(children));
                    stack.push(std::mem::replace(&mut level, child));
                }
                None => {
                    let Some(mut parent) = stack.pop() else {
                        return Ok(level.out);
                    };
                    parent.out.push(Node::Branch {
                        kind: level.kind,
                        children: level.out,
                    });
                    level = parent;
                }
            }
        }
    }
}
