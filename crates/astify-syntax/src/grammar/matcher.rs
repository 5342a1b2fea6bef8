//! # Block Matcher - Flat Tokens to Nested Trees
//!
//! One linear pass over a [`TokenStream`] that recognises the grammar's
//! open/close pairs and folds each matched block into a single [`Node`] via
//! the block's reaction.
//!
//! At each token, in order:
//!
//! 1. It closes the innermost open block: consume it, run the block's
//!    reaction on the body, append the result to the enclosing body.
//! 2. It closes any other block: [`Error::UnbalancedDelimiter`].
//! 3. It opens a block: consume it and start collecting a new body.
//! 4. Otherwise it is appended to the current body as a leaf.
//!
//! A kind that is some block's close never opens a block, even when it is
//! also registered as an open.
//!
//! Open blocks live on an explicit stack rather than the call stack, and the
//! stack is bounded by [`Grammar::max_depth`]. Running out of tokens with a
//! block still open is always [`Error::UnterminatedBlock`]; input is never
//! silently truncated.

use log::{debug, trace};

use super::{BlockDescriptor, Grammar};
use crate::cursor::{TokenStream, Tree};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::token::TokenKind;

/// A block waiting for its close.
struct Frame<'g> {
    block: &'g BlockDescriptor,
    opened_at: usize,
    /// Body of the enclosing level, resumed when this block closes.
    outer: Vec<Node>,
}

/// What a token does when it does not close the innermost block.
enum Step<'g> {
    Stray,
    Open(&'g BlockDescriptor),
    Plain,
}

impl Grammar {
    /// Match blocks from the stream's current position to its end.
    pub fn match_blocks(&self, mut stream: TokenStream) -> Result<Tree> {
        let mut open: Vec<Frame<'_>> = Vec::new();
        let mut body: Vec<Node> = Vec::new();

        while let Some(token) = stream.current().cloned() {
            let position = stream.pos();

            if let Some(frame) = open.pop_if(|frame| frame.block.close() == &token.kind) {
                stream.skip(None)?;
                let inner = std::mem::replace(&mut body, frame.outer);
                trace!(
                    "closed `{}` at {position} with {} items",
                    frame.block.open(),
                    inner.len()
                );
                body.push(frame.block.react(Tree::new(inner), self)?);
                continue;
            }

            match self.classify(&token.kind) {
                Step::Stray => {
                    return Err(Error::UnbalancedDelimiter {
                        found: token.kind,
                        expected: open.last().map(|frame| frame.block.close().clone()),
                        position,
                    });
                }
                Step::Open(block) => {
                    if open.len() >= self.max_depth {
                        return Err(Error::NestingTooDeep {
                            limit: self.max_depth,
                            position,
                        });
                    }
                    stream.skip(None)?;
                    trace!("opened `{}` at {position}", block.open());
                    open.push(Frame {
                        block,
                        opened_at: position,
                        outer: std::mem::take(&mut body),
                    });
                }
                Step::Plain => {
                    stream.skip(None)?;
                    body.push(Node::Leaf(token));
                }
            }
        }

        if let Some(frame) = open.pop() {
            return Err(Error::UnterminatedBlock {
                open: frame.block.open().clone(),
                close: frame.block.close().clone(),
                position: frame.opened_at,
            });
        }

        debug!("matched {} tokens into {} top-level nodes", stream.len(), body.len());
        Ok(Tree::new(body))
    }

    fn classify(&self, kind: &TokenKind) -> Step<'_> {
        if self.closes_any(kind) {
            return Step::Stray;
        }
        match self.block_opened_by(kind) {
            Some(block) => Step::Open(block),
            None => Step::Plain,
        }
    }
}
