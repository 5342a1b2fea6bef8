//! # Grammar - Blocks, Token Reactions and Groups
//!
//! A [`Grammar`] is an immutable value built once with [`GrammarBuilder`] and
//! passed explicitly to every matching pass. It holds:
//!
//! - **Blocks**: open/close kind pairs with a reaction turning the matched
//!   body ([`Tree`]) into a [`Node`]. See [`matcher`].
//! - **Token reactions**: per-kind transforms run by the [`dispatch`] pass.
//!   Each reaction gets the triggering token and the enclosing [`Tree`],
//!   positioned just after it, so it can pull in following siblings.
//! - **Groups**: named kind sets for reactions that accept "any of these".
//!
//! Every reaction also receives the [`Grammar`] it belongs to, so it can
//! look up groups with [`Grammar::require_group`].
//!
//! ```
//! use astify_syntax::{Grammar, Node, Token, TokenStream};
//!
//! // `id(args...)` becomes a single `call` node.
//! let grammar = Grammar::builder()
//!     .named_block("args", "oparen", "cparen")
//!     .token("id", |token, tree, _| {
//!         if tree.check(Some("args")).is_ok() {
//!             let args = tree.scan(None)?.clone();
//!             Ok(Node::tagged("call", vec![token.into(), args]))
//!         } else {
//!             Ok(token.into())
//!         }
//!     })
//!     .build();
//!
//! let stream: TokenStream = vec![
//!     Token::new("id", "f"),
//!     Token::bare("oparen"),
//!     Token::new("int", 1),
//!     Token::bare("cparen"),
//! ]
//! .into();
//!
//! let out = grammar.astify(stream)?;
//! assert_eq!(Node::list(out).to_string(), r#"[call(id("f"), args(int(1)))]"#);
//! # Ok::<(), astify_syntax::Error>(())
//! ```

pub mod dispatch;
pub mod matcher;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::cursor::{TokenStream, Tree};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::token::{Group, Token, TokenKind};

/// Default bound on block nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

type TokenReaction = Arc<dyn Fn(Token, &mut Tree, &Grammar) -> Result<Node> + Send + Sync>;
type BlockReaction = Arc<dyn Fn(Tree, &Grammar) -> Result<Node> + Send + Sync>;

/// A reaction registered for one token kind.
#[derive(Clone)]
pub struct TokenDescriptor {
    kind: TokenKind,
    reaction: TokenReaction,
}

impl TokenDescriptor {
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Run the reaction with `tree` as lookahead context.
    pub fn react(&self, token: Token, tree: &mut Tree, grammar: &Grammar) -> Result<Node> {
        (self.reaction)(token, tree, grammar)
    }
}

impl fmt::Debug for TokenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenDescriptor")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// An open/close pair and the reaction applied to its body.
#[derive(Clone)]
pub struct BlockDescriptor {
    name: Option<TokenKind>,
    open: TokenKind,
    close: TokenKind,
    reaction: BlockReaction,
}

impl BlockDescriptor {
    pub fn name(&self) -> Option<&TokenKind> {
        self.name.as_ref()
    }

    pub fn open(&self) -> &TokenKind {
        &self.open
    }

    pub fn close(&self) -> &TokenKind {
        &self.close
    }

    /// Run the reaction on a matched body (closing delimiter excluded).
    pub fn react(&self, body: Tree, grammar: &Grammar) -> Result<Node> {
        (self.reaction)(body, grammar)
    }

    fn same_slot(&self, other: &BlockDescriptor) -> bool {
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.open == other.open && self.close == other.close,
            _ => false,
        }
    }
}

impl fmt::Debug for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDescriptor")
            .field("name", &self.name)
            .field("open", &self.open)
            .field("close", &self.close)
            .finish_non_exhaustive()
    }
}

/// Immutable grammar definition.
#[derive(Debug, Clone)]
pub struct Grammar {
    tokens: HashMap<TokenKind, TokenDescriptor>,
    blocks: Vec<BlockDescriptor>,
    groups: HashMap<TokenKind, Group>,
    max_depth: usize,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// Match blocks, then run token reactions over the result.
    pub fn astify(&self, stream: TokenStream) -> Result<Vec<Node>> {
        let tree = self.match_blocks(stream)?;
        self.dispatch(tree)
    }

    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    pub fn token_reaction(&self, kind: &str) -> Option<&TokenDescriptor> {
        self.tokens.get(kind)
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Like [`Grammar::group`], failing with [`Error::UnknownGroup`] so
    /// reactions can use `?`.
    pub fn require_group(&self, name: &str) -> Result<&Group> {
        self.group(name).ok_or_else(|| Error::UnknownGroup { name: name.into() })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// First registered block opened by `kind`.
    fn block_opened_by(&self, kind: &TokenKind) -> Option<&BlockDescriptor> {
        self.blocks.iter().find(|block| &block.open == kind)
    }

    fn closes_any(&self, kind: &TokenKind) -> bool {
        self.blocks.iter().any(|block| &block.close == kind)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        GrammarBuilder::default().build()
    }
}

/// Builds a [`Grammar`].
///
/// Registering under an existing name replaces the earlier entry: token
/// reactions by kind, groups by name, named blocks by name and anonymous
/// blocks by their open/close pair.
#[derive(Debug)]
pub struct GrammarBuilder {
    tokens: HashMap<TokenKind, TokenDescriptor>,
    blocks: Vec<BlockDescriptor>,
    groups: HashMap<TokenKind, Group>,
    max_depth: usize,
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self {
            tokens: HashMap::new(),
            blocks: Vec::new(),
            groups: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GrammarBuilder {
    /// React to every token of `kind` during dispatch.
    pub fn token<F>(mut self, kind: impl Into<TokenKind>, reaction: F) -> Self
    where
        F: Fn(Token, &mut Tree, &Grammar) -> Result<Node> + Send + Sync + 'static,
    {
        let kind = kind.into();
        self.tokens.insert(
            kind.clone(),
            TokenDescriptor {
                kind,
                reaction: Arc::new(reaction),
            },
        );
        self
    }

    /// An anonymous block whose body becomes an untagged branch.
    pub fn block(self, open: impl Into<TokenKind>, close: impl Into<TokenKind>) -> Self {
        self.block_with(open, close, |body, _| Ok(Node::list(body.into_items())))
    }

    /// An anonymous block with a custom reaction.
    pub fn block_with<F>(
        self,
        open: impl Into<TokenKind>,
        close: impl Into<TokenKind>,
        reaction: F,
    ) -> Self
    where
        F: Fn(Tree, &Grammar) -> Result<Node> + Send + Sync + 'static,
    {
        self.add_block(None, open.into(), close.into(), Arc::new(reaction))
    }

    /// A named block whose body becomes a branch tagged with `name`.
    pub fn named_block(
        self,
        name: impl Into<TokenKind>,
        open: impl Into<TokenKind>,
        close: impl Into<TokenKind>,
    ) -> Self {
        let name = name.into();
        let tag = name.clone();
        self.named_block_with(name, open, close, move |body, _| {
            Ok(Node::tagged(tag.clone(), body.into_items()))
        })
    }

    /// A named block with a custom reaction.
    pub fn named_block_with<F>(
        self,
        name: impl Into<TokenKind>,
        open: impl Into<TokenKind>,
        close: impl Into<TokenKind>,
        reaction: F,
    ) -> Self
    where
        F: Fn(Tree, &Grammar) -> Result<Node> + Send + Sync + 'static,
    {
        self.add_block(Some(name.into()), open.into(), close.into(), Arc::new(reaction))
    }

    /// A named set of token kinds.
    pub fn group<I>(mut self, name: impl Into<TokenKind>, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TokenKind>,
    {
        let group = Group::new(name, members);
        self.groups.insert(group.name().clone(), group);
        self
    }

    /// Bound block nesting; deeper input fails with
    /// [`Error::NestingTooDeep`](crate::Error::NestingTooDeep).
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Grammar {
        Grammar {
            tokens: self.tokens,
            blocks: self.blocks,
            groups: self.groups,
            max_depth: self.max_depth,
        }
    }

    fn add_block(
        mut self,
        name: Option<TokenKind>,
        open: TokenKind,
        close: TokenKind,
        reaction: BlockReaction,
    ) -> Self {
        let block = BlockDescriptor {
            name,
            open,
            close,
            reaction,
        };
        self.blocks.retain(|existing| !existing.same_slot(&block));
        self.blocks.push(block);
        self
    }
}
