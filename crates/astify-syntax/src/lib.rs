//! # astify-syntax
//!
//! A small toolkit for turning text into nested trees with user-defined
//! rules: a regex-driven tokeniser, a cursor over token streams, a block
//! matcher for open/close pairs and per-kind token reactions with lookahead.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Tokeniser → TokenStream → Block Matcher → Tree → Dispatch → Vec<Node>
//!               (Rules)                   (Grammar blocks)       (Grammar token reactions)
//! ```
//!
//! ### 1. Tokeniser ([`tokeniser`] module)
//!
//! An ordered list of named regex rules. Every rule is tried at each scan
//! position and every match contributes tokens, so one character may produce
//! several tokens (`"a"` can be both a `letter` and a `vowel`).
//!
//! ### 2. Cursor ([`cursor`] module)
//!
//! [`TokenStream`] and [`Tree`] are both a [`Cursor`]: an owned sequence
//! with a read position and one level of undo. Reactions read ahead with
//! `scan`, `check` and `scan_until`.
//!
//! ### 3. Grammar ([`grammar`] module)
//!
//! The block matcher folds every open/close pair into a single node in one
//! pass, then the dispatcher walks the tree depth-first running the reaction
//! registered for each token kind.
//!
//! ## Module Structure
//!
//! ```text
//! astify-syntax/
//! ├── lib.rs           # This file - public API and end-to-end tests
//! ├── token.rs         # TokenKind, Value, Token, Group
//! ├── node.rs          # Node (leaf or branch) and its s-expression form
//! ├── cursor.rs        # Cursor, TokenStream, Tree
//! ├── error.rs         # Error and DefinitionError
//! ├── tokeniser.rs     # Rule, Tokeniser and its builder
//! └── grammar/
//!     ├── mod.rs       # Grammar, descriptors and builder
//!     ├── matcher.rs   # Block matching
//!     └── dispatch.rs  # Token reaction dispatch
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use astify_syntax::{parse, Grammar, Node, Tokeniser};
//!
//! let tokeniser = Tokeniser::builder()
//!     .token("id", "[a-z]+")?
//!     .token("oparen", r"\(")?
//!     .token("cparen", r"\)")?
//!     .build();
//! let grammar = Grammar::builder()
//!     .named_block("group", "oparen", "cparen")
//!     .build();
//!
//! let nodes = parse(&tokeniser, &grammar, "a(b)")?;
//! assert_eq!(Node::list(nodes).to_string(), r#"[id("a"), group(id("b"))]"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cursor;
pub mod error;
pub mod grammar;
pub mod node;
pub mod token;
pub mod tokeniser;

pub use cursor::{Cursor, Kinded, TokenStream, Tree};
pub use error::{DefinitionError, Error, Result};
pub use grammar::{BlockDescriptor, DEFAULT_MAX_DEPTH, Grammar, GrammarBuilder, TokenDescriptor};
pub use node::Node;
pub use token::{Group, Token, TokenKind, Value};
pub use tokeniser::{Application, Emit, Rule, RuleMatch, Tokeniser, TokeniserBuilder, Unmatched};

/// Tokenise `input`, match its blocks and run token reactions.
pub fn parse(tokeniser: &Tokeniser, grammar: &Grammar, input: &str) -> Result<Vec<Node>> {
    let stream = tokeniser.tokenise(input)?;
    grammar.astify(stream)
}
