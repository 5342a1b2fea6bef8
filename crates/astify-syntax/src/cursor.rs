//! # Cursor - Scanning Over Tokens and Trees
//!
//! [`Cursor`] is an ordered sequence of items with a read position, in the
//! spirit of a string scanner but over tokens. It backs both stages of the
//! pipeline:
//!
//! - [`TokenStream`] (`Cursor<Token>`) is what the tokeniser produces and the
//!   block matcher consumes.
//! - [`Tree`] (`Cursor<Node>`) is the matched body of one block, and the
//!   lookahead context handed to token reactions.
//!
//! ## Scanning Primitives
//!
//! | Method          | Returns             | Advances | Records undo |
//! |-----------------|---------------------|----------|--------------|
//! | `scan`          | current item        | yes      | yes          |
//! | `check`         | current item        | no       | no           |
//! | `skip`          | new position        | yes      | yes          |
//! | `scan_until`    | items through match | yes      | yes          |
//! | `check_until`   | items through match | no       | no           |
//! | `skip_until`    | count advanced      | yes      | yes          |
//!
//! `scan`, `check` and `skip` take an optional expected kind; a mismatch is
//! [`Error::TypeMismatch`] and leaves the position untouched.
//!
//! ## End of Tokens
//!
//! [`Cursor::is_eot`] is true exactly when `pos == len`: every item has been
//! read. An empty cursor starts at the end. Reading at the end fails with
//! [`Error::UnexpectedEnd`] (or `TypeMismatch` with `found: None` when a kind
//! was expected); the `*_until` family returns nothing instead.
//!
//! ## Undo
//!
//! One level of history: [`Cursor::unscan`] returns to the position saved by
//! the last successful `scan`/`skip`/`scan_until`/`skip_until`. A second
//! consecutive `unscan` does nothing.
//!
//! ```
//! use astify_syntax::{Token, TokenStream};
//!
//! let mut stream: TokenStream = vec![
//!     Token::new("id", "a"),
//!     Token::bare("comma"),
//!     Token::new("id", "b"),
//! ]
//! .into();
//!
//! assert_eq!(stream.scan(Some("id")).unwrap().text(), Some("a"));
//! assert!(stream.scan(Some("id")).is_err());
//! assert_eq!(stream.pos(), 1);
//!
//! stream.unscan();
//! assert_eq!(stream.pos(), 0);
//! ```

use crate::error::{Error, Result};
use crate::node::Node;
use crate::token::{Group, Token, TokenKind};

/// Anything a cursor can match by kind.
pub trait Kinded {
    fn kind(&self) -> Option<&TokenKind>;
}

impl Kinded for Token {
    fn kind(&self) -> Option<&TokenKind> {
        Some(&self.kind)
    }
}

impl Kinded for Node {
    fn kind(&self) -> Option<&TokenKind> {
        Node::kind(self)
    }
}

/// Ordered items plus a read position and one level of undo history.
///
/// Invariant: `0 <= pos <= items.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<T> {
    items: Vec<T>,
    pos: usize,
    prev_pos: Option<usize>,
}

/// The tokeniser's output: a cursor over tokens.
pub type TokenStream = Cursor<Token>;

/// The matched body of one block: a cursor over tokens and nested branches.
pub type Tree = Cursor<Node>;

impl<T> Cursor<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            pos: 0,
            prev_pos: None,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item, regardless of position.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The item under the cursor, or `None` at the end.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.pos)
    }

    /// True when no items remain to be read.
    pub fn is_eot(&self) -> bool {
        self.pos >= self.items.len()
    }

    /// The next `n` items without advancing, clipped to the end.
    pub fn peek(&self, n: usize) -> &[T] {
        let end = self.pos.saturating_add(n).min(self.items.len());
        &self.items[self.pos..end]
    }

    /// All items from the cursor to the end.
    pub fn rest(&self) -> &[T] {
        &self.items[self.pos..]
    }

    /// Move the cursor to the end.
    pub fn clear(&mut self) {
        self.pos = self.items.len();
    }

    /// Return to the position saved by the last scan or skip.
    pub fn unscan(&mut self) {
        if let Some(prev) = self.prev_pos.take() {
            self.pos = prev;
        }
    }

    /// Alias of [`Cursor::unscan`].
    pub fn unskip(&mut self) {
        self.unscan();
    }

    /// Move the current item out, leaving `placeholder` in its slot, and
    /// advance past it with no undo history.
    pub(crate) fn take_current(&mut self, placeholder: T) -> Option<T> {
        let slot = self.items.get_mut(self.pos)?;
        let item = std::mem::replace(slot, placeholder);
        self.pos += 1;
        self.prev_pos = None;
        Some(item)
    }

    fn advance_to(&mut self, pos: usize) {
        self.prev_pos = Some(self.pos);
        self.pos = pos;
    }
}

impl<T: Kinded> Cursor<T> {
    /// Read the current item and advance.
    ///
    /// With `Some(kind)`, fails with [`Error::TypeMismatch`] unless the
    /// current item has that kind; the cursor does not move on failure.
    pub fn scan(&mut self, expected: Option<&str>) -> Result<&T> {
        let at = self.expect(expected)?;
        self.advance_to(at + 1);
        Ok(&self.items[at])
    }

    /// Read the current item without advancing.
    pub fn check(&self, expected: Option<&str>) -> Result<&T> {
        let at = self.expect(expected)?;
        Ok(&self.items[at])
    }

    /// Advance past the current item, returning the new position.
    pub fn skip(&mut self, expected: Option<&str>) -> Result<usize> {
        let at = self.expect(expected)?;
        self.advance_to(at + 1);
        Ok(self.pos)
    }

    /// Read the current item if its kind belongs to `group`.
    pub fn scan_group(&mut self, group: &Group) -> Result<&T> {
        let at = self.expect_group(group)?;
        self.advance_to(at + 1);
        Ok(&self.items[at])
    }

    /// Like [`Cursor::scan_group`] without advancing.
    pub fn check_group(&self, group: &Group) -> Result<&T> {
        let at = self.expect_group(group)?;
        Ok(&self.items[at])
    }

    /// Consume items up to and including the first of `kind`.
    ///
    /// When no such item remains, everything up to the end is consumed and
    /// returned.
    pub fn scan_until(&mut self, kind: &str) -> &[T] {
        let start = self.pos;
        let end = self.end_of_segment(kind);
        self.advance_to(end);
        &self.items[start..end]
    }

    /// Like [`Cursor::scan_until`] but leaves the cursor where it was.
    pub fn check_until(&self, kind: &str) -> &[T] {
        &self.items[self.pos..self.end_of_segment(kind)]
    }

    /// Like [`Cursor::scan_until`], returning only how many items were
    /// advanced.
    pub fn skip_until(&mut self, kind: &str) -> usize {
        let start = self.pos;
        let end = self.end_of_segment(kind);
        self.advance_to(end);
        end - start
    }

    fn end_of_segment(&self, kind: &str) -> usize {
        self.rest()
            .iter()
            .position(|item| is_kind(item, kind))
            .map_or(self.items.len(), |offset| self.pos + offset + 1)
    }

    fn expect(&self, expected: Option<&str>) -> Result<usize> {
        let position = self.pos;
        match (self.current(), expected) {
            (None, None) => Err(Error::UnexpectedEnd { position }),
            (Some(_), None) => Ok(position),
            (Some(item), Some(kind)) if is_kind(item, kind) => Ok(position),
            (item, Some(kind)) => Err(Error::TypeMismatch {
                expected: kind.into(),
                found: item.and_then(Kinded::kind).cloned(),
                position,
            }),
        }
    }

    fn expect_group(&self, group: &Group) -> Result<usize> {
        let position = self.pos;
        let found = self.current().and_then(Kinded::kind);
        match found {
            Some(kind) if group.contains(kind.as_str()) => Ok(position),
            _ => Err(Error::TypeMismatch {
                expected: group.name().clone(),
                found: found.cloned(),
                position,
            }),
        }
    }
}

fn is_kind<T: Kinded>(item: &T, kind: &str) -> bool {
    item.kind().is_some_and(|k| k == kind)
}

impl<T> Default for Cursor<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> From<Vec<T>> for Cursor<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for Cursor<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
