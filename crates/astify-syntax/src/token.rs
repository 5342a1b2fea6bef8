//! # Tokens - The Atoms of a Grammar
//!
//! A [`Token`] is a kind tag plus an optional [`Value`] payload. Everything
//! downstream (the block matcher, reactions, groups) looks at the kind only;
//! the value just rides along.
//!
//! Kinds are [`TokenKind`]s: cheaply clonable shared strings that compare
//! directly against `&str`, so grammar code can write `token.is("id")`
//! without interning tables.
//!
//! ```
//! use astify_syntax::{Token, Value};
//!
//! let token = Token::new("id", "my_method");
//! assert!(token.is("id"));
//! assert_eq!(token.value, Some(Value::Text("my_method".into())));
//! assert_eq!(token.to_string(), r#"id("my_method")"#);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// The kind of a token, block delimiter, group or branch tag.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKind(Arc<str>);

impl TokenKind {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TokenKind {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&TokenKind> for TokenKind {
    fn from(kind: &TokenKind) -> Self {
        kind.clone()
    }
}

impl Borrow<str> for TokenKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TokenKind {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TokenKind {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Payload carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    /// A symbolic payload, e.g. an operator name such as `+`.
    Symbol(TokenKind),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&TokenKind> {
        match self {
            Value::Symbol(kind) => Some(kind),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Text(c.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<TokenKind> for Value {
    fn from(kind: TokenKind) -> Self {
        Value::Symbol(kind)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text:?}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Symbol(kind) => write!(f, ":{kind}"),
        }
    }
}

/// An atomic lexeme: a kind plus an optional value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Token {
    pub fn new(kind: impl Into<TokenKind>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
        }
    }

    /// A token without a value, such as a keyword or a delimiter.
    pub fn bare(kind: impl Into<TokenKind>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// The value as text, if it is a [`Value::Text`].
    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({value})", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// A named set of token kinds.
///
/// Groups let reactions accept "any of these kinds" in one call, e.g. a
/// `var` group covering both `int` and `id`:
///
/// ```
/// use astify_syntax::Group;
///
/// let var = Group::new("var", ["int", "id"]);
/// assert!(var.contains("id"));
/// assert!(!var.contains("oparen"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: TokenKind,
    members: Vec<TokenKind>,
}

impl Group {
    pub fn new<I>(name: impl Into<TokenKind>, members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TokenKind>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &TokenKind {
        &self.name
    }

    pub fn members(&self) -> &[TokenKind] {
        &self.members
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.members.iter().any(|member| member == kind)
    }
}
