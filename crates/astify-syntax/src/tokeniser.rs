//! # Tokeniser - Turning Text Into Tokens
//!
//! A [`Tokeniser`] is an ordered list of [`Rule`]s, each a name, a regex and
//! a reaction. Unlike most lexers, rule matching is **not exclusive**: at
//! every scan position *every* rule is tried, and every rule that matches
//! contributes tokens. The cursor then moves past the longest match.
//!
//! ```
//! use astify_syntax::{Token, Tokeniser};
//!
//! let tokeniser = Tokeniser::builder()
//!     .token("letter", "[a-z]")?
//!     .token("vowel", "[aeiou]")?
//!     .build();
//!
//! let tokens = tokeniser.tokenise("ab")?;
//! assert_eq!(
//!     tokens.items(),
//!     &[
//!         Token::new("letter", "a"),
//!         Token::new("vowel", "a"),
//!         Token::new("letter", "b"),
//!     ]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Reactions
//!
//! A reaction receives a [`RuleMatch`] (the full text plus any capture
//! groups) and returns anything convertible into [`Emit`]. Returned text
//! must be owned: the match borrows the input only for the call.
//!
//! - `()` or `None`: no tokens (e.g. whitespace)
//! - a [`Token`] or `Vec<Token>`: emitted as-is
//! - a bare value (`&str`, `String`, `i64`, [`Value`]) or a `Vec` of them:
//!   each wrapped in a token named after the rule
//!
//! ## Unmatched Input
//!
//! Characters no rule matches are handled by exactly one [`Unmatched`]
//! policy: skipped (the default) or passed one at a time to a fallback.
//!
//! ## Forward Progress
//!
//! Empty matches never count as matches, so every loop iteration advances
//! the cursor by at least one character.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use regex::Regex;

use crate::cursor::TokenStream;
use crate::error::{DefinitionError, Error, Result};
use crate::token::{Token, TokenKind, Value};

/// The text a rule matched, and its capture groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    text: &'t str,
    captures: Vec<Option<&'t str>>,
    offset: usize,
}

impl<'t> RuleMatch<'t> {
    /// The whole match.
    pub fn text(&self) -> &'t str {
        self.text
    }

    /// Capture groups in order, excluding the whole match. Groups that did
    /// not participate are `None`.
    pub fn captures(&self) -> &[Option<&'t str>] {
        &self.captures
    }

    /// Group `index`, counted the way regex counts: 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<&'t str> {
        match index {
            0 => Some(self.text),
            n => self.captures.get(n - 1).copied().flatten(),
        }
    }

    pub fn has_captures(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Byte offset of the match in the input.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// What a rule reaction produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit {
    Nothing,
    Token(Token),
    Tokens(Vec<Token>),
    /// Wrapped in a token named after the rule.
    Value(Value),
    /// Each wrapped in its own token named after the rule.
    Values(Vec<Value>),
}

impl From<()> for Emit {
    fn from(_: ()) -> Self {
        Emit::Nothing
    }
}

impl From<Token> for Emit {
    fn from(token: Token) -> Self {
        Emit::Token(token)
    }
}

impl From<Vec<Token>> for Emit {
    fn from(tokens: Vec<Token>) -> Self {
        Emit::Tokens(tokens)
    }
}

impl From<Value> for Emit {
    fn from(value: Value) -> Self {
        Emit::Value(value)
    }
}

impl From<Vec<Value>> for Emit {
    fn from(values: Vec<Value>) -> Self {
        Emit::Values(values)
    }
}

impl From<&str> for Emit {
    fn from(text: &str) -> Self {
        Emit::Value(text.into())
    }
}

impl From<String> for Emit {
    fn from(text: String) -> Self {
        Emit::Value(text.into())
    }
}

impl From<i64> for Emit {
    fn from(n: i64) -> Self {
        Emit::Value(n.into())
    }
}

impl From<Vec<&str>> for Emit {
    fn from(texts: Vec<&str>) -> Self {
        Emit::Values(texts.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<String>> for Emit {
    fn from(texts: Vec<String>) -> Self {
        Emit::Values(texts.into_iter().map(Value::from).collect())
    }
}

impl<T: Into<Emit>> From<Option<T>> for Emit {
    fn from(emit: Option<T>) -> Self {
        emit.map_or(Emit::Nothing, Into::into)
    }
}

type RuleReaction = Arc<dyn Fn(&RuleMatch<'_>) -> Emit + Send + Sync>;
type FallbackReaction = Arc<dyn Fn(char) -> Emit + Send + Sync>;

/// A named (or anonymous) pattern with its reaction.
#[derive(Clone)]
pub struct Rule {
    name: Option<TokenKind>,
    pattern: String,
    regex: Regex,
    reaction: RuleReaction,
}

impl Rule {
    pub fn new<F, E>(
        name: Option<TokenKind>,
        pattern: &str,
        reaction: F,
    ) -> Result<Self, DefinitionError>
    where
        F: Fn(&RuleMatch<'_>) -> E + Send + Sync + 'static,
        E: Into<Emit>,
    {
        // Anchor at the scan position: matching runs against the unread
        // suffix of the input.
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            DefinitionError::InvalidPattern {
                rule: name.as_ref().map_or_else(|| pattern.to_string(), TokenKind::to_string),
                source,
            }
        })?;
        Ok(Self {
            name,
            pattern: pattern.to_string(),
            regex,
            reaction: Arc::new(move |m: &RuleMatch<'_>| -> Emit { reaction(m).into() }),
        })
    }

    pub fn name(&self) -> Option<&TokenKind> {
        self.name.as_ref()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Run the reaction on a match.
    pub fn run(&self, matched: &RuleMatch<'_>) -> Emit {
        (self.reaction)(matched)
    }

    /// Match at byte `offset` of `input`. Empty matches are ignored.
    pub fn match_at<'t>(&self, input: &'t str, offset: usize) -> Option<RuleMatch<'t>> {
        let caps = self.regex.captures(&input[offset..])?;
        let whole = caps.get(0)?;
        if whole.is_empty() {
            return None;
        }
        Some(RuleMatch {
            text: whole.as_str(),
            captures: caps.iter().skip(1).map(|m| m.map(|m| m.as_str())).collect(),
            offset,
        })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Policy for characters that no rule matches.
#[derive(Clone, Default)]
pub enum Unmatched {
    #[default]
    Skip,
    /// Call the handler once per unmatched character; bare values become
    /// tokens of kind `name`.
    Emit {
        name: TokenKind,
        handler: FallbackReaction,
    },
}

impl fmt::Debug for Unmatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmatched::Skip => f.write_str("Skip"),
            Unmatched::Emit { name, .. } => f.debug_struct("Emit").field("name", name).finish(),
        }
    }
}

/// How rules are applied at one scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Application {
    /// Every rule is tried at the same position; the cursor moves past the
    /// longest match.
    #[default]
    Overlapping,
    /// Rules are tried in order, each starting where the previous matching
    /// rule stopped.
    Chained,
}

/// An immutable set of tokenising rules.
#[derive(Debug, Clone, Default)]
pub struct Tokeniser {
    rules: Vec<Rule>,
    unmatched: Unmatched,
    application: Application,
}

impl Tokeniser {
    pub fn builder() -> TokeniserBuilder {
        TokeniserBuilder::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn unmatched(&self) -> &Unmatched {
        &self.unmatched
    }

    pub fn application(&self) -> Application {
        self.application
    }

    /// Tokenise `input` into a stream.
    pub fn tokenise(&self, input: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        while offset < input.len() {
            let matched_end = match self.application {
                Application::Overlapping => self.apply_overlapping(input, offset, &mut tokens)?,
                Application::Chained => self.apply_chained(input, offset, &mut tokens)?,
            };
            let next = match matched_end {
                Some(end) => end,
                None => self.apply_unmatched(input, offset, &mut tokens)?,
            };
            assert!(next > offset, "tokeniser made no progress at byte {offset}");
            offset = next;
        }

        debug!(
            "tokenised {} bytes into {} tokens with {} rules",
            input.len(),
            tokens.len(),
            self.rules.len()
        );
        Ok(TokenStream::new(tokens))
    }

    fn apply_overlapping(
        &self,
        input: &str,
        offset: usize,
        out: &mut Vec<Token>,
    ) -> Result<Option<usize>> {
        let mut longest: Option<usize> = None;
        for rule in &self.rules {
            if let Some(m) = rule.match_at(input, offset) {
                trace!("rule {:?} matched {:?} at {offset}", rule.name, m.text());
                let end = offset + m.text().len();
                longest = Some(longest.map_or(end, |l| l.max(end)));
                push_emit(rule.name(), rule.run(&m), offset, out)?;
            }
        }
        Ok(longest)
    }

    fn apply_chained(
        &self,
        input: &str,
        offset: usize,
        out: &mut Vec<Token>,
    ) -> Result<Option<usize>> {
        let mut at = offset;
        for rule in &self.rules {
            if at >= input.len() {
                break;
            }
            if let Some(m) = rule.match_at(input, at) {
                trace!("rule {:?} matched {:?} at {at}", rule.name, m.text());
                push_emit(rule.name(), rule.run(&m), at, out)?;
                at += m.text().len();
            }
        }
        Ok((at > offset).then_some(at))
    }

    fn apply_unmatched(&self, input: &str, offset: usize, out: &mut Vec<Token>) -> Result<usize> {
        let Some(c) = input[offset..].chars().next() else {
            return Ok(input.len());
        };
        match &self.unmatched {
            Unmatched::Skip => trace!("skipping unmatched {c:?} at {offset}"),
            Unmatched::Emit { name, handler } => push_emit(Some(name), handler(c), offset, out)?,
        }
        Ok(offset + c.len_utf8())
    }
}

fn push_emit(
    name: Option<&TokenKind>,
    emit: Emit,
    offset: usize,
    out: &mut Vec<Token>,
) -> Result<()> {
    let named = || name.cloned().ok_or(Error::UnnamedRuleValue { offset });
    match emit {
        Emit::Nothing => {}
        Emit::Token(token) => out.push(token),
        Emit::Tokens(tokens) => out.extend(tokens),
        Emit::Value(value) => out.push(Token {
            kind: named()?,
            value: Some(value),
        }),
        Emit::Values(values) => {
            let kind = named()?;
            out.extend(values.into_iter().map(|value| Token {
                kind: kind.clone(),
                value: Some(value),
            }));
        }
    }
    Ok(())
}

/// Builds a [`Tokeniser`]. Rules keep declaration order.
#[derive(Debug, Default)]
pub struct TokeniserBuilder {
    rules: Vec<Rule>,
    unmatched: Unmatched,
    application: Application,
}

impl TokeniserBuilder {
    /// Add a named rule. A rule with the same name is removed first, so the
    /// new rule takes the last priority.
    pub fn rule<F, E>(
        mut self,
        name: impl Into<TokenKind>,
        pattern: &str,
        reaction: F,
    ) -> Result<Self, DefinitionError>
    where
        F: Fn(&RuleMatch<'_>) -> E + Send + Sync + 'static,
        E: Into<Emit>,
    {
        let name = name.into();
        self.rules.retain(|rule| rule.name() != Some(&name));
        self.rules.push(Rule::new(Some(name), pattern, reaction)?);
        Ok(self)
    }

    /// Add a rule without a name. Its reaction must return tokens, not bare
    /// values.
    pub fn anonymous_rule<F, E>(mut self, pattern: &str, reaction: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&RuleMatch<'_>) -> E + Send + Sync + 'static,
        E: Into<Emit>,
    {
        self.rules.push(Rule::new(None, pattern, reaction)?);
        Ok(self)
    }

    /// Add a named rule emitting the matched text.
    pub fn token(self, name: impl Into<TokenKind>, pattern: &str) -> Result<Self, DefinitionError> {
        self.rule(name, pattern, |m| m.text().to_string())
    }

    /// Add a named rule that matches and emits nothing.
    pub fn discard(self, name: impl Into<TokenKind>, pattern: &str) -> Result<Self, DefinitionError> {
        self.rule(name, pattern, |_| ())
    }

    /// Route unmatched characters to `handler`, replacing any previous policy.
    pub fn fallback<F, E>(mut self, name: impl Into<TokenKind>, handler: F) -> Self
    where
        F: Fn(char) -> E + Send + Sync + 'static,
        E: Into<Emit>,
    {
        self.unmatched = Unmatched::Emit {
            name: name.into(),
            handler: Arc::new(move |c: char| -> Emit { handler(c).into() }),
        };
        self
    }

    /// Drop unmatched characters (the default).
    pub fn skip_unmatched(mut self) -> Self {
        self.unmatched = Unmatched::Skip;
        self
    }

    pub fn application(mut self, application: Application) -> Self {
        self.application = application;
        self
    }

    pub fn build(self) -> Tokeniser {
        Tokeniser {
            rules: self.rules,
            unmatched: self.unmatched,
            application: self.application,
        }
    }
}
