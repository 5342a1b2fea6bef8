use crate::token::TokenKind;

/// Errors raised while tokenising, matching blocks or running reactions.
///
/// None of these are recovered inside the toolkit: they propagate to the
/// caller of [`Tokeniser::tokenise`](crate::Tokeniser::tokenise) or
/// [`Grammar::astify`](crate::Grammar::astify) unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("wrong type: expected `{expected}` but found {} at position {position}", describe(.found))]
    TypeMismatch {
        expected: TokenKind,
        found: Option<TokenKind>,
        position: usize,
    },

    #[error("unexpected end of tokens at position {position}")]
    UnexpectedEnd { position: usize },

    #[error("close `{found}` at position {position} {}", unbalanced(.expected))]
    UnbalancedDelimiter {
        found: TokenKind,
        /// Close kind the innermost open block was waiting for, if any.
        expected: Option<TokenKind>,
        position: usize,
    },

    #[error("block opened by `{open}` at position {position} is never closed by `{close}`")]
    UnterminatedBlock {
        open: TokenKind,
        close: TokenKind,
        position: usize,
    },

    #[error("blocks nested deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },

    #[error("anonymous rule produced a bare value at byte offset {offset}")]
    UnnamedRuleValue { offset: usize },

    #[error("no group named `{name}` in the grammar")]
    UnknownGroup { name: TokenKind },
}

/// Errors in a grammar or tokeniser definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("invalid pattern for rule `{rule}`: {source}")]
    InvalidPattern { rule: String, source: regex::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn describe(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => format!("`{kind}`"),
        None => "end of tokens".to_string(),
    }
}

fn unbalanced(expected: &Option<TokenKind>) -> String {
    match expected {
        Some(kind) => format!("where `{kind}` was expected"),
        None => "has no matching open".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::TypeMismatch {
            expected: "id".into(),
            found: Some("int".into()),
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "wrong type: expected `id` but found `int` at position 2"
        );

        let err = Error::TypeMismatch {
            expected: "id".into(),
            found: None,
            position: 5,
        };
        assert_eq!(
            err.to_string(),
            "wrong type: expected `id` but found end of tokens at position 5"
        );

        let err = Error::UnbalancedDelimiter {
            found: "cparen".into(),
            expected: None,
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "close `cparen` at position 0 has no matching open"
        );

        let err = Error::UnbalancedDelimiter {
            found: "cparen".into(),
            expected: Some("end".into()),
            position: 4,
        };
        assert_eq!(
            err.to_string(),
            "close `cparen` at position 4 where `end` was expected"
        );
    }
}
