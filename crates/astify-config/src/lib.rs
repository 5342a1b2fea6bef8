//! Declarative grammar files.
//!
//! A TOML file describes tokeniser rules, blocks and groups; [`GrammarConfig`]
//! loads it and builds the [`Tokeniser`] and [`Grammar`] it describes. Token
//! reactions are closures and cannot be written in TOML: add them to
//! [`GrammarConfig::grammar_builder`] before building.
//!
//! ```toml
//! application = "overlapping"
//! unmatched = "skip"
//! max_depth = 64
//!
//! [[rules]]
//! name = "id"
//! pattern = "[a-z]+"
//!
//! [[rules]]
//! name = "ws"
//! pattern = "\\s+"
//! discard = true
//!
//! [[blocks]]
//! open = "oparen"
//! close = "cparen"
//! name = "group"
//!
//! [groups]
//! var = ["int", "id"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use astify_syntax::{
    Application, DEFAULT_MAX_DEPTH, DefinitionError, Emit, Grammar, GrammarBuilder, RuleMatch,
    Token, TokenKind, Tokeniser, TokeniserBuilder, Value,
};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token name used for unmatched characters under `unmatched = "char"`.
pub const UNMATCHED_CHAR: &str = "char";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read grammar file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse grammar file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid grammar: {0}")]
    InvalidGrammar(#[from] DefinitionError),
}

/// How rules are applied at each scan position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationMode {
    #[default]
    Overlapping,
    Chained,
}

impl From<ApplicationMode> for Application {
    fn from(mode: ApplicationMode) -> Self {
        match mode {
            ApplicationMode::Overlapping => Application::Overlapping,
            ApplicationMode::Chained => Application::Chained,
        }
    }
}

/// What happens to characters no rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    #[default]
    Skip,
    /// One [`UNMATCHED_CHAR`] token per character.
    Char,
}

/// The value a rule puts in its tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// The matched text.
    #[default]
    Text,
    /// The matched text as an integer, or as text if it does not parse.
    Int,
    /// The matched text as a symbol, e.g. `id(:+)`.
    Symbol,
    /// No value at all, e.g. `oparen`.
    Bare,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discard: bool,
    /// Emit this capture group instead of the whole match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<usize>,
    #[serde(default)]
    pub value: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub open: String,
    pub close: String,
    /// Tag for the block's branch; untagged when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    #[serde(default)]
    pub application: ApplicationMode,
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            application: ApplicationMode::default(),
            unmatched: UnmatchedPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            rules: Vec::new(),
            blocks: Vec::new(),
            groups: BTreeMap::new(),
        }
    }
}

impl GrammarConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        debug!(
            "loaded grammar from {}: {} rules, {} blocks",
            config_path.display(),
            config.rules.len(),
            config.blocks.len()
        );
        Ok(Some(config))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// A tokeniser builder holding every configured rule, in file order.
    pub fn tokeniser_builder(&self) -> Result<TokeniserBuilder, ConfigError> {
        let mut builder = Tokeniser::builder().application(self.application.into());

        for rule in &self.rules {
            builder = if rule.discard {
                builder.discard(rule.name.as_str(), &rule.pattern)?
            } else {
                let kind = TokenKind::from(rule.name.as_str());
                let (capture, value) = (rule.capture, rule.value);
                builder.rule(kind.clone(), &rule.pattern, move |m: &RuleMatch<'_>| {
                    emit(&kind, capture, value, m)
                })?
            };
        }

        builder = match self.unmatched {
            UnmatchedPolicy::Skip => builder.skip_unmatched(),
            UnmatchedPolicy::Char => builder.fallback(UNMATCHED_CHAR, |c: char| c.to_string()),
        };
        Ok(builder)
    }

    /// A grammar builder holding the configured blocks, groups and depth.
    pub fn grammar_builder(&self) -> GrammarBuilder {
        let mut builder = Grammar::builder().max_depth(self.max_depth);
        for block in &self.blocks {
            let (open, close) = (block.open.as_str(), block.close.as_str());
            builder = match &block.name {
                Some(name) => builder.named_block(name.as_str(), open, close),
                None => builder.block(open, close),
            };
        }
        for (name, members) in &self.groups {
            builder = builder.group(name.as_str(), members.iter().map(String::as_str));
        }
        builder
    }

    pub fn build(&self) -> Result<(Tokeniser, Grammar), ConfigError> {
        let tokeniser = self.tokeniser_builder()?.build();
        let grammar = self.grammar_builder().build();
        debug!(
            "built tokeniser with {} rules and grammar with {} blocks",
            tokeniser.rules().len(),
            grammar.blocks().len()
        );
        Ok((tokeniser, grammar))
    }
}

fn emit(kind: &TokenKind, capture: Option<usize>, value: ValueKind, m: &RuleMatch<'_>) -> Emit {
    let text = match capture {
        Some(index) => m.group(index),
        None => Some(m.text()),
    };
    let Some(text) = text else {
        return Emit::Nothing;
    };
    match value {
        ValueKind::Text => Value::from(text).into(),
        ValueKind::Int => text
            .parse::<i64>()
            .map_or_else(|_| Value::from(text), Value::from)
            .into(),
        ValueKind::Symbol => Value::from(TokenKind::from(text)).into(),
        ValueKind::Bare => Token::bare(kind.clone()).into(),
    }
}
