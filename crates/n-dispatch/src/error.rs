//! Error types for the dispatch core.
//!
//! Failures fall into distinct families so callers can branch on them:
//!
//! - **Allocation** — [`ActionError::Alloc`]. Nothing was inserted.
//! - **Policy** — [`MapError`]. The binding store refused the mapping.
//! - **Configuration** — [`ConfigError`]. An rc file could not be read or
//!   contained an invalid directive.
//!
//! Invalid identifiers (an out-of-range mode index, a key that was never
//! mapped) are not errors at all: those operations return `bool`.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

/// Creating an action failed.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Duplicating the name or help text, or growing the registry, ran out
    /// of memory. The registry is unchanged.
    #[error("out of memory while creating action")]
    Alloc(#[from] TryReserveError),
}

/// A key binding was rejected by the store's policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The empty key sequence can never be typed.
    #[error("cannot map an empty key sequence")]
    EmptyKey,

    /// The alias starts with the key it is bound to, so resolving the key
    /// would expand into itself forever.
    #[error("alias `{alias}` would re-trigger `{key}`")]
    AliasLoop { key: String, alias: String },

    /// The key already has a binding and `force` was not given.
    #[error("`{0}` is already mapped")]
    Exists(String),
}

/// Loading or applying an rc file failed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {kind}")]
    Parse {
        line: usize,
        #[source]
        kind: ParseError,
    },

    /// A well-formed `map` directive the binding store refused.
    #[error("line {line}: {source}")]
    Map { line: usize, source: MapError },
}

/// What is wrong with one rc-file line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    #[error("unknown mode `{0}`")]
    UnknownMode(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("unexpected `{0}`")]
    TrailingArgument(String),

    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: String, value: String },
}
