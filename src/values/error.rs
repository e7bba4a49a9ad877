// ABOUTME: Error types for value resolution
// ABOUTME: Covers values file parsing and --set override syntax failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValuesError {
    #[error("failed to parse {}: {cause}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        cause: FragmentError,
    },

    #[error("failed parsing --set data {input:?}: {source}")]
    Override {
        input: String,
        source: OverrideError,
    },
}

/// Why a values file could not become a mapping fragment.
#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expected a mapping at the top level, found a {0}")]
    NotAMapping(&'static str),

    #[error("unsupported mapping key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideError {
    #[error("key {key:?} has no value")]
    NoValue { key: String },

    #[error("key {key:?} has no value (cannot end with ,)")]
    TrailingComma { key: String },

    #[error("key map {key:?} has no value")]
    EmptyMap { key: String },

    #[error("empty key")]
    EmptyKey,

    #[error("error parsing index: missing closing ']'")]
    UnclosedIndex,

    #[error("error parsing index: {0:?} is not a number")]
    InvalidIndex(String),

    #[error("negative {0} index not allowed")]
    NegativeIndex(i64),

    #[error("index of {index} is greater than maximum supported index {max}")]
    IndexTooLarge { index: usize, max: usize },

    #[error("unexpected data at end of array index: {0:?}")]
    UnexpectedIndexData(String),

    #[error("list must terminate with '}}'")]
    UnterminatedList,
}

pub type Result<T> = std::result::Result<T, ValuesError>;
