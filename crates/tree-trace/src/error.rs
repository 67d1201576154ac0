use thiserror::Error;

/// Errors reported by the tree engines.
///
/// `DuplicateKey` and `KeyNotFound` are caller contract violations and are
/// detected before the tree is touched. `Invariant` means the tree reached a
/// shape the algorithms never produce; the operation is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("key {0} is already present")]
    DuplicateKey(String),
    #[error("key {0} is not present")]
    KeyNotFound(String),
    #[error("tree invariant violated: {0}")]
    Invariant(&'static str),
    #[error("invalid trace config: {0}")]
    InvalidConfig(String),
}

impl TreeError {
    pub(crate) fn duplicate<K: std::fmt::Debug>(key: &K) -> Self {
        TreeError::DuplicateKey(format!("{key:?}"))
    }

    pub(crate) fn not_found<K: std::fmt::Debug>(key: &K) -> Self {
        TreeError::KeyNotFound(format!("{key:?}"))
    }
}
