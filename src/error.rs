//! Error types for the syntaxdecoder crate

use thiserror::Error;

use crate::syntax::ItemId;

/// Main error type for the syntaxdecoder crate
///
/// Every variant aborts the derivation it occurs in: a transition-based
/// derivation has no meaningful partial result once a step fails.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("an oracle is required to learn from a gold tree but none was attached")]
    MissingOracle,

    #[error("non-terminal state '{state}' has no valid transitions")]
    NoValidTransitions { state: String },

    #[error("cannot select among zero actions")]
    NoActions,

    #[error("transition '{transition}' requires a non-empty stack")]
    EmptyStack { transition: String },

    #[error("transition '{transition}' requires a non-empty buffer")]
    EmptyBuffer { transition: String },

    #[error("transition '{transition}' of arc type carries no syntactic dependency")]
    MissingDependency { transition: String },

    #[error("spine index {index} is out of range for a spine of {len} nodes")]
    SpineIndexOutOfRange { index: usize, len: usize },

    #[error("item {id} is not an element of the dependency tree")]
    UnknownItem { id: ItemId },

    #[error("item {id} cannot govern itself")]
    SelfAttachment { id: ItemId },

    #[error("score {value} is outside the domain of the {accumulator} accumulator")]
    ScoreOutOfDomain { value: f64, accumulator: String },

    #[error("trees cover different items: expected {expected} elements, got {got}")]
    MismatchedTrees { expected: usize, got: usize },

    #[error("invalid dependency tree: {message}")]
    InvalidTree { message: String },

    #[error("invalid transition system '{input}'. Expected one of: {expected}")]
    ParseSystem { input: String, expected: String },

    #[error("invalid accumulator '{input}'. Expected one of: {expected}")]
    ParseAccumulator { input: String, expected: String },

    #[error("failed to spawn worker '{name}': {source}")]
    WorkerSpawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker '{name}' is no longer running")]
    WorkerDisconnected { name: String },

    #[error("worker '{name}' panicked")]
    WorkerPanicked { name: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
