use thiserror::Error;
use std::io;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty input: at least one sequence is required")]
    EmptyInput,

    #[error("Sequence {index} is empty")]
    EmptySequence { index: usize },

    #[error("Sequence {index} contains a non-finite value")]
    NonFiniteValue { index: usize },

    // Raised when the sampled graph falls apart before the tree is complete.
    // Callers are expected to retry with a larger edge budget.
    #[error("Insufficient sampled edges: merged {merged} of {expected} clusters before the edge set ran out")]
    InsufficientEdges { merged: usize, expected: usize },

    #[error("Cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount { requested: usize, n_items: usize },

    #[error("Invalid linkage matrix: {0}")]
    InvalidLinkage(String),

    #[error("Non-finite distance between nodes {a} and {b}")]
    NonFiniteDistance { a: usize, b: usize },

    #[error("Negative distance {distance} between nodes {a} and {b}")]
    NegativeDistance { a: usize, b: usize, distance: f64 },

    #[error("Self-loop on node {node} is not allowed")]
    SelfLoop { node: usize },

    #[error("Node {node} is out of range or already merged")]
    UnknownNode { node: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

// Type alias for Result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn invalid_linkage<S: Into<String>>(msg: S) -> Self {
        Error::InvalidLinkage(msg.into())
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(format!("Thread pool build failed: {}", err))
    }
}
