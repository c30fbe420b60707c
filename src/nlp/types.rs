//! Types shared across annotation backends.

use thiserror::Error;

use super::tree::{Tree, TreeError};

/// A token with its 1-based position in the sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedWord {
    pub index: usize,
    pub word: String,
}

impl IndexedWord {
    pub fn new(index: usize, word: impl Into<String>) -> Self {
        Self {
            index,
            word: word.into(),
        }
    }
}

/// A labeled governor -> dependent relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub governor: IndexedWord,
    pub dependent: IndexedWord,
    pub relation: String,
}

/// Basic dependencies of one sentence.
///
/// The root token is not an edge; it has no governor inside the sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    pub root: Option<IndexedWord>,
    pub edges: Vec<DependencyEdge>,
}

/// Pipeline output for one sentence as split by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSentence {
    pub tree: Tree,
    pub dependencies: DependencyGraph,
}

/// Pipeline output for one input text.
///
/// Backends split sentences themselves, so a single input may yield more
/// than one sentence (or none for blank input).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub sentences: Vec<AnnotatedSentence>,
}

/// Errors from annotation backends.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Response is missing `{0}` (check the configured annotators)")]
    MissingField(&'static str),

    #[error("Malformed constituency tree: {0}")]
    Tree(#[from] TreeError),
}
