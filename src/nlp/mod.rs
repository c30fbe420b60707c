//! Annotation pipeline: the external NLP toolkit behind a trait.
//!
//! `CoreNlpClient` talks to a Stanford CoreNLP server. Tests and other
//! toolkits plug in through `Annotator`.

mod annotator;
mod config;
mod corenlp;
pub mod tree;
mod types;

pub use annotator::Annotator;
pub use config::PipelineConfig;
pub use corenlp::CoreNlpClient;
pub use tree::{Tree, TreeError};
pub use types::{
    AnnotatedSentence, Annotation, DependencyEdge, DependencyGraph, IndexedWord, PipelineError,
};
