//! Types shared across report loading, writing and reading.

use std::path::PathBuf;

use thiserror::Error;

use crate::nlp::PipelineError;

/// One input sentence paired with its pre-computed side-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceRecord {
    /// 1-based position in the sentence list.
    pub number: usize,
    pub text: String,
    /// Side-file line, passed through verbatim.
    pub annotation_line: String,
}

/// Outcome of a report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    /// Input sentences processed.
    pub sentences: usize,
    /// Blocks written (the pipeline may split an input into several sentences).
    pub blocks: usize,
    pub output: PathBuf,
}

/// Errors from report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to read side-file {}: {source}", path.display())]
    SideFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "No side-file line for sentence {index}: {sentences} sentences but only {lines} side-file lines"
    )]
    MissingAnnotation {
        index: usize,
        sentences: usize,
        lines: usize,
    },

    #[error("Failed to write report {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Annotation failed for sentence {index}: {source}")]
    Pipeline {
        index: usize,
        #[source]
        source: PipelineError,
    },

    #[error("Malformed report at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
