//! parse-report - constituency and dependency reports from a CoreNLP pipeline.
//!
//! Feeds a configured list of sentences through an external NLP pipeline,
//! merges in pre-computed tagging lines from a side-file, and writes one
//! report block per sentence: the Penn tree plus a dependency table sorted
//! by token index.

pub mod config;
pub mod eval;
pub mod nlp;
pub mod report;
