//! Report generation: side-file loading, dependency tables, the text
//! report itself, and reading it back.
//!
//! Each sentence becomes one block:
//!
//! ```text
//! {n}. {sentence text}
//! {side-file line}
//! {constituency tree, Penn layout}
//! {idx}\t{word}\t{relation}\t{governor idx}   (one row per token)
//! <blank line>
//! ```

mod dependencies;
mod export;
mod reader;
mod side_file;
mod types;
mod writer;

pub use dependencies::{dependency_rows, DependencyRow, ROOT_RELATION};
pub use export::{export_trees, remove_outer_layer};
pub use reader::{parse_report, ReportEntry};
pub use side_file::{load_side_file, pair_records, TaggedToken};
pub use types::{ReportError, ReportSummary, SentenceRecord};
pub use writer::{format_block, format_header, generate_report, ReportWriter, LINE_ENDING};
