//! EVALB input: one bracketed tree per line, without the outer root layer.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use super::reader::ReportEntry;
use super::types::ReportError;
use super::writer::ReportWriter;

static OUTER_LAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\((?:TOP|ROOT)\s+(.*)\)$").expect("valid outer layer regex")
});

/// Strip a `(ROOT ...)` or `(TOP ...)` wrapper from a single-line tree.
///
/// Anything else is returned unchanged.
pub fn remove_outer_layer(tree: &str) -> &str {
    OUTER_LAYER
        .captures(tree)
        .and_then(|caps| caps.get(1))
        .map_or(tree, |inner| inner.as_str())
}

/// Write each entry's tree on its own line. Entries without a tree get an
/// empty line so positions stay aligned with the gold file.
pub fn export_trees(entries: &[ReportEntry], output: &Path) -> Result<usize, ReportError> {
    let mut writer = ReportWriter::create(output)?;

    for entry in entries {
        if entry.tree.is_empty() {
            warn!("Entry {} has no tree; writing an empty line", entry.number);
        }
        writer.write_line(remove_outer_layer(&entry.tree))?;
    }

    let path = writer.finish()?;
    info!("Exported {} trees to {}", entries.len(), path.display());
    Ok(entries.len())
}
