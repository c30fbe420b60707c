//! EVALB tree export command.

use std::path::Path;

use console::style;

use parse_report::report::export_trees;

use super::eval::read_report;

/// Write the report's trees one per line to `output`.
pub fn cmd_export_trees(report: &Path, output: &Path) -> anyhow::Result<()> {
    let entries = read_report(report)?;
    let count = export_trees(&entries, output)?;

    println!(
        "{} Exported {} trees to {}",
        style("✓").green(),
        count,
        style(output.display()).bold()
    );
    Ok(())
}
