//! Read a generated report back into structured entries.
//!
//! Used to compare reports produced by different parsers against a gold
//! standard written in the same layout.

use std::sync::LazyLock;

use regex::Regex;

use crate::nlp::Tree;

use super::dependencies::DependencyRow;
use super::side_file::TaggedToken;
use super::types::ReportError;

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s(.*)$").expect("valid header regex"));

static ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\t").expect("valid row regex"));

/// One block of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub number: usize,
    pub text: String,
    pub tokens: Vec<TaggedToken>,
    /// Constituency tree on a single line.
    pub tree: String,
    pub dependencies: Vec<DependencyRow>,
}

impl ReportEntry {
    /// Dependent index of the first ROOT row.
    pub fn root_index(&self) -> Option<usize> {
        self.dependencies
            .iter()
            .find(|row| row.is_root())
            .map(|row| row.dependent_index)
    }
}

fn parse_header(line: &str) -> Option<(usize, String)> {
    let caps = HEADER.captures(line)?;
    let number = caps[1].parse().ok()?;
    Some((number, caps[2].trim().to_string()))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse a report into entries, one per written block.
///
/// Entries start at numbered header lines. The line right after a header is
/// always the side-file line, even when it is blank. A block that follows
/// another without its own header (the pipeline split the input into several
/// sentences) repeats the previous header's number and text.
pub fn parse_report(content: &str) -> Result<Vec<ReportEntry>, ReportError> {
    let lines: Vec<&str> = content.lines().collect();
    let mut entries = Vec::new();
    let mut current_header: Option<(usize, String)> = None;
    let mut i = 0;

    while i < lines.len() {
        if let Some((number, text)) = parse_header(lines[i]) {
            current_header = Some((number, text.clone()));
            i += 1;

            // Another header, or the end of the report: this one produced no block.
            if lines.get(i).map_or(true, |line| parse_header(line).is_some()) {
                entries.push(empty_entry(number, text));
                continue;
            }

            let (entry, next) = parse_block(number, text, &lines, Some(i), i + 1)?;
            entries.push(entry);
            i = next;
            continue;
        }

        if is_blank(lines[i]) {
            i += 1;
            continue;
        }

        let (number, text) = current_header.clone().ok_or_else(|| ReportError::Malformed {
            line: i + 1,
            reason: "block without a numbered header".to_string(),
        })?;

        // A continuation block that opens on a tree had a blank side-file line.
        let (entry, next) = if lines[i].trim_start().starts_with('(') {
            parse_block(number, text, &lines, None, i)?
        } else {
            parse_block(number, text, &lines, Some(i), i + 1)?
        };
        entries.push(entry);
        i = next;
    }

    Ok(entries)
}

fn empty_entry(number: usize, text: String) -> ReportEntry {
    ReportEntry {
        number,
        text,
        tokens: Vec::new(),
        tree: String::new(),
        dependencies: Vec::new(),
    }
}

/// Parse one block whose tree starts at `start` (0-based line index).
///
/// Returns the entry and the index of the line that ended the block.
fn parse_block(
    number: usize,
    text: String,
    lines: &[&str],
    side_line: Option<usize>,
    start: usize,
) -> Result<(ReportEntry, usize), ReportError> {
    let tokens = side_line
        .map(|at| TaggedToken::parse_line(lines[at]))
        .unwrap_or_default();

    let mut end = start;
    while end < lines.len() && !is_blank(lines[end]) && !ROW.is_match(lines[end]) {
        end += 1;
    }
    let tree_lines = &lines[start..end];

    let tree = if tree_lines.is_empty() {
        String::new()
    } else {
        Tree::parse(&tree_lines.join(" "))
            .map_err(|e| ReportError::Malformed {
                line: start + 1,
                reason: e.to_string(),
            })?
            .flat_string()
    };

    let mut dependencies = Vec::new();
    while end < lines.len() && !is_blank(lines[end]) {
        let row = lines[end]
            .parse::<DependencyRow>()
            .map_err(|reason| ReportError::Malformed {
                line: end + 1,
                reason,
            })?;
        dependencies.push(row);
        end += 1;
    }

    let entry = ReportEntry {
        number,
        text,
        tokens,
        tree,
        dependencies,
    };
    Ok((entry, end))
}
