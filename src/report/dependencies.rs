//! Dependency-edge table: one row per token, sorted by token index.

use std::fmt;
use std::str::FromStr;

use crate::nlp::DependencyGraph;

/// Relation label written for the sentence root.
pub const ROOT_RELATION: &str = "ROOT";

/// One row of the dependency table.
///
/// Renders as `dependentIndex<TAB>dependentWord<TAB>relation<TAB>governorIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRow {
    pub dependent_index: usize,
    pub dependent_word: String,
    pub relation: String,
    /// 0 for the root row.
    pub governor_index: usize,
}

impl DependencyRow {
    pub fn is_root(&self) -> bool {
        self.relation == ROOT_RELATION
    }
}

impl fmt::Display for DependencyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.dependent_index, self.dependent_word, self.relation, self.governor_index
        )
    }
}

impl FromStr for DependencyRow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').collect();
        if fields.len() != 4 {
            return Err(format!("expected 4 tab-separated fields, found {}", fields.len()));
        }
        let dependent_index = fields[0]
            .trim()
            .parse()
            .map_err(|_| format!("bad dependent index {:?}", fields[0]))?;
        let governor_index = fields[3]
            .trim()
            .parse()
            .map_err(|_| format!("bad governor index {:?}", fields[3]))?;

        Ok(DependencyRow {
            dependent_index,
            dependent_word: fields[1].to_string(),
            relation: fields[2].to_string(),
            governor_index,
        })
    }
}

/// Flatten a dependency graph into table rows.
///
/// The root (if any) becomes a synthetic `ROOT` row governed by 0, followed
/// by one row per edge. Rows are then stably sorted by dependent index, so the
/// order edges were delivered in never leaks into the output.
pub fn dependency_rows(graph: &DependencyGraph) -> Vec<DependencyRow> {
    let mut rows = Vec::with_capacity(graph.edges.len() + 1);

    if let Some(root) = &graph.root {
        rows.push(DependencyRow {
            dependent_index: root.index,
            dependent_word: root.word.clone(),
            relation: ROOT_RELATION.to_string(),
            governor_index: 0,
        });
    }

    rows.extend(graph.edges.iter().map(|edge| DependencyRow {
        dependent_index: edge.dependent.index,
        dependent_word: edge.dependent.word.clone(),
        relation: edge.relation.clone(),
        governor_index: edge.governor.index,
    }));

    rows.sort_by_key(|row| row.dependent_index);
    rows
}
