//! Annotator trait — the seam between report generation and the NLP toolkit.

use async_trait::async_trait;

use super::types::{Annotation, PipelineError};

/// A backend that turns raw sentence text into parse trees and dependencies.
///
/// The report only relies on this interface; any toolkit that can produce a
/// constituency tree and a basic dependency graph can sit behind it.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Human-readable name for log and CLI output.
    fn display_name(&self) -> &str;

    /// Whether the backend is ready to run.
    async fn is_available(&self) -> bool {
        true
    }

    /// Human-readable reason when `is_available` returns false.
    fn availability_hint(&self) -> String {
        String::new()
    }

    /// Annotate a single input text.
    async fn annotate(&self, text: &str) -> Result<Annotation, PipelineError>;
}
