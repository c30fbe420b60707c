//! Report writer: one block per sentence, written as soon as it is built.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::nlp::{AnnotatedSentence, Annotator};

use super::dependencies::dependency_rows;
use super::types::{ReportError, ReportSummary, SentenceRecord};

/// Line terminator used in the report.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// `"{n}. {text}"` header line, terminated.
pub fn format_header(record: &SentenceRecord) -> String {
    format!("{}. {}{}", record.number, record.text, LINE_ENDING)
}

/// Side-file line, Penn tree, sorted dependency rows and a blank separator.
pub fn format_block(record: &SentenceRecord, sentence: &AnnotatedSentence) -> String {
    let mut block = String::new();

    block.push_str(&record.annotation_line);
    block.push_str(LINE_ENDING);

    for line in sentence.tree.penn_string().lines() {
        block.push_str(line);
        block.push_str(LINE_ENDING);
    }

    for row in dependency_rows(&sentence.dependencies) {
        block.push_str(&row.to_string());
        block.push_str(LINE_ENDING);
    }

    block.push_str(LINE_ENDING);
    block
}

/// Buffered report file. Creating one truncates any previous report.
///
/// The file handle is released when the writer is dropped, including on
/// early returns; `finish` flushes and surfaces the final IO error.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<File>,
}

impl ReportWriter {
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        let file = File::create(path).map_err(|source| ReportError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_header(&mut self, record: &SentenceRecord) -> Result<(), ReportError> {
        self.write_str(&format_header(record))
    }

    pub fn write_block(
        &mut self,
        record: &SentenceRecord,
        sentence: &AnnotatedSentence,
    ) -> Result<(), ReportError> {
        self.write_str(&format_block(record, sentence))
    }

    /// Write `line` followed by the report line ending.
    pub fn write_line(&mut self, line: &str) -> Result<(), ReportError> {
        self.write_str(line)?;
        self.write_str(LINE_ENDING)
    }

    /// Flush buffered output. Dropping without calling this may lose errors.
    pub fn finish(mut self) -> Result<PathBuf, ReportError> {
        self.out.flush().map_err(|source| ReportError::Output {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }

    fn write_str(&mut self, text: &str) -> Result<(), ReportError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|source| ReportError::Output {
                path: self.path.clone(),
                source,
            })
    }
}

/// Annotate each record in order and write its report block.
///
/// Strictly sequential: a sentence is annotated, formatted and written before
/// the next one starts. The first failure aborts the run; whatever was
/// already written stays in the file.
pub async fn generate_report(
    annotator: &dyn Annotator,
    records: &[SentenceRecord],
    output: &Path,
) -> Result<ReportSummary, ReportError> {
    let mut writer = ReportWriter::create(output)?;
    let mut blocks = 0usize;
    debug!("Writing report to {}", writer.path().display());

    for record in records {
        writer.write_header(record)?;

        debug!(
            "Sentence {}/{} via {}",
            record.number,
            records.len(),
            annotator.display_name()
        );
        let annotation = annotator
            .annotate(&record.text)
            .await
            .map_err(|source| ReportError::Pipeline {
                index: record.number,
                source,
            })?;

        if annotation.sentences.len() > 1 {
            debug!(
                "Sentence {} was split into {} sentences",
                record.number,
                annotation.sentences.len()
            );
        }

        for sentence in &annotation.sentences {
            writer.write_block(record, sentence)?;
            blocks += 1;
        }
    }

    let output = writer.finish()?;
    info!(
        "Wrote {} blocks for {} sentences to {}",
        blocks,
        records.len(),
        output.display()
    );

    Ok(ReportSummary {
        sentences: records.len(),
        blocks,
        output,
    })
}
