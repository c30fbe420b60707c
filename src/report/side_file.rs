//! Side-file of pre-computed tagging output, one line per input sentence.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use super::types::{ReportError, SentenceRecord};

/// Read the side-file into its lines, in order.
pub fn load_side_file(path: &Path) -> Result<Vec<String>, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::SideFile {
        path: path.to_path_buf(),
        source,
    })?;

    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    debug!("Loaded {} side-file lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Pair each sentence with the side-file line at the same position.
///
/// Fails before any work is done when a sentence has no line, naming the
/// first sentence without one. Surplus lines are ignored.
pub fn pair_records(
    sentences: &[String],
    lines: Vec<String>,
) -> Result<Vec<SentenceRecord>, ReportError> {
    if lines.len() < sentences.len() {
        return Err(ReportError::MissingAnnotation {
            index: lines.len() + 1,
            sentences: sentences.len(),
            lines: lines.len(),
        });
    }
    if lines.len() > sentences.len() {
        warn!(
            "Side-file has {} lines for {} sentences; ignoring the extra lines",
            lines.len(),
            sentences.len()
        );
    }

    Ok(sentences
        .iter()
        .zip(lines)
        .enumerate()
        .map(|(i, (text, annotation_line))| SentenceRecord {
            number: i + 1,
            text: text.clone(),
            annotation_line,
        })
        .collect())
}

/// One token of a Stanza side-file line: `text\lemma\upos\xpos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub lemma: String,
    pub upos: String,
    pub xpos: String,
}

impl TaggedToken {
    /// Parse a whole side-file line. Tokens are tab-separated and the line
    /// usually ends with a tab. Missing fields are left empty.
    pub fn parse_line(line: &str) -> Vec<TaggedToken> {
        line.split('\t')
            .filter(|tok| !tok.trim().is_empty())
            .map(TaggedToken::parse)
            .collect()
    }

    fn parse(token: &str) -> TaggedToken {
        let mut fields = token.trim().splitn(4, '\\');
        let mut next = || fields.next().unwrap_or_default().to_string();
        TaggedToken {
            text: next(),
            lemma: next(),
            upos: next(),
            xpos: next(),
        }
    }
}

impl fmt::Display for TaggedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}\\{}\\{}", self.text, self.lemma, self.upos, self.xpos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Sentence {}.", i)).collect()
    }

    #[test]
    fn test_pair_records_aligns_by_position() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let records = pair_records(&sentences(2), lines).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].number, 1);
        assert_eq!(records[0].text, "Sentence 1.");
        assert_eq!(records[0].annotation_line, "a");
        assert_eq!(records[1].number, 2);
        assert_eq!(records[1].annotation_line, "b");
    }

    #[test]
    fn test_short_side_file_names_first_missing_index() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let err = pair_records(&sentences(5), lines).unwrap_err();
        match err {
            ReportError::MissingAnnotation {
                index,
                sentences,
                lines,
            } => {
                assert_eq!(index, 3);
                assert_eq!(sentences, 5);
                assert_eq!(lines, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_side_file_fails_at_first_sentence() {
        let err = pair_records(&sentences(1), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingAnnotation { index: 1, .. }
        ));
    }

    #[test]
    fn test_extra_lines_are_ignored() {
        let lines = vec!["a".into(), "b".into(), "c".into()];
        let records = pair_records(&sentences(2), lines).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = load_side_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::SideFile { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn test_load_preserves_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("side.txt");
        std::fs::write(&path, "All\\all\\DET\\DT\t\r\n  spaced line \t\n").unwrap();
        let lines = load_side_file(&path).unwrap();
        assert_eq!(lines, vec!["All\\all\\DET\\DT\t", "  spaced line \t"]);
    }

    #[test]
    fn test_parse_tagged_line() {
        let tokens = TaggedToken::parse_line("The\\the\\DET\\DT\tdate\\date\\NOUN\\NN\t");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "The");
        assert_eq!(tokens[0].lemma, "the");
        assert_eq!(tokens[0].upos, "DET");
        assert_eq!(tokens[0].xpos, "DT");
        assert_eq!(tokens[1].to_string(), "date\\date\\NOUN\\NN");
    }

    #[test]
    fn test_parse_tagged_token_with_missing_fields() {
        let tokens = TaggedToken::parse_line("word");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "word");
        assert!(tokens[0].upos.is_empty());
    }
}
