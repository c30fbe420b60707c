//! Evaluation of a report against a gold-standard report.
//!
//! Dependency scores are computed per sentence over `(dependent, governor)`
//! pairs: UAS counts matching attachments, LAS additionally requires the
//! same relation label.
//!
//! Tag scores compare the side-file tokens position by position, once for
//! the universal tag (UPOS) and once for the treebank tag (POS). Precision,
//! recall and F1 are per-tag values averaged with each tag's gold count as
//! its weight.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::report::{ReportEntry, TaggedToken};

/// Errors from evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Gold standard has {gold} sentences but predictions have {predicted}")]
    LengthMismatch { gold: usize, predicted: usize },
}

/// Scores for one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceScore {
    pub number: usize,
    pub text: String,
    pub uas: f64,
    pub las: f64,
    pub root_correct: bool,
    pub complete_match: bool,
}

/// Mean scores over all sentences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationSummary {
    pub average_uas: f64,
    pub average_las: f64,
    pub root_accuracy: f64,
    pub complete_match_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub sentences: Vec<SentenceScore>,
    pub summary: EvaluationSummary,
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total > 0 {
        hits as f64 / total as f64
    } else {
        0.0
    }
}

/// Labeled attachments keyed by `(dependent, governor)`.
fn attachments(entry: &ReportEntry) -> BTreeMap<(usize, usize), &str> {
    entry
        .dependencies
        .iter()
        .map(|row| ((row.dependent_index, row.governor_index), row.relation.as_str()))
        .collect()
}

/// Score a single predicted sentence against its gold counterpart.
pub fn score_sentence(gold: &ReportEntry, predicted: &ReportEntry) -> SentenceScore {
    let gold_deps = attachments(gold);
    let pred_deps = attachments(predicted);

    let total = gold_deps.len();
    let mut unlabeled = 0usize;
    let mut labeled = 0usize;
    for (key, relation) in &gold_deps {
        if let Some(pred_relation) = pred_deps.get(key) {
            unlabeled += 1;
            if pred_relation == relation {
                labeled += 1;
            }
        }
    }

    SentenceScore {
        number: gold.number,
        text: gold.text.clone(),
        uas: ratio(unlabeled, total),
        las: ratio(labeled, total),
        root_correct: gold.root_index() == predicted.root_index(),
        complete_match: gold_deps == pred_deps,
    }
}

/// Evaluate predictions position by position against the gold standard.
pub fn evaluate_dependencies(
    gold: &[ReportEntry],
    predicted: &[ReportEntry],
) -> Result<EvaluationReport, EvalError> {
    if gold.len() != predicted.len() {
        return Err(EvalError::LengthMismatch {
            gold: gold.len(),
            predicted: predicted.len(),
        });
    }

    let sentences: Vec<SentenceScore> = gold
        .iter()
        .zip(predicted)
        .map(|(g, p)| {
            if g.text != p.text {
                debug!(
                    "Sentence {} text differs: gold {:?}, predicted {:?}",
                    g.number, g.text, p.text
                );
            }
            score_sentence(g, p)
        })
        .collect();

    let summary = summarize(&sentences);
    Ok(EvaluationReport { sentences, summary })
}

fn summarize(scores: &[SentenceScore]) -> EvaluationSummary {
    if scores.is_empty() {
        return EvaluationSummary::default();
    }
    let n = scores.len() as f64;
    let mean = |f: &dyn Fn(&SentenceScore) -> f64| scores.iter().map(f).sum::<f64>() / n;
    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    EvaluationSummary {
        average_uas: mean(&|s| s.uas),
        average_las: mean(&|s| s.las),
        root_accuracy: mean(&|s| flag(s.root_correct)),
        complete_match_rate: mean(&|s| flag(s.complete_match)),
    }
}

/// Which tag of a side-file token is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSet {
    Upos,
    Pos,
}

impl TagSet {
    pub fn name(self) -> &'static str {
        match self {
            TagSet::Upos => "UPOS",
            TagSet::Pos => "POS",
        }
    }

    fn tag(self, token: &TaggedToken) -> &str {
        match self {
            TagSet::Upos => &token.upos,
            TagSet::Pos => &token.xpos,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TagMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// A gold token whose tag the prediction got wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMismatch {
    /// 1-based token position.
    pub position: usize,
    pub token: TaggedToken,
    pub gold: String,
    /// Empty when the prediction has no token at this position.
    pub predicted: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagScores {
    pub metrics: TagMetrics,
    pub mismatches: Vec<TagMismatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentenceTagScore {
    pub number: usize,
    pub text: String,
    pub upos: TagScores,
    pub pos: TagScores,
}

/// Mean tag metrics over all sentences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSummary {
    pub upos: TagMetrics,
    pub pos: TagMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagReport {
    pub sentences: Vec<SentenceTagScore>,
    pub summary: TagSummary,
}

/// Score one tag set of a predicted token sequence against the gold one.
///
/// Gold tokens are the reference: a missing predicted token counts as a
/// wrong tag, surplus predicted tokens are not scored.
pub fn score_tags(gold: &[TaggedToken], predicted: &[TaggedToken], set: TagSet) -> TagScores {
    let pairs: Vec<(&str, &str)> = gold
        .iter()
        .enumerate()
        .map(|(i, token)| (set.tag(token), predicted.get(i).map_or("", |p| set.tag(p))))
        .collect();
    let total = pairs.len();

    // Per tag: (true positives, predicted count, gold count).
    let mut counts: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for &(gold_tag, predicted_tag) in &pairs {
        counts.entry(gold_tag).or_default().2 += 1;
        counts.entry(predicted_tag).or_default().1 += 1;
        if gold_tag == predicted_tag {
            counts.entry(gold_tag).or_default().0 += 1;
        }
    }

    let mut metrics = TagMetrics {
        accuracy: ratio(pairs.iter().filter(|(g, p)| g == p).count(), total),
        ..TagMetrics::default()
    };
    for &(hits, predicted_count, support) in counts.values() {
        if support == 0 {
            continue;
        }
        let weight = ratio(support, total);
        let precision = ratio(hits, predicted_count);
        let recall = ratio(hits, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        metrics.precision += weight * precision;
        metrics.recall += weight * recall;
        metrics.f1 += weight * f1;
    }

    let mismatches = gold
        .iter()
        .zip(&pairs)
        .enumerate()
        .filter(|(_, (_, (g, p)))| g != p)
        .map(|(i, (token, (g, p)))| TagMismatch {
            position: i + 1,
            token: token.clone(),
            gold: g.to_string(),
            predicted: p.to_string(),
        })
        .collect();

    TagScores {
        metrics,
        mismatches,
    }
}

/// Evaluate predicted UPOS and POS tags position by position.
pub fn evaluate_tags(
    gold: &[ReportEntry],
    predicted: &[ReportEntry],
) -> Result<TagReport, EvalError> {
    if gold.len() != predicted.len() {
        return Err(EvalError::LengthMismatch {
            gold: gold.len(),
            predicted: predicted.len(),
        });
    }

    let sentences: Vec<SentenceTagScore> = gold
        .iter()
        .zip(predicted)
        .map(|(g, p)| {
            if g.tokens.len() != p.tokens.len() {
                warn!(
                    "Sentence {} has {} gold tokens but {} predicted",
                    g.number,
                    g.tokens.len(),
                    p.tokens.len()
                );
            }
            SentenceTagScore {
                number: g.number,
                text: g.text.clone(),
                upos: score_tags(&g.tokens, &p.tokens, TagSet::Upos),
                pos: score_tags(&g.tokens, &p.tokens, TagSet::Pos),
            }
        })
        .collect();

    let summary = TagSummary {
        upos: mean_metrics(sentences.iter().map(|s| &s.upos.metrics)),
        pos: mean_metrics(sentences.iter().map(|s| &s.pos.metrics)),
    };
    Ok(TagReport { sentences, summary })
}

fn mean_metrics<'a>(metrics: impl ExactSizeIterator<Item = &'a TagMetrics>) -> TagMetrics {
    let n = metrics.len();
    if n == 0 {
        return TagMetrics::default();
    }
    let mut sum = metrics.fold(TagMetrics::default(), |acc, m| TagMetrics {
        accuracy: acc.accuracy + m.accuracy,
        precision: acc.precision + m.precision,
        recall: acc.recall + m.recall,
        f1: acc.f1 + m.f1,
    });
    let n = n as f64;
    sum.accuracy /= n;
    sum.precision /= n;
    sum.recall /= n;
    sum.f1 /= n;
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DependencyRow;

    fn entry(number: usize, rows: &[(usize, &str, &str, usize)]) -> ReportEntry {
        ReportEntry {
            number,
            text: format!("Sentence {}.", number),
            tokens: Vec::new(),
            tree: String::new(),
            dependencies: rows
                .iter()
                .map(|(idx, word, rel, gov)| DependencyRow {
                    dependent_index: *idx,
                    dependent_word: word.to_string(),
                    relation: rel.to_string(),
                    governor_index: *gov,
                })
                .collect(),
        }
    }

    #[test]
    fn test_identical_parses_score_perfectly() {
        let gold = entry(1, &[(1, "rain", "nsubj", 2), (2, "stopped", "ROOT", 0)]);
        let score = score_sentence(&gold, &gold.clone());
        assert_eq!(score.uas, 1.0);
        assert_eq!(score.las, 1.0);
        assert!(score.root_correct);
        assert!(score.complete_match);
    }

    #[test]
    fn test_wrong_label_counts_for_uas_only() {
        let gold = entry(
            1,
            &[(1, "the", "det", 2), (2, "rain", "nsubj", 3), (3, "stopped", "ROOT", 0)],
        );
        let pred = entry(
            1,
            &[(1, "the", "det", 2), (2, "rain", "obj", 3), (3, "stopped", "ROOT", 0)],
        );
        let score = score_sentence(&gold, &pred);
        assert_eq!(score.uas, 1.0);
        assert!((score.las - 2.0 / 3.0).abs() < 1e-9);
        assert!(score.root_correct);
        assert!(!score.complete_match);
    }

    #[test]
    fn test_wrong_root() {
        let gold = entry(1, &[(1, "Thank", "ROOT", 0), (2, "gods", "obj", 1)]);
        let pred = entry(1, &[(1, "Thank", "obj", 2), (2, "gods", "ROOT", 0)]);
        let score = score_sentence(&gold, &pred);
        assert_eq!(score.uas, 0.0);
        assert!(!score.root_correct);
    }

    #[test]
    fn test_empty_gold_scores_zero() {
        let gold = entry(1, &[]);
        let score = score_sentence(&gold, &gold.clone());
        assert_eq!(score.uas, 0.0);
        assert_eq!(score.las, 0.0);
        assert!(score.root_correct);
        assert!(score.complete_match);
    }

    #[test]
    fn test_summary_means() {
        let gold = vec![
            entry(1, &[(1, "a", "ROOT", 0)]),
            entry(2, &[(1, "b", "ROOT", 0)]),
        ];
        let pred = vec![
            entry(1, &[(1, "a", "ROOT", 0)]),
            entry(2, &[(1, "b", "dep", 2)]),
        ];
        let report = evaluate_dependencies(&gold, &pred).unwrap();
        assert_eq!(report.sentences.len(), 2);
        assert_eq!(report.summary.average_uas, 0.5);
        assert_eq!(report.summary.root_accuracy, 0.5);
        assert_eq!(report.summary.complete_match_rate, 0.5);
    }

    #[test]
    fn test_length_mismatch() {
        let gold = vec![entry(1, &[]), entry(2, &[])];
        let err = evaluate_dependencies(&gold, &gold[..1]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::LengthMismatch {
                gold: 2,
                predicted: 1
            }
        ));
    }

    fn tagged(tags: &[(&str, &str, &str)]) -> Vec<TaggedToken> {
        tags.iter()
            .map(|(text, upos, xpos)| TaggedToken {
                text: text.to_string(),
                lemma: text.to_lowercase(),
                upos: upos.to_string(),
                xpos: xpos.to_string(),
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weighted_tag_metrics() {
        let gold = tagged(&[
            ("Rain", "NOUN", "NN"),
            ("fell", "VERB", "VBD"),
            ("all", "NOUN", "NN"),
            ("the", "DET", "DT"),
        ]);
        let pred = tagged(&[
            ("Rain", "NOUN", "NN"),
            ("fell", "NOUN", "VBD"),
            ("all", "NOUN", "NN"),
            ("the", "DET", "DT"),
        ]);

        let upos = score_tags(&gold, &pred, TagSet::Upos);
        assert!(close(upos.metrics.accuracy, 0.75));
        // NOUN: p=2/3 r=1 f=0.8 (weight 1/2); VERB: all zero (1/4); DET: all one (1/4).
        assert!(close(upos.metrics.precision, 7.0 / 12.0));
        assert!(close(upos.metrics.recall, 0.75));
        assert!(close(upos.metrics.f1, 0.65));
        assert_eq!(upos.mismatches.len(), 1);
        let miss = &upos.mismatches[0];
        assert_eq!(miss.position, 2);
        assert_eq!(miss.token.text, "fell");
        assert_eq!((miss.gold.as_str(), miss.predicted.as_str()), ("VERB", "NOUN"));

        let pos = score_tags(&gold, &pred, TagSet::Pos);
        assert_eq!(pos.metrics.accuracy, 1.0);
        assert_eq!(pos.metrics.f1, 1.0);
        assert!(pos.mismatches.is_empty());
    }

    #[test]
    fn test_missing_predicted_token_is_a_mismatch() {
        let gold = tagged(&[("Rain", "NOUN", "NN"), ("fell", "VERB", "VBD")]);
        let pred = tagged(&[("Rain", "NOUN", "NN")]);

        let scores = score_tags(&gold, &pred, TagSet::Pos);
        assert_eq!(scores.metrics.accuracy, 0.5);
        assert_eq!(scores.mismatches[0].position, 2);
        assert_eq!(scores.mismatches[0].predicted, "");
    }

    #[test]
    fn test_no_gold_tokens_scores_zero() {
        let scores = score_tags(&[], &tagged(&[("x", "X", "X")]), TagSet::Upos);
        assert_eq!(scores.metrics, TagMetrics::default());
        assert!(scores.mismatches.is_empty());
    }

    #[test]
    fn test_evaluate_tags_summary() {
        let mut right = entry(1, &[]);
        right.tokens = tagged(&[("Rain", "NOUN", "NN")]);
        let mut wrong = right.clone();
        wrong.tokens[0].upos = "VERB".to_string();

        let report = evaluate_tags(&[right.clone(), right.clone()], &[right, wrong]).unwrap();
        assert_eq!(report.sentences.len(), 2);
        assert_eq!(report.sentences[1].upos.mismatches.len(), 1);
        assert_eq!(report.summary.upos.accuracy, 0.5);
        assert_eq!(report.summary.pos.accuracy, 1.0);

        let err = evaluate_tags(&report_entries(2), &report_entries(3)).unwrap_err();
        assert!(matches!(err, EvalError::LengthMismatch { gold: 2, predicted: 3 }));
    }

    fn report_entries(n: usize) -> Vec<ReportEntry> {
        (1..=n).map(|i| entry(i, &[])).collect()
    }
}
