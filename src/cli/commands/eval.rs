//! Evaluation commands: dependency scores and tag scores.

use std::path::Path;

use anyhow::Context;
use console::style;

use parse_report::eval::{evaluate_dependencies, evaluate_tags, TagMetrics, TagScores, TagSet};
use parse_report::report::{parse_report, ReportEntry};

pub(super) fn read_report(path: &Path) -> anyhow::Result<Vec<ReportEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    parse_report(&content).with_context(|| format!("Failed to parse report {}", path.display()))
}

/// Print per-sentence and summary scores for `predicted` against `gold`.
pub fn cmd_eval(gold: &Path, predicted: &Path) -> anyhow::Result<()> {
    let gold_entries = read_report(gold)?;
    let predicted_entries = read_report(predicted)?;

    let report = evaluate_dependencies(&gold_entries, &predicted_entries)?;

    println!(
        "{} {}",
        style("Dependency evaluation:").bold(),
        predicted.display()
    );
    println!(
        "{:>4}  {:>6}  {:>6}  {:>4}  {:>5}  Sentence",
        "#", "UAS", "LAS", "Root", "Match"
    );
    for score in &report.sentences {
        println!(
            "{:>4}  {:>6.3}  {:>6.3}  {:>4}  {:>5}  {}",
            score.number,
            score.uas,
            score.las,
            if score.root_correct { "yes" } else { "no" },
            if score.complete_match { "yes" } else { "no" },
            score.text
        );
    }

    let summary = &report.summary;
    println!();
    println!("{}", style("Summary:").bold());
    println!("  Average UAS:         {:.4}", summary.average_uas);
    println!("  Average LAS:         {:.4}", summary.average_las);
    println!("  Root Accuracy:       {:.4}", summary.root_accuracy);
    println!("  Complete Match Rate: {:.4}", summary.complete_match_rate);

    Ok(())
}

/// Print per-sentence tag scores with their mismatches, then the means.
pub fn cmd_eval_tags(gold: &Path, predicted: &Path) -> anyhow::Result<()> {
    let gold_entries = read_report(gold)?;
    let predicted_entries = read_report(predicted)?;

    let report = evaluate_tags(&gold_entries, &predicted_entries)?;

    println!("{} {}", style("Tag evaluation:").bold(), predicted.display());
    println!(
        "{:>4}  {:>8}  {:>7}  {:>7}  {:>6}  Sentence",
        "#", "UPOS acc", "UPOS F1", "POS acc", "POS F1"
    );
    for score in &report.sentences {
        println!(
            "{:>4}  {:>8.3}  {:>7.3}  {:>7.3}  {:>6.3}  {}",
            score.number,
            score.upos.metrics.accuracy,
            score.upos.metrics.f1,
            score.pos.metrics.accuracy,
            score.pos.metrics.f1,
            score.text
        );
        print_mismatches(TagSet::Upos, &score.upos);
        print_mismatches(TagSet::Pos, &score.pos);
    }

    println!();
    println!("{}", style("Summary:").bold());
    print_metrics(TagSet::Upos, &report.summary.upos);
    print_metrics(TagSet::Pos, &report.summary.pos);

    Ok(())
}

fn print_mismatches(set: TagSet, scores: &TagScores) {
    for miss in &scores.mismatches {
        let predicted = if miss.predicted.is_empty() {
            "(missing)"
        } else {
            miss.predicted.as_str()
        };
        println!(
            "        {} {:>3}  {}  {} -> {}",
            style(set.name()).dim(),
            miss.position,
            miss.token,
            miss.gold,
            style(predicted).red()
        );
    }
}

fn print_metrics(set: TagSet, metrics: &TagMetrics) {
    println!(
        "  {:<4}  Accuracy {:.4}  Precision {:.4}  Recall {:.4}  F1 {:.4}",
        set.name(),
        metrics.accuracy,
        metrics.precision,
        metrics.recall,
        metrics.f1
    );
}
