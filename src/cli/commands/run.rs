//! Report generation command.

use anyhow::Context;
use console::style;
use tracing::info;

use parse_report::config::Settings;
use parse_report::nlp::{Annotator, CoreNlpClient};
use parse_report::report::{generate_report, load_side_file, pair_records};

/// Annotate every configured sentence and write the report.
pub async fn cmd_run(settings: Settings) -> anyhow::Result<()> {
    settings.validate()?;

    // Both side-file failure modes stop the run before the report is touched.
    let lines = load_side_file(&settings.side_file)?;
    let records = pair_records(&settings.sentences, lines)?;

    let client = CoreNlpClient::new(settings.pipeline.clone())
        .context("Failed to create CoreNLP client")?;
    if !client.is_available().await {
        anyhow::bail!(
            "{} is not available: {}",
            client.display_name(),
            client.availability_hint()
        );
    }
    info!(
        "Annotating {} sentences with {} at {} ({})",
        records.len(),
        client.display_name(),
        client.config().base_url(),
        client.config().annotators.join(",")
    );

    let summary = generate_report(&client, &records, &settings.output).await?;

    println!(
        "{} Output written to {}",
        style("✓").green(),
        style(summary.output.display()).bold()
    );
    Ok(())
}
