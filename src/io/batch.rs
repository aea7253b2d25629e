use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::engine::{segment_document, segment_document_verified, ParseOutcome, SegmenterConfig};
use crate::io::input::load_pages_file;
use crate::io::output::{write_outcome, FailureRoster};
use crate::llm::{IntentClassifier, SpeakerVerifier};

/// Counts from a completed batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents attempted.
    pub processed: usize,
    /// Documents that failed and were recorded in the roster.
    pub failed: usize,
}

/// Segment one page-map file and write the result.
pub async fn process_document<C, V>(
    input: &Path,
    output: &Path,
    config: &SegmenterConfig,
    no_verify: bool,
    classifier: &C,
    verifier: &V,
) -> Result<ParseOutcome>
where
    C: IntentClassifier,
    V: SpeakerVerifier,
{
    info!("Loading pages from {:?}", input);
    let pages = load_pages_file(input).context("Failed to load page map")?;
    info!("Loaded {} pages", pages.len());

    let outcome = if no_verify {
        segment_document(&pages, classifier, config).await?
    } else {
        segment_document_verified(&pages, classifier, verifier, config).await?
    };

    match &outcome {
        ParseOutcome::Segmented(store) => info!(
            "Segmented: {} commentary records, {} analysts, {} closing records",
            store.commentary_and_future_outlook.len(),
            store.analyst_discussion.len(),
            store.end.len()
        ),
        ParseOutcome::Flat(map) => {
            info!("No moderator found, produced flat map of {} speakers", map.len())
        }
    }

    write_outcome(&outcome, output)?;
    info!("Output written to {:?}", output);
    Ok(outcome)
}

/// Segment every page-map JSON file in a directory.
///
/// A failing document is recorded in the roster and the run continues with
/// the next one; a document that succeeds is cleared from the roster. With
/// `retry_failed`, only documents currently in the roster are attempted.
pub async fn run_batch<C, V>(
    input_dir: &Path,
    output_dir: &Path,
    roster_path: &Path,
    retry_failed: bool,
    no_verify: bool,
    config: &SegmenterConfig,
    classifier: &C,
    verifier: &V,
) -> Result<BatchSummary>
where
    C: IntentClassifier,
    V: SpeakerVerifier,
{
    let mut roster = FailureRoster::load(roster_path)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut documents: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory: {:?}", input_dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    documents.sort();

    if retry_failed {
        documents.retain(|path| {
            path.file_name()
                .is_some_and(|name| roster.contains(&name.to_string_lossy()))
        });
        info!("Retrying {} previously failed documents", documents.len());
    } else {
        info!("Processing {} documents", documents.len());
    }

    let mut summary = BatchSummary::default();
    for document in documents {
        let name = document
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        summary.processed += 1;
        let result = process_document(
            &document,
            &output_dir.join(&name),
            config,
            no_verify,
            classifier,
            verifier,
        )
        .await;

        match result {
            Ok(_) => roster.clear(&name),
            Err(e) => {
                warn!("Document {} failed: {:#}", name, e);
                roster.record(&name);
                summary.failed += 1;
            }
        }
    }

    roster.save(roster_path)?;
    info!(
        "Batch complete: {} documents in the failure roster",
        roster.len()
    );
    Ok(summary)
}
