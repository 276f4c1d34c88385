//! The bulk optimization pipeline: list, transform, report.

use anyhow::Context;
use tracing::debug;
use crate::core::OptimizerSettings;
use crate::processing::{list_all_images, BatchConfig, BatchProcessor};
use crate::remote::MediaService;
use crate::reporting::{write_report, RunSummary};

/// Runs the whole pipeline against `service`.
///
/// Listing and report failures are fatal; per-image failures only show up
/// in the logs and in the summary's failure count.
pub async fn run<S>(settings: &OptimizerSettings, service: &S) -> anyhow::Result<RunSummary>
where
    S: MediaService + ?Sized,
{
    let records = list_all_images(service, &settings.folder)
        .await
        .with_context(|| format!("Listing images under prefix '{}' failed", settings.folder))?;

    let processor = BatchProcessor::new(service, BatchConfig::from(settings))
        .context("Invalid batch configuration")?;
    let result = processor
        .process_batch(&records, |progress| {
            debug!(
                "Chunk {}/{} done - {}/{} images processed, {} failed",
                progress.current_chunk,
                progress.total_chunks,
                progress.processed_images,
                progress.total_images,
                progress.failed_images.len()
            );
        })
        .await;

    write_report(&result.outcomes, &settings.output_file)
        .await
        .with_context(|| format!("Writing report to {} failed", settings.output_file.display()))?;

    Ok(RunSummary::from_outcomes(records.len(), &result.outcomes))
}

