use futures::future::join_all;
use crate::core::{OptimizationOutcome, RemoteImageRecord, TransformationRequest};
use crate::processing::batch::BatchConfig;
use crate::remote::MediaService;
use crate::utils::{OptimizerResult, validate_concurrency, validate_transform};
use tracing::{debug, warn, info};

/// Represents the progress of a batch processing operation
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub total_images: usize,
    pub processed_images: usize,
    pub current_chunk: usize,
    pub total_chunks: usize,
    pub failed_images: Vec<(String, String)>, // (public_id, error_message)
}

/// Everything a batch run produced
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Successful outcomes in listing order
    pub outcomes: Vec<OptimizationOutcome>,
    pub failed_images: Vec<(String, String)>,
}

/// Requests transformations for many images, at most `concurrency_limit`
/// at a time.
///
/// Records are split into contiguous chunks; every request in a chunk is
/// issued together and the next chunk starts only after all of them have
/// settled.
pub struct BatchProcessor<'a, S: MediaService + ?Sized> {
    service: &'a S,
    config: BatchConfig,
}

impl<'a, S: MediaService + ?Sized> BatchProcessor<'a, S> {
    pub fn new(service: &'a S, config: BatchConfig) -> OptimizerResult<Self> {
        validate_concurrency(config.concurrency_limit)?;
        validate_transform(&config.transform)?;
        debug!(
            "Creating BatchProcessor with concurrency limit of {}",
            config.concurrency_limit
        );
        Ok(Self { service, config })
    }

    /// Splits records into chunks of at most `concurrency_limit`
    fn create_chunks<'r>(&self, records: &'r [RemoteImageRecord]) -> Vec<&'r [RemoteImageRecord]> {
        records.chunks(self.config.concurrency_limit).collect()
    }

    /// Optimizes a single image.
    ///
    /// The outcome is computed from the original record and the artifact the
    /// service reports back.
    pub async fn process_one(&self, record: &RemoteImageRecord) -> OptimizerResult<OptimizationOutcome> {
        let request = TransformationRequest::for_record(record, &self.config.transform, &self.config.folder);
        let result = self.service.transform(&request).await?;

        if result.public_id != request.destination_public_id {
            warn!(
                "Service stored {} as {} instead of {}",
                record.public_id, result.public_id, request.destination_public_id
            );
        }

        let outcome = OptimizationOutcome::new(record, &result);
        debug!(
            "Image optimized - {}: {} -> {} bytes ({} -> {})",
            record.public_id, outcome.original_size, outcome.new_size,
            outcome.before_format, outcome.after_format
        );
        Ok(outcome)
    }

    /// Issues every request in the chunk at once and waits for all of them
    async fn process_chunk(&self, chunk: &[RemoteImageRecord]) -> Vec<OptimizerResult<OptimizationOutcome>> {
        join_all(chunk.iter().map(|record| self.process_one(record))).await
    }

    /// Processes all records with progress tracking.
    ///
    /// Per-image failures are logged and collected; they never abort the run.
    pub async fn process_batch(
        &self,
        records: &[RemoteImageRecord],
        mut progress_callback: impl FnMut(BatchProgress),
    ) -> BatchResult {
        let total_images = records.len();
        let chunks = self.create_chunks(records);
        info!("Processing {} images in {} chunks", total_images, chunks.len());

        let mut processed_count = 0;
        let mut result = BatchResult::default();

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            // Only log at important milestones to reduce noise
            if chunk_index == 0 || chunk_index == chunks.len() - 1 || chunk_index % 10 == 0 {
                debug!("Processing chunk {}/{}", chunk_index + 1, chunks.len());
            }

            let outcomes = self.process_chunk(chunk).await;
            for (record, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(outcome) => result.outcomes.push(outcome),
                    Err(e) => {
                        warn!("Failed to optimize {}: {}", record.public_id, e);
                        result.failed_images.push((record.public_id.clone(), e.to_string()));
                    }
                }
            }
            processed_count += chunk.len();

            progress_callback(BatchProgress {
                total_images,
                processed_images: processed_count,
                current_chunk: chunk_index + 1,
                total_chunks: chunks.len(),
                failed_images: result.failed_images.clone(),
            });
        }

        if !result.failed_images.is_empty() {
            warn!(
                "Batch processing completed with {} failed images out of {}",
                result.failed_images.len(),
                total_images
            );
        } else {
            info!("Batch processing completed successfully: {} images optimized", result.outcomes.len());
        }

        result
    }

    /// Processes all records and returns the successful outcomes in order
    pub async fn process_all(&self, records: &[RemoteImageRecord]) -> Vec<OptimizationOutcome> {
        self.process_batch(records, |_| {}).await.outcomes
    }
}
