use std::fmt;
use std::path::Path;
use tracing::info;
use crate::core::OptimizationOutcome;
use crate::utils::{write_atomic, OptimizerResult};

/// Serializes outcomes as a pretty-printed JSON array (2-space indent) and
/// writes it to `path`, replacing any existing file.
pub async fn write_report(outcomes: &[OptimizationOutcome], path: impl AsRef<Path>) -> OptimizerResult<()> {
    let path = path.as_ref();
    let mut json = serde_json::to_vec_pretty(outcomes)?;
    json.push(b'\n');
    write_atomic(path, &json).await?;
    info!("Wrote {} results to {}", outcomes.len(), path.display());
    Ok(())
}

/// Totals over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed_images: usize,
    pub optimized_images: usize,
    pub failed_images: usize,
    pub total_original_size: u64,
    pub total_new_size: u64,
}

impl RunSummary {
    pub fn from_outcomes(listed_images: usize, outcomes: &[OptimizationOutcome]) -> Self {
        Self {
            listed_images,
            optimized_images: outcomes.len(),
            failed_images: listed_images.saturating_sub(outcomes.len()),
            total_original_size: outcomes.iter().map(|o| o.original_size).sum(),
            total_new_size: outcomes.iter().map(|o| o.new_size).sum(),
        }
    }

    /// Bytes saved across all outcomes (negative if the library grew)
    pub fn total_reduction(&self) -> i64 {
        self.total_original_size as i64 - self.total_new_size as i64
    }

    fn safe_div(numerator: f64, denominator: f64) -> f64 {
        if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        }
    }

    fn reduction_percentage(&self) -> f64 {
        Self::safe_div(self.total_reduction() as f64, self.total_original_size as f64) * 100.0
    }

    fn format_bytes(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", Self::safe_div(bytes as f64, GB as f64))
        } else if bytes >= MB {
            format!("{:.2} MB", Self::safe_div(bytes as f64, MB as f64))
        } else if bytes >= KB {
            format!("{:.2} KB", Self::safe_div(bytes as f64, KB as f64))
        } else {
            format!("{} B", bytes)
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Optimization Summary ===")?;
        writeln!(f, "- Images Listed: {}", self.listed_images)?;
        writeln!(f, "- Images Optimized: {}", self.optimized_images)?;
        writeln!(f, "- Failed Images: {}", self.failed_images)?;
        writeln!(f, "- Size: {} → {}",
            Self::format_bytes(self.total_original_size),
            Self::format_bytes(self.total_new_size)
        )?;

        let reduction = self.total_reduction();
        let sign = if reduction < 0 { "-" } else { "" };
        write!(f, "- Saved: {}{} ({:.1}%)",
            sign,
            Self::format_bytes(reduction.unsigned_abs()),
            self.reduction_percentage()
        )
    }
}
