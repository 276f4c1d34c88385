use crate::core::{OptimizerSettings, TransformSettings};

/// What the batch processor applies and how many requests it keeps in flight.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub concurrency_limit: usize,
    /// Folder the optimized copies are stored in
    pub folder: String,
    pub transform: TransformSettings,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from(&OptimizerSettings::default())
    }
}

impl From<&OptimizerSettings> for BatchConfig {
    fn from(settings: &OptimizerSettings) -> Self {
        Self {
            concurrency_limit: settings.concurrency_limit,
            folder: settings.folder.clone(),
            transform: settings.transform(),
        }
    }
}

impl BatchConfig {
    pub fn with_concurrency(mut self, concurrency_limit: usize) -> Self {
        self.concurrency_limit = concurrency_limit;
        self
    }
}
