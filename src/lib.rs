// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod remote;
pub mod processing;
pub mod reporting;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{Config, OptimizationOutcome, OptimizerSettings, RemoteImageRecord};
pub use utils::{OptimizerError, OptimizerResult};
pub use remote::{CloudinaryClient, MediaService};
pub use processing::{list_all_images, BatchConfig, BatchProcessor};
pub use reporting::{write_report, RunSummary};
pub use commands::run;

// The binary entry point lives in main.rs and only wires configuration,
// logging and the HTTP client into `commands::run`.
