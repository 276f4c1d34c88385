pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;

pub use error::{OptimizerError, OptimizerResult};
pub use validation::{validate_settings, validate_transform, validate_concurrency};
pub use formats::OutputFormat;
pub use fs::{ensure_parent_dir, write_atomic};
