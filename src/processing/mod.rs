mod lister;
pub mod batch;

pub use lister::list_all_images;
pub use batch::{BatchConfig, BatchProcessor, BatchProgress, BatchResult};
