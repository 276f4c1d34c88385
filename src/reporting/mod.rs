mod reporter;

pub use reporter::{write_report, RunSummary};
