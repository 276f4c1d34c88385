pub mod optimize;

pub use optimize::run;
