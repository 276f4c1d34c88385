//! Core types and configuration.
//!
//! - [`Config`]: immutable run configuration (credentials and tunables)
//! - [`RemoteImageRecord`]: an image listed from the media library
//! - [`TransformSettings`]: the transformation applied to every image
//! - [`OptimizationOutcome`]: before/after metrics for one image

mod config;
mod types;

pub use config::{Config, Credentials, OptimizerSettings};
pub use types::{
    derived_public_id,
    OptimizationOutcome,
    RemoteImageRecord,
    ResourcePage,
    TransformSettings,
    TransformationRequest,
    TransformationResult,
    OPTIMIZED_SUFFIX,
};
