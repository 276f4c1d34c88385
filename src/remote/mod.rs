//! Access to the remote media service.
//!
//! The pipeline only talks to [`MediaService`]; [`CloudinaryClient`] is the
//! HTTP implementation used by the binary.

mod cloudinary;
mod signing;

pub use cloudinary::CloudinaryClient;
pub use signing::sign_params;

use async_trait::async_trait;
use crate::core::{ResourcePage, TransformationRequest, TransformationResult};
use crate::utils::OptimizerResult;

/// Largest page the inventory endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 500;

#[async_trait]
pub trait MediaService: Send + Sync {
    /// Fetches one page of image records stored under `prefix`.
    async fn list_page(
        &self,
        prefix: &str,
        max_results: u32,
        next_cursor: Option<&str>,
    ) -> OptimizerResult<ResourcePage>;

    /// Runs a transformation and returns once the derived artifact exists.
    async fn transform(&self, request: &TransformationRequest) -> OptimizerResult<TransformationResult>;
}
