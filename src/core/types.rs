//! Core types for remote image records, transformation settings and outcomes.

use serde::{Deserialize, Serialize};
use crate::utils::OutputFormat;

/// Suffix appended to a public id to name its optimized copy
pub const OPTIMIZED_SUFFIX: &str = "_optimized";

/// Snapshot of an image stored in the media library.
///
/// Deserialized from the listing endpoint; unknown fields are ignored but
/// every field below must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteImageRecord {
    /// Identifier of the asset, including its folder path
    pub public_id: String,
    /// Stored size in bytes
    pub bytes: u64,
    /// Stored format (png, jpg, webp, ...)
    pub format: String,
}

/// One page of the inventory listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourcePage {
    pub resources: Vec<RemoteImageRecord>,
    /// Opaque continuation cursor; absent on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// The artifact realized by a synchronous transformation request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransformationResult {
    pub public_id: String,
    pub bytes: u64,
    pub format: String,
}

/// Transformation applied to every image.
///
/// Width uses "limit" semantics: images wider than `max_width` are scaled
/// down, narrower images are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSettings {
    pub max_width: u32,
    pub quality: u32,
    pub output_format: OutputFormat,
}

impl TransformSettings {
    /// Renders the chained transformation string understood by the service,
    /// e.g. `c_limit,w_1960/f_auto/q_80`.
    pub fn transformation_string(&self) -> String {
        format!(
            "c_limit,w_{}/f_{}/q_{}",
            self.max_width,
            self.output_format.transformation_value(),
            self.quality
        )
    }
}

/// Parameters of one transformation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRequest {
    pub source_public_id: String,
    /// Access type of the source asset, always `upload` here
    pub access_type: String,
    pub transformation: String,
    /// The call must not return before the derived artifact exists
    pub synchronous: bool,
    pub destination_public_id: String,
    pub destination_folder: String,
}

impl TransformationRequest {
    pub fn for_record(record: &RemoteImageRecord, settings: &TransformSettings, folder: &str) -> Self {
        Self {
            source_public_id: record.public_id.clone(),
            access_type: "upload".to_string(),
            transformation: settings.transformation_string(),
            synchronous: true,
            destination_public_id: derived_public_id(&record.public_id),
            destination_folder: folder.to_string(),
        }
    }
}

/// Identifier under which the optimized copy of `public_id` is stored
pub fn derived_public_id(public_id: &str) -> String {
    format!("{}{}", public_id, OPTIMIZED_SUFFIX)
}

/// Before/after metrics for one successfully optimized image.
///
/// Serialized field names are part of the report format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub original_public_id: String,
    pub new_public_id: String,
    /// Original size in bytes
    pub original_size: u64,
    /// Size of the optimized artifact in bytes
    pub new_size: u64,
    /// Bytes saved (negative if the artifact grew)
    pub size_reduction: i64,
    pub before_format: String,
    pub after_format: String,
}

impl OptimizationOutcome {
    pub fn new(record: &RemoteImageRecord, result: &TransformationResult) -> Self {
        Self {
            original_public_id: record.public_id.clone(),
            new_public_id: derived_public_id(&record.public_id),
            original_size: record.bytes,
            new_size: result.bytes,
            size_reduction: record.bytes as i64 - result.bytes as i64,
            before_format: record.format.clone(),
            after_format: result.format.clone(),
        }
    }
}
