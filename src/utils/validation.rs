use crate::core::{OptimizerSettings, TransformSettings};
use crate::utils::{OptimizerError, OptimizerResult};

/// Validates the run settings before any remote call is made
pub fn validate_settings(settings: &OptimizerSettings) -> OptimizerResult<()> {
    validate_transform(&settings.transform())?;
    validate_concurrency(settings.concurrency_limit)?;

    if settings.folder.trim().is_empty() {
        return Err(OptimizerError::validation("Folder prefix cannot be empty"));
    }

    if settings.output_file.as_os_str().is_empty() {
        return Err(OptimizerError::validation("Output file cannot be empty"));
    }

    Ok(())
}

/// Validates transformation settings
pub fn validate_transform(transform: &TransformSettings) -> OptimizerResult<()> {
    if transform.quality == 0 || transform.quality > 100 {
        return Err(OptimizerError::validation(
            format!("Invalid quality value: {}. Must be between 1 and 100", transform.quality)
        ));
    }

    if transform.max_width == 0 {
        return Err(OptimizerError::validation("Max width cannot be 0"));
    }

    Ok(())
}

pub fn validate_concurrency(limit: usize) -> OptimizerResult<()> {
    if limit == 0 {
        return Err(OptimizerError::validation("Concurrency limit cannot be 0"));
    }
    Ok(())
}
