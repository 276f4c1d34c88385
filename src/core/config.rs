//! Run configuration loaded once from the process environment.

use std::fmt;
use std::path::PathBuf;
use serde::Deserialize;
use tracing::debug;
use crate::core::TransformSettings;
use crate::utils::{OptimizerError, OptimizerResult, OutputFormat, validate_settings};

const CREDENTIALS_PREFIX: &str = "CLOUDINARY_";
const SETTINGS_PREFIX: &str = "OPTIMIZER_";

/// Account credentials for the media service.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Reads `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY` and
    /// `CLOUDINARY_API_SECRET` from the given variables.
    pub fn from_vars<I>(vars: I) -> OptimizerResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let credentials: Self = envy::prefixed(CREDENTIALS_PREFIX)
            .from_iter(vars)
            .map_err(|e| OptimizerError::config(format!("Missing media service credentials: {}", e)))?;

        for (name, value) in [
            ("CLOUD_NAME", &credentials.cloud_name),
            ("API_KEY", &credentials.api_key),
            ("API_SECRET", &credentials.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(OptimizerError::config(format!(
                    "{}{} is set but empty", CREDENTIALS_PREFIX, name
                )));
            }
        }
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Tunables for a run. Every field can be overridden with an
/// `OPTIMIZER_<FIELD>` variable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Folder prefix to list and to store optimized copies in
    pub folder: String,
    pub max_width: u32,
    pub quality: u32,
    pub output_format: OutputFormat,
    /// Maximum number of transformation requests in flight
    pub concurrency_limit: usize,
    pub output_file: PathBuf,
    /// Base URL of the admin/upload API
    pub api_base: String,
    /// Base URL assets are delivered from
    pub delivery_base: String,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            folder: "french-dandy".to_string(),
            max_width: 1960,
            quality: 80,
            output_format: OutputFormat::Auto,
            concurrency_limit: 5,
            output_file: PathBuf::from("optimization_results.json"),
            api_base: "https://api.cloudinary.com".to_string(),
            delivery_base: "https://res.cloudinary.com".to_string(),
        }
    }
}

impl OptimizerSettings {
    pub fn from_vars<I>(vars: I) -> OptimizerResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let settings: Self = envy::prefixed(SETTINGS_PREFIX).from_iter(vars)?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    pub fn transform(&self) -> TransformSettings {
        TransformSettings {
            max_width: self.max_width,
            quality: self.quality,
            output_format: self.output_format,
        }
    }
}

/// Immutable configuration built at startup and passed to every stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub settings: OptimizerSettings,
}

impl Config {
    /// Loads `.env` (if present) and then the process environment.
    ///
    /// Fails before any remote call when a credential is missing.
    pub fn from_env() -> OptimizerResult<Self> {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded variables from .env");
        }
        Self::from_vars(std::env::vars().collect::<Vec<_>>())
    }

    pub fn from_vars(vars: Vec<(String, String)>) -> OptimizerResult<Self> {
        let credentials = Credentials::from_vars(vars.iter().cloned())?;
        let settings = OptimizerSettings::from_vars(vars)?;
        debug!(
            "Configuration loaded - cloud: {}, folder: {}, concurrency: {}",
            credentials.cloud_name, settings.folder, settings.concurrency_limit
        );
        Ok(Self { credentials, settings })
    }
}
