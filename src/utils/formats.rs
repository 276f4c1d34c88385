use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use crate::utils::OptimizerError;

/// Output format requested from the media service.
///
/// `Auto` lets the service pick the best format for the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Auto,
    JPEG,
    PNG,
    WebP,
    AVIF,
}

impl OutputFormat {
    /// Value used in the `f_` transformation parameter
    pub fn transformation_value(&self) -> &str {
        match self {
            Self::Auto => "auto",
            Self::JPEG => "jpg",
            Self::PNG => "png",
            Self::WebP => "webp",
            Self::AVIF => "avif",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Auto
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.transformation_value())
    }
}

impl FromStr for OutputFormat {
    type Err = OptimizerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.to_lowercase();
        match value.as_str() {
            "auto" => Ok(Self::Auto),
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WebP),
            "avif" => Ok(Self::AVIF),
            _ => Err(OptimizerError::validation(format!(
                "Unsupported output format: {}", value
            ))),
        }
    }
}

// Configuration goes through the same alias table as `FromStr`
impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
