//! Capture configuration and quality presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Video quality preset mapped to a target resolution.
///
/// Earlier revisions of the contract accepted explicit resolution strings
/// ("1080p"); those parse into the same presets via [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 854x480
    Sd,
    /// 1280x720
    Hd,
    /// 1920x1080
    Fhd,
    /// 3840x2160
    Uhd,
}

impl Quality {
    /// Target resolution (width, height) for this preset.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Quality::Sd => (854, 480),
            Quality::Hd => (1280, 720),
            Quality::Fhd => (1920, 1080),
            Quality::Uhd => (3840, 2160),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Sd => "sd",
            Quality::Hd => "hd",
            Quality::Fhd => "fhd",
            Quality::Uhd => "uhd",
        };
        f.write_str(name)
    }
}

/// Error for unrecognized quality strings.
#[derive(Debug, Clone, Error)]
#[error("unknown quality: {0}")]
pub struct ParseQualityError(String);

impl FromStr for Quality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sd" | "480p" => Ok(Quality::Sd),
            "hd" | "720p" => Ok(Quality::Hd),
            "fhd" | "1080p" => Ok(Quality::Fhd),
            "uhd" | "2160p" | "4k" => Ok(Quality::Uhd),
            other => Err(ParseQualityError(other.to_string())),
        }
    }
}

/// Configuration for one recording.
///
/// Serialized in camelCase to match the shape the application layer sends
/// over the bridge; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    /// Quality preset selecting the target resolution
    pub quality: Quality,
    /// Desired frame rate, e.g. 30, 60, 120, 240
    pub frame_rate: u32,
    /// Maximum duration in seconds (0 = unlimited)
    pub duration_limit_secs: u64,
    /// Maximum file size in bytes (0 = unlimited)
    pub size_limit_bytes: u64,
    /// Record for slow-motion playback
    pub slow_motion: bool,
    /// Make the artifact visible in the device media library
    pub save_to_library: bool,
    /// Optional display label for the recording
    pub title: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            quality: Quality::Hd,
            frame_rate: 30,
            duration_limit_secs: 0,
            size_limit_bytes: 0,
            slow_motion: false,
            save_to_library: false,
            title: None,
        }
    }
}

impl CaptureConfig {
    /// 1080p at 240fps, the high-speed capture default
    pub fn high_speed() -> Self {
        Self {
            quality: Quality::Fhd,
            frame_rate: 240,
            ..Default::default()
        }
    }

    /// 2160p at 30fps
    pub fn uhd() -> Self {
        Self {
            quality: Quality::Uhd,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_parses_presets_and_resolution_strings() {
        assert_eq!("hd".parse::<Quality>().unwrap(), Quality::Hd);
        assert_eq!("FHD".parse::<Quality>().unwrap(), Quality::Fhd);
        assert_eq!("480p".parse::<Quality>().unwrap(), Quality::Sd);
        assert_eq!("720p".parse::<Quality>().unwrap(), Quality::Hd);
        assert_eq!("1080p".parse::<Quality>().unwrap(), Quality::Fhd);
        assert_eq!("2160p".parse::<Quality>().unwrap(), Quality::Uhd);
        assert_eq!("4k".parse::<Quality>().unwrap(), Quality::Uhd);
        assert!("8k".parse::<Quality>().is_err());
    }

    #[test]
    fn quality_dimensions_match_presets() {
        assert_eq!(Quality::Hd.dimensions(), (1280, 720));
        assert_eq!(Quality::Uhd.dimensions(), (3840, 2160));
    }

    #[test]
    fn config_serializes_camel_case() {
        let config = CaptureConfig {
            frame_rate: 120,
            quality: Quality::Uhd,
            size_limit_bytes: 50_000_000,
            ..Default::default()
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["frameRate"], 120);
        assert_eq!(json["quality"], "uhd");
        assert_eq!(json["sizeLimitBytes"], 50_000_000u64);
        assert_eq!(json["slowMotion"], false);
    }

    #[test]
    fn absent_fields_take_defaults() {
        let config: CaptureConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CaptureConfig::default());

        let config: CaptureConfig =
            serde_json::from_str(r#"{"frameRate": 60, "quality": "fhd"}"#).unwrap();
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.quality, Quality::Fhd);
        assert_eq!(config.duration_limit_secs, 0);
        assert!(config.title.is_none());
    }

    #[test]
    fn high_speed_preset() {
        let config = CaptureConfig::high_speed();
        assert_eq!(config.quality, Quality::Fhd);
        assert_eq!(config.frame_rate, 240);
        assert_eq!(config.duration_limit_secs, 0);
    }
}
