//! Site configuration.
//!
//! # Responsibility
//! - Hold the recognized configuration options: countdown zero-point and the
//!   upload gates, plus the timing constants the views share.
//! - Load overrides from JSON and from the environment.
//!
//! # Invariants
//! - `allowed_image_types` is never empty.
//! - `max_image_size_bytes` is never zero.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`SiteConfig::target_instant`] (RFC 3339).
pub const TARGET_INSTANT_ENV: &str = "MEMORIAL_TARGET_INSTANT";

/// Wedding ceremony, Brasília time.
pub const DEFAULT_TARGET_INSTANT: &str = "2025-10-03T18:13:00-03:00";
pub const DEFAULT_ALLOWED_IMAGE_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/webp", "image/gif"];
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_SAVE_DELAY_MS: u64 = 1_500;
pub const DEFAULT_REVEAL_DEBOUNCE_MS: u64 = 800;
pub const DEFAULT_LOADING_DELAY_MS: u64 = 1_500;
pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug)]
pub enum ConfigError {
    InvalidTargetInstant { value: String, reason: String },
    EmptyAllowedImageTypes,
    ZeroMaxImageSize,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTargetInstant { value, reason } => {
                write!(f, "invalid target instant `{value}`: {reason}")
            }
            Self::EmptyAllowedImageTypes => write!(f, "allowed_image_types must not be empty"),
            Self::ZeroMaxImageSize => write!(f, "max_image_size_bytes must be greater than zero"),
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Json(err) => write!(f, "malformed config JSON: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Resolved site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Countdown zero-point.
    pub target_instant: DateTime<Utc>,
    /// MIME types accepted by the submission form.
    pub allowed_image_types: Vec<String>,
    /// Upload size ceiling, inclusive.
    pub max_image_size_bytes: u64,
    /// Artificial latency of the simulated save.
    pub simulated_save_delay: Duration,
    /// Sustained-play window before the timeline is revealed.
    pub reveal_debounce: Duration,
    /// Spinner time on timeline page entry.
    pub loading_delay: Duration,
    /// Viewports narrower than this use the mobile layout.
    pub mobile_breakpoint_px: u32,
}

/// JSON shape; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSiteConfig {
    target_instant: Option<String>,
    allowed_image_types: Option<Vec<String>>,
    max_image_size_bytes: Option<u64>,
    simulated_save_delay_ms: Option<u64>,
    reveal_debounce_ms: Option<u64>,
    loading_delay_ms: Option<u64>,
    mobile_breakpoint_px: Option<u32>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            target_instant: DateTime::parse_from_rfc3339(DEFAULT_TARGET_INSTANT)
                .map(|instant| instant.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            allowed_image_types: DEFAULT_ALLOWED_IMAGE_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
            max_image_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            simulated_save_delay: Duration::from_millis(DEFAULT_SAVE_DELAY_MS),
            reveal_debounce: Duration::from_millis(DEFAULT_REVEAL_DEBOUNCE_MS),
            loading_delay: Duration::from_millis(DEFAULT_LOADING_DELAY_MS),
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
        }
    }
}

impl SiteConfig {
    /// Parses a JSON document layered over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawSiteConfig = serde_json::from_str(json)?;
        let defaults = Self::default();

        let target_instant = match raw.target_instant {
            Some(value) => parse_instant(&value)?,
            None => defaults.target_instant,
        };
        let allowed_image_types = match raw.allowed_image_types {
            Some(types) => types
                .into_iter()
                .map(|value| value.trim().to_ascii_lowercase())
                .filter(|value| !value.is_empty())
                .collect(),
            None => defaults.allowed_image_types,
        };

        let config = Self {
            target_instant,
            allowed_image_types,
            max_image_size_bytes: raw
                .max_image_size_bytes
                .unwrap_or(defaults.max_image_size_bytes),
            simulated_save_delay: raw
                .simulated_save_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_save_delay),
            reveal_debounce: raw
                .reveal_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_debounce),
            loading_delay: raw
                .loading_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.loading_delay),
            mobile_breakpoint_px: raw
                .mobile_breakpoint_px
                .unwrap_or(defaults.mobile_breakpoint_px),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Applies [`TARGET_INSTANT_ENV`] when set and non-blank.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_target_override(std::env::var(TARGET_INSTANT_ENV).ok().as_deref())
    }

    fn with_target_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) {
            self.target_instant = parse_instant(value)?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_image_types.is_empty() {
            return Err(ConfigError::EmptyAllowedImageTypes);
        }
        if self.max_image_size_bytes == 0 {
            return Err(ConfigError::ZeroMaxImageSize);
        }
        Ok(())
    }

    /// Whether `mime_type` passes the upload format gate.
    pub fn accepts_image_type(&self, mime_type: &str) -> bool {
        let normalized = mime_type.trim().to_ascii_lowercase();
        self.allowed_image_types
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(&normalized))
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| ConfigError::InvalidTargetInstant {
            value: value.to_string(),
            reason: err.to_string(),
        })
}
