//! Runtime configuration read from environment variables.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::ai::huggingface::{
    HuggingFaceConfig, DEFAULT_HF_BASE_URL, DEFAULT_HF_IMAGE_MODEL, DEFAULT_HF_TEXT_MODEL,
};
use crate::ai::openai::{OpenAiConfig, DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL};
use crate::ai::roboflow::{RoboflowConfig, DEFAULT_ROBOFLOW_BASE_URL};
use crate::ai::ultralytics::UltralyticsConfig;
use crate::ai::{
    AiConfig, DuplicateCacheConfig, DEFAULT_AI_TIMEOUT, DEFAULT_DUPLICATE_THRESHOLD, DEFAULT_MAX_FINGERPRINTS,
};
use crate::domain::{BPS_SCALE, DEFAULT_COMMISSION_BPS};

pub const DEFAULT_CACHE_PATH: &str = "data/duplicate_fingerprints.json";
pub const DEFAULT_CHANNEL_BUFFER: usize = 32;
const DEFAULT_ROBOFLOW_MODEL: &str = "poultry-detection/1";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid { key: String, value: String, reason: String },
    #[error("{key} must be between {min} and {max}")]
    OutOfRange { key: String, min: String, max: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub channel_buffer: usize,
    pub commission_rate_bps: u32,
    pub duplicates: DuplicateCacheConfig,
    pub ai: AiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            commission_rate_bps: DEFAULT_COMMISSION_BPS,
            duplicates: DuplicateCacheConfig::new(DEFAULT_CACHE_PATH),
            ai: AiConfig::default(),
        }
    }
}

/// Environment reader over an arbitrary lookup function.
struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        match self.var(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                value,
                reason: e.to_string(),
            }),
        }
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        let commission_rate_bps = env.parse("POULTRY_HUB_COMMISSION_BPS", DEFAULT_COMMISSION_BPS)?;
        check_commission_rate(commission_rate_bps)?;
        let threshold = env.parse("POULTRY_HUB_DUPLICATE_THRESHOLD", DEFAULT_DUPLICATE_THRESHOLD)?;
        check_threshold(threshold)?;
        let duplicates = DuplicateCacheConfig {
            path: PathBuf::from(env.or("POULTRY_HUB_CACHE_PATH", DEFAULT_CACHE_PATH)),
            threshold,
            max_entries: env.parse("POULTRY_HUB_CACHE_MAX_ENTRIES", DEFAULT_MAX_FINGERPRINTS)?,
        };
        let timeout_secs = env.parse("POULTRY_HUB_AI_TIMEOUT_SECS", DEFAULT_AI_TIMEOUT.as_secs())?;

        let ai = AiConfig {
            request_timeout: Duration::from_secs(timeout_secs),
            openai: env.var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
                api_key,
                base_url: env.or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                model: env.or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            }),
            huggingface: env.var("HUGGINGFACE_API_TOKEN").map(|token| HuggingFaceConfig {
                token,
                base_url: env.or("HUGGINGFACE_BASE_URL", DEFAULT_HF_BASE_URL),
                text_model: env.or("HUGGINGFACE_TEXT_MODEL", DEFAULT_HF_TEXT_MODEL),
                image_model: env.or("HUGGINGFACE_IMAGE_MODEL", DEFAULT_HF_IMAGE_MODEL),
            }),
            roboflow: env.var("ROBOFLOW_API_KEY").map(|api_key| RoboflowConfig {
                api_key,
                base_url: env.or("ROBOFLOW_BASE_URL", DEFAULT_ROBOFLOW_BASE_URL),
                model: env.or("ROBOFLOW_MODEL", DEFAULT_ROBOFLOW_MODEL),
            }),
            ultralytics: match (env.var("ULTRALYTICS_API_KEY"), env.var("ULTRALYTICS_MODEL_URL")) {
                (Some(api_key), Some(model_url)) => Some(UltralyticsConfig { api_key, model_url }),
                (Some(_), None) => {
                    warn!("ULTRALYTICS_API_KEY set without ULTRALYTICS_MODEL_URL, provider disabled");
                    None
                }
                _ => None,
            },
        };

        let config = Self {
            channel_buffer: env.parse("POULTRY_HUB_CHANNEL_BUFFER", DEFAULT_CHANNEL_BUFFER)?.max(1),
            commission_rate_bps,
            duplicates,
            ai,
        };
        info!(
            providers = ?config.ai.provider_names(),
            cache = %config.duplicates.path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

pub fn check_commission_rate(rate_bps: u32) -> Result<(), ConfigError> {
    if u64::from(rate_bps) > BPS_SCALE {
        return Err(ConfigError::OutOfRange {
            key: "commission rate (bps)".to_string(),
            min: "0".to_string(),
            max: BPS_SCALE.to_string(),
        });
    }
    Ok(())
}

pub fn check_threshold(threshold: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(ConfigError::OutOfRange {
            key: "duplicate threshold".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }
    Ok(())
}
