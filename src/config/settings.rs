//! Configuration settings for Kapitler.

use crate::chapters::{ChapteringPolicy, Strictness, DEFAULT_MIN_GAP_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sample video used when the CLI is invoked without a URL.
pub const DEFAULT_VIDEO_URL: &str = "https://www.youtube.com/watch?v=A9WY_HZUK8Q";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub gemini: GeminiSettings,
    pub chaptering: ChapteringSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Gemini generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Model name.
    pub model: String,
    /// Sampling temperature, in [0, 1].
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Maximum tokens in the reply.
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-pro-exp-02-05".to_string(),
            temperature: 0.5,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 500,
        }
    }
}

/// Chapter generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapteringSettings {
    /// Ask for exactly this many chapters; None lets the content decide.
    pub target_chapter_count: Option<u32>,
    /// Minimum seconds between consecutive chapters.
    pub min_gap_seconds: u64,
    /// How malformed response lines are handled.
    pub strictness: Strictness,
    /// How the model is asked to choose boundaries.
    pub policy: ChapteringPolicy,
    /// Write the compiled prompt to a side file for debugging.
    pub dump_prompt: bool,
}

impl Default for ChapteringSettings {
    fn default() -> Self {
        Self {
            target_chapter_count: None,
            min_gap_seconds: DEFAULT_MIN_GAP_SECONDS,
            strictness: Strictness::default(),
            policy: ChapteringPolicy::default(),
            dump_prompt: false,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::KapitlerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kapitler")
            .join("config.toml")
    }

    /// Check field-level invariants the type system can't express.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=1.0).contains(&self.gemini.temperature) {
            return Err(crate::error::KapitlerError::Config(format!(
                "gemini.temperature must be in [0, 1], got {}",
                self.gemini.temperature
            )));
        }
        if self.gemini.max_output_tokens == 0 {
            return Err(crate::error::KapitlerError::Config(
                "gemini.max_output_tokens must be positive".to_string(),
            ));
        }
        if self.chaptering.target_chapter_count == Some(0) {
            return Err(crate::error::KapitlerError::Config(
                "chaptering.target_chapter_count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.gemini.temperature, 0.5);
        assert_eq!(settings.gemini.top_k, 64);
        assert_eq!(settings.chaptering.min_gap_seconds, DEFAULT_MIN_GAP_SECONDS);
        assert_eq!(settings.chaptering.strictness, Strictness::Strict);
        assert_eq!(settings.chaptering.policy, ChapteringPolicy::SelfReview);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.chaptering.target_chapter_count = Some(8);
        settings.chaptering.strictness = Strictness::Lenient;

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.chaptering.target_chapter_count, Some(8));
        assert_eq!(parsed.chaptering.strictness, Strictness::Lenient);
        assert_eq!(parsed.gemini.model, settings.gemini.model);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Settings = toml::from_str("[gemini]\ntemperature = 0.9\n").unwrap();
        assert_eq!(parsed.gemini.temperature, 0.9);
        assert_eq!(parsed.gemini.top_p, 0.95);
        assert_eq!(parsed.chaptering.min_gap_seconds, DEFAULT_MIN_GAP_SECONDS);
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut settings = Settings::default();
        settings.gemini.temperature = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_chapter_count() {
        let mut settings = Settings::default();
        settings.chaptering.target_chapter_count = Some(0);
        assert!(settings.validate().is_err());
    }
}
