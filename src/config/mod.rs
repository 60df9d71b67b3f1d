//! Configuration module for Kapitler.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    ChapteringSettings, GeminiSettings, GeneralSettings, Settings, DEFAULT_VIDEO_URL,
};
