//! Text generation abstraction.
//!
//! The pipeline only needs "prompt in, text out"; everything
//! provider-specific lives behind this trait. Failures surface as a single
//! [`GenerationFailed`](crate::KapitlerError::GenerationFailed) error kind.

mod gemini;

pub use gemini::{GeminiClient, GEMINI_API_KEY_VAR};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for generative text services.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
