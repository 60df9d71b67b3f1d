//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::error::{KapitlerError, Result};
use crate::llm::GEMINI_API_KEY_VAR;
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Chapter generation requires the API key and yt-dlp.
    Generate,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Generate => {
            check_api_key()?;
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

/// Check if the Gemini API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var(GEMINI_API_KEY_VAR) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(KapitlerError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            GEMINI_API_KEY_VAR, GEMINI_API_KEY_VAR
        ))),
        Err(_) => Err(KapitlerError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            GEMINI_API_KEY_VAR, GEMINI_API_KEY_VAR
        ))),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(KapitlerError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KapitlerError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(KapitlerError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_maps_to_tool_not_found() {
        let result = check_tool("definitely-not-a-real-tool-12345");
        assert!(matches!(result, Err(KapitlerError::ToolNotFound(_))));
    }
}
