//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.validate()?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    let parse_err = |e: String| anyhow::anyhow!(e);

    match key {
        "general.log_level" => settings.general.log_level = value.to_string(),
        "gemini.model" => settings.gemini.model = value.to_string(),
        "gemini.temperature" => settings.gemini.temperature = value.parse()?,
        "gemini.top_p" => settings.gemini.top_p = value.parse()?,
        "gemini.top_k" => settings.gemini.top_k = value.parse()?,
        "gemini.max_output_tokens" => settings.gemini.max_output_tokens = value.parse()?,
        "chaptering.target_chapter_count" => {
            settings.chaptering.target_chapter_count = match value {
                "none" | "auto" => None,
                n => Some(n.parse()?),
            };
        }
        "chaptering.min_gap_seconds" => settings.chaptering.min_gap_seconds = value.parse()?,
        "chaptering.strictness" => {
            settings.chaptering.strictness = value.parse().map_err(parse_err)?
        }
        "chaptering.policy" => settings.chaptering.policy = value.parse().map_err(parse_err)?,
        "chaptering.dump_prompt" => settings.chaptering.dump_prompt = value.parse()?,
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::{ChapteringPolicy, Strictness};

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();

        set_value(&mut settings, "gemini.temperature", "0.8").unwrap();
        set_value(&mut settings, "chaptering.strictness", "lenient").unwrap();
        set_value(&mut settings, "chaptering.policy", "fixed-count").unwrap();
        set_value(&mut settings, "chaptering.target_chapter_count", "12").unwrap();

        assert_eq!(settings.gemini.temperature, 0.8);
        assert_eq!(settings.chaptering.strictness, Strictness::Lenient);
        assert_eq!(settings.chaptering.policy, ChapteringPolicy::FixedCount);
        assert_eq!(settings.chaptering.target_chapter_count, Some(12));
    }

    #[test]
    fn test_set_count_back_to_auto() {
        let mut settings = Settings::default();
        settings.chaptering.target_chapter_count = Some(5);

        set_value(&mut settings, "chaptering.target_chapter_count", "auto").unwrap();
        assert_eq!(settings.chaptering.target_chapter_count, None);
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "nope.nothing", "1").is_err());
    }
}
