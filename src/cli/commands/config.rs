//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Run the config command against the file at `config_path`.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let source = if config_path.exists() {
                config_path.display().to_string()
            } else {
                "built-in defaults".to_string()
            };
            println!("# {}\n", source);
            println!("{}", toml::to_string_pretty(&settings).context("Failed to serialize config")?);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }

        ConfigAction::Edit => {
            if !config_path.exists() {
                settings.save_to(&config_path.to_path_buf())?;
                Output::info(&format!("Wrote default config to {}", config_path.display()));
            }

            let editor = editor_from(std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok());
            Output::info(&format!("Opening {} in {}...", config_path.display(), editor));

            // Editors are often configured with flags, e.g. "code -w"
            let mut words = editor.split_whitespace();
            let program = words.next().unwrap_or("vi");
            let status = std::process::Command::new(program)
                .args(words)
                .arg(config_path)
                .status()
                .with_context(|| format!("Failed to launch editor '{}'", editor))?;

            if !status.success() {
                Output::warning("Editor exited with non-zero status; config left as is.");
                return Ok(());
            }

            match validate(config_path) {
                Ok(_) => Output::success("Config is valid."),
                Err(e) => {
                    Output::error(&format!("Config no longer parses: {:#}", e));
                    Output::info("Fix the file, or delete it to fall back to the defaults.");
                }
            }
        }
    }

    Ok(())
}

/// `$VISUAL`, then `$EDITOR`, then `vi`. Blank values are skipped.
fn editor_from(visual: Option<String>, editor: Option<String>) -> String {
    [visual, editor]
        .into_iter()
        .flatten()
        .map(|e| e.trim().to_string())
        .find(|e| !e.is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Re-read an edited config file, reporting parse errors with the path.
fn validate(path: &Path) -> Result<Settings> {
    Settings::load_from(Some(&PathBuf::from(path)))
        .with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_preference() {
        assert_eq!(editor_from(Some("code -w".into()), Some("nano".into())), "code -w");
        assert_eq!(editor_from(Some("  ".into()), Some("nano".into())), "nano");
        assert_eq!(editor_from(None, None), "vi");
    }

    #[test]
    fn test_validate_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[chat]\nmax_history = 4\n").unwrap();
        assert_eq!(validate(&path).unwrap().chat.max_history, 4);

        std::fs::write(&path, "[chat\nmax_history = ").unwrap();
        let err = validate(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }

    #[test]
    fn test_path_and_show_use_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kotae.toml");
        run_config(&ConfigAction::Path, Settings::default(), &path).unwrap();
        run_config(&ConfigAction::Show, Settings::default(), &path).unwrap();
        assert!(!path.exists());
    }
}
