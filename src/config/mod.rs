mod types;

pub use types::{BadgeStyleConfig, ConfigIssue};

use std::path::{Path, PathBuf};

/// Loads the badge style from the default location.
pub fn load_config() -> BadgeStyleConfig {
    load_config_from(&get_config_path())
}

/// Loads a badge style file, falling back to defaults on any error.
pub fn load_config_from(config_path: &Path) -> BadgeStyleConfig {
    let config = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match parse_config(&contents) {
                Ok(config) => {
                    log::info!("Loaded badge style from {:?}", config_path);
                    config
                }
                Err(e) => {
                    log::error!("Failed to parse badge style: {}", e);
                    BadgeStyleConfig::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read badge style file: {}", e);
                BadgeStyleConfig::default()
            }
        }
    } else {
        log::info!("No badge style found at {:?}, using defaults", config_path);
        BadgeStyleConfig::default()
    };

    checked(config)
}

pub fn parse_config(contents: &str) -> Result<BadgeStyleConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Logs validation issues; any error replaces the style with the default.
fn checked(config: BadgeStyleConfig) -> BadgeStyleConfig {
    let issues = config.validate();
    let errors: Vec<_> = issues.iter().filter(|i| i.is_error).collect();
    let warnings: Vec<_> = issues.iter().filter(|i| !i.is_error).collect();

    for warning in &warnings {
        log::warn!("Config: {}", warning);
    }
    for error in &errors {
        log::error!("Config: {}", error);
    }

    if !issues.is_empty() {
        log::info!(
            "Config validation: {} error(s), {} warning(s)",
            errors.len(),
            warnings.len()
        );
    }

    if !errors.is_empty() {
        log::error!("Badge style has errors; falling back to defaults.");
        return BadgeStyleConfig::default();
    }

    config
}

pub fn get_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("numbadge")
        .join("badge.toml")
}
