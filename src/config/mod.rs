mod init;
mod schema;

pub use init::write_default_config;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/lead-ranker/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("lead-ranker"))
}

/// Get the default config file path (~/.config/lead-ranker/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            default_path
        }
    };

    read_config(&config_path)
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })
}

pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{ScoringConfig, TierThresholds};
    use std::env;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_parse_scoring_section() {
        let yaml = "scoring:\n  tiers:\n    hot: 75\n    warm: 45\n  recency:\n    half_life: 6months\n    cutoff: 2years\n";
        let config = parse_config(yaml).unwrap();
        let scoring = config.effective_scoring();
        assert_eq!(scoring.tiers, TierThresholds { hot: 75, warm: 45 });
        assert_eq!(scoring.recency.half_life, "6months");
        assert_eq!(scoring.role_fit, ScoringConfig::default().role_fit);
    }

    #[test]
    fn test_parse_rejects_unknown_section() {
        assert!(parse_config("queries: []\n").is_err());
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let path = env::temp_dir().join("lead_ranker_test_missing_config.yaml");
        let _ = std::fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join("lead_ranker_test_load_config.yaml");
        std::fs::write(&path, "scoring:\n  tiers:\n    hot: 90\n    warm: 10\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.effective_scoring().tiers.hot, 90);

        let _ = std::fs::remove_file(&path);
    }
}
