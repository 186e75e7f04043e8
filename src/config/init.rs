use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::schema::Config;
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# lead-ranker configuration
#
# Every keyword table, funding point table, hub list, tier threshold and
# recency setting the scorer uses. Delete a section to fall back to the
# built-in default for it.
";

/// Write the default configuration as YAML.
///
/// Refuses to replace an existing file unless `force` is set. The write is
/// atomic so a failed run never leaves a half-written config behind.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Pass --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
