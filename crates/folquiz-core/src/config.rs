//! Quiz configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{QuizConfig, StageCounts};

/// Top-level folquiz configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolquizConfig {
    /// Problems drawn per stage.
    #[serde(default)]
    pub stage_counts: StageCounts,
    /// Fixed domain size (3..=5); random when unset.
    #[serde(default)]
    pub domain_size: Option<usize>,
    /// Seed for reproducible quizzes.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Where generated quizzes and reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./folquiz-output")
}

impl Default for FolquizConfig {
    fn default() -> Self {
        Self {
            stage_counts: StageCounts::default(),
            domain_size: None,
            seed: None,
            output_dir: default_output_dir(),
        }
    }
}

impl FolquizConfig {
    /// The generation settings of this configuration.
    pub fn to_quiz_config(&self) -> QuizConfig {
        QuizConfig {
            stage_counts: self.stage_counts,
            domain_size: self.domain_size,
            seed: self.seed,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `folquiz.toml` in the current directory
/// 2. `~/.config/folquiz/config.toml`
///
/// Environment variable overrides: `FOLQUIZ_SEED`, `FOLQUIZ_DOMAIN_SIZE`.
pub fn load_config_from(path: Option<&Path>) -> Result<FolquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("folquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loading config");
            parse_config_str(&content, &path)?
        }
        None => FolquizConfig::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Parse a configuration file body.
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<FolquizConfig> {
    toml::from_str(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))
}

fn apply_env_overrides(
    mut config: FolquizConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<FolquizConfig> {
    if let Some(seed) = lookup("FOLQUIZ_SEED") {
        let seed = seed
            .trim()
            .parse()
            .with_context(|| format!("FOLQUIZ_SEED is not a valid seed: {seed}"))?;
        config.seed = Some(seed);
    }

    if let Some(size) = lookup("FOLQUIZ_DOMAIN_SIZE") {
        let size = size
            .trim()
            .parse()
            .with_context(|| format!("FOLQUIZ_DOMAIN_SIZE is not a number: {size}"))?;
        config.domain_size = Some(size);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("folquiz"))
}
