//! Runtime configuration loaded from `storyteller.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::{StorytellerError, StorytellerResult};

pub const DEFAULT_CONFIG_PATH: &str = "storyteller.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorytellerConfig {
    /// Dialog files are read from `<data_dir>/dialogs`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub hot_reload: bool,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Show a greeting book when no dialog matches a trigger
    #[serde(default = "default_true")]
    pub default_greeting: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_filter() -> String {
    "storyteller=info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for StorytellerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            hot_reload: false,
            log_filter: default_log_filter(),
            default_greeting: true,
        }
    }
}

impl StorytellerConfig {
    pub async fn load(path: &Path) -> StorytellerResult<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| StorytellerError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| StorytellerError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    pub async fn load_or_default(path: &Path) -> StorytellerResult<Self> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storyteller.toml");
        std::fs::write(&path, "hot_reload = true\ndata_dir = \"content\"\n").unwrap();

        let config = StorytellerConfig::load(&path).await.unwrap();
        assert!(config.hot_reload);
        assert_eq!(config.data_dir, PathBuf::from("content"));
        assert_eq!(config.log_filter, "storyteller=info");
        assert!(config.default_greeting);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            StorytellerConfig::load(&path).await,
            Err(StorytellerError::Io { .. })
        ));
        assert_eq!(
            StorytellerConfig::load_or_default(&path).await.unwrap(),
            StorytellerConfig::default()
        );
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storyteller.toml");
        std::fs::write(&path, "hot_reload = \"sometimes\"").unwrap();

        assert!(matches!(
            StorytellerConfig::load(&path).await,
            Err(StorytellerError::Toml { .. })
        ));
    }
}
