use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn default_git_path() -> String {
    "git".to_string()
}

fn default_plan_file_prefix() -> String {
    "dropTodo".to_string()
}

/// Drop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropConfig {
    /// Git executable to invoke. Default is `git` from PATH.
    #[serde(default = "default_git_path")]
    pub git_path: String,
    /// Directory for transient plan files. Default is the system temp dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    #[serde(default = "default_plan_file_prefix")]
    pub plan_file_prefix: String,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            git_path: default_git_path(),
            temp_dir: None,
            plan_file_prefix: default_plan_file_prefix(),
        }
    }
}

impl DropConfig {
    /// Directory plan files are allocated in
    pub fn plan_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Read the configuration file
pub async fn read_config(config_path: &Path) -> Result<Option<DropConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: DropConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}
