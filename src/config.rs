use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Palette name (`default`, `catppuccin`, `tokyo-night`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Config {
    pub fn get_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not determine config directory")?;
        path.push("mypctools");
        if !path.exists() {
            fs::create_dir_all(&path).context("Failed to create config directory")?;
        }
        path.push("config.json");
        Ok(path)
    }

    pub fn load() -> Result<Option<Self>> {
        let path = Self::get_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    /// Never fails: an unreadable config is logged and defaults are used.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

fn has_scripts(dir: &Path) -> bool {
    dir.join("scripts").is_dir()
}

/// Find the repository root (the directory holding `scripts/`).
///
/// Order: the standard install location, next to the executable (stepping
/// out of `tui/`), the working directory or its parent. Falls back to the
/// install location.
pub fn locate_root_dir() -> PathBuf {
    let share = dirs::home_dir()
        .map(|h| h.join(".local").join("share").join("mypctools"))
        .unwrap_or_else(|| PathBuf::from(".local/share/mypctools"));

    let exe_dir = std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();

    root_from_candidates(&share, exe_dir.as_deref(), cwd.as_deref())
}

fn root_from_candidates(share: &Path, exe_dir: Option<&Path>, cwd: Option<&Path>) -> PathBuf {
    if has_scripts(share) {
        return share.to_path_buf();
    }

    if let Some(mut dir) = exe_dir {
        if dir.file_name().is_some_and(|n| n == "tui") {
            dir = dir.parent().unwrap_or(dir);
        }
        if has_scripts(dir) {
            return dir.to_path_buf();
        }
    }

    if let Some(cwd) = cwd {
        if has_scripts(cwd) {
            return cwd.to_path_buf();
        }
        if let Some(parent) = cwd.parent().filter(|p| has_scripts(p)) {
            return parent.to_path_buf();
        }
    }

    share.to_path_buf()
}
