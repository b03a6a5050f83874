//! RON configuration for the shell.
//!
//! Loaded from `~/.config/hakoniwa/config.ron` unless `--config` names
//! another file. Every field is optional:
//!
//! ```ron
//! (
//!     archive: Some("~/seeds/project.zip"),
//!     script: Some("~/.hakoniwarc"),
//!     vfs_mode: true,
//!     color: false,
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Shell settings. Command-line flags take precedence over these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// ZIP archive to seed the VFS from.
    pub archive: Option<PathBuf>,
    /// Startup script run before the interactive loop.
    pub script: Option<PathBuf>,
    /// Start in VFS mode instead of host mode.
    pub vfs_mode: bool,
    /// Colorize directory names and echoed script lines.
    pub color: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            archive: None,
            script: None,
            vfs_mode: false,
            color: true,
        }
    }
}

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

impl ShellConfig {
    /// Parse a config from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config file. Missing or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_ron(&text)?;
        config.archive = config.archive.map(|p| expand_path(&p));
        config.script = config.script.map(|p| expand_path(&p));
        Ok(config)
    }
}

/// Get the default config path (`~/.config/hakoniwa/config.ron`).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hakoniwa").join("config.ron"))
}

/// Load the default config file, falling back to defaults.
///
/// A missing file is normal; a broken one is logged and ignored.
pub fn load_config() -> ShellConfig {
    let Some(path) = config_file_path() else {
        info!("No config directory available, using defaults");
        return ShellConfig::default();
    };

    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return ShellConfig::default();
    }

    match ShellConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            ShellConfig::default()
        }
    }
}

/// Expand a leading `~` against the user's home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
