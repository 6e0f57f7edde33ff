use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory searched recursively for icons before the system themes.
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
    #[serde(default = "default_applications_dirs")]
    pub applications_dirs: Vec<PathBuf>,
    #[serde(default = "default_logout_command")]
    pub logout_command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<StaticEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaticEntry {
    pub name: String,
    pub command: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

fn default_icons_dir() -> PathBuf { PathBuf::from("/usr/share/icons/hicolor/48x48/apps/") }
fn default_applications_dirs() -> Vec<PathBuf> { vec![PathBuf::from("/usr/share/applications")] }
fn default_logout_command() -> String { "wmlogout".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            icons_dir: default_icons_dir(),
            applications_dirs: default_applications_dirs(),
            logout_command: default_logout_command(),
            items: Vec::new(),
        }
    }
}

pub fn config_path() -> PathBuf {
    match ProjectDirs::from("org", "quicklaunch", "quicklaunch") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Loads the config at `path`. When the file does not exist a default one is
/// written there; if that fails too the defaults are still returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        let config = Config::default();
        match write_config(path, &config) {
            Ok(()) => debug!("Wrote default config to {:?}", path),
            Err(e) => warn!("Using built-in defaults: {}", e),
        }
        return Ok(config);
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(source) => match parse_plain(&content) {
            Some(config) => {
                debug!("Read {:?} as plain key = value lines", path);
                Ok(config)
            }
            None => Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        },
    }
}

/// Reads the unquoted `icons_dir = /path` style. Returns `None` when no
/// known key is present.
fn parse_plain(content: &str) -> Option<Config> {
    let mut config = Config::default();
    let mut found = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
        if value.is_empty() {
            continue;
        }

        match key.trim() {
            "icons_dir" => config.icons_dir = PathBuf::from(value),
            "logout_command" => config.logout_command = value.to_string(),
            _ => continue,
        }
        found = true;
    }

    found.then_some(config)
}

pub fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
