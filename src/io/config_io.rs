use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Error type for loading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Config file location: `$NESTASK_CONFIG`, else under `XDG_CONFIG_HOME`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("NESTASK_CONFIG") {
        return PathBuf::from(path);
    }
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_dir.join("nestask").join("config.toml")
}

/// Default data file location, under `XDG_DATA_HOME`.
pub fn default_data_path() -> PathBuf {
    let data_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"));
    data_dir.join("nestask").join("tasks.json")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config at `path`. A missing file gives the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Data file the config points at, or the default location.
pub fn data_path(config: &Config) -> PathBuf {
    config
        .storage
        .path
        .clone()
        .unwrap_or_else(default_data_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::view::StatusFilter;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = read_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_read_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"[storage]
path = "/tmp/elsewhere/tasks.json"

[view]
default_status = "completed"
suggestion_limit = 3
"#,
        )
        .unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(
            config.storage.path.as_deref(),
            Some(Path::new("/tmp/elsewhere/tasks.json"))
        );
        assert_eq!(config.view.default_status, StatusFilter::Completed);
        assert_eq!(config.view.suggestion_limit, 3);
        assert_eq!(data_path(&config), PathBuf::from("/tmp/elsewhere/tasks.json"));
    }

    #[test]
    fn test_bad_config_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[view]\ndefault_status = \"sideways\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
