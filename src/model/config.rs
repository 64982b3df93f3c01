use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::view::StatusFilter;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data file location. Default: `$XDG_DATA_HOME/nestask/tasks.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Status filter used by `list` when none is given
    #[serde(default)]
    pub default_status: StatusFilter,
    /// Maximum number of autocomplete suggestions
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    /// Tags always offered by autocomplete (even if no task uses them yet).
    #[serde(default)]
    pub default_tags: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            default_status: StatusFilter::All,
            suggestion_limit: default_suggestion_limit(),
            default_tags: Vec::new(),
        }
    }
}

fn default_suggestion_limit() -> usize {
    crate::ops::autocomplete::MAX_SUGGESTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.view.suggestion_limit, 5);
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn test_partial_view_section() {
        let config: Config = toml::from_str(
            r#"[view]
default_status = "active"
default_tags = ["work", "home"]
"#,
        )
        .unwrap();
        assert_eq!(config.view.default_status, StatusFilter::Active);
        assert_eq!(config.view.suggestion_limit, 5);
        assert_eq!(config.view.default_tags, vec!["work", "home"]);
    }
}
