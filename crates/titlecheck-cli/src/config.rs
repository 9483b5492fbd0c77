//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File configuration for titlecheck
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub store: StoreConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("input.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("output.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of `<identifier>.xml` documents; may be a `${VAR}` reference
    #[serde(deserialize_with = "deserialize_env_path")]
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/content"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 0 or unset = process every record
    pub max_records: usize,
}

/// Deserialize a path that may be an environment variable reference like ${VAR}
fn deserialize_env_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    expand_env_var(&raw).map(PathBuf::from).ok_or_else(|| {
        serde::de::Error::custom(format!("environment variable in {raw:?} is not set"))
    })
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./titlecheck.toml (current directory)
    /// 2. ~/.config/titlecheck/config.toml (platform equivalent)
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("titlecheck.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "titlecheck") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Pipeline configuration from file values, before CLI overrides
    pub fn audit_config(&self) -> titlecheck_audit::Config {
        titlecheck_audit::Config {
            input_file: self.input.file.clone(),
            output_file: self.output.file.clone(),
            content_root: self.store.root.clone(),
            max_records: Some(self.run.max_records).filter(|&n| n > 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.input.file, PathBuf::from("input.csv"));
        assert_eq!(config.output.file, PathBuf::from("output.csv"));
        assert_eq!(config.store.root, PathBuf::from("data/content"));
        assert_eq!(config.run.max_records, 0);
        assert!(config.audit_config().max_records.is_none());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("TITLECHECK_TEST_ROOT", "/srv/content");
        assert_eq!(
            expand_env_var("${TITLECHECK_TEST_ROOT}"),
            Some("/srv/content".to_string())
        );
        std::env::remove_var("TITLECHECK_TEST_ROOT");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[input]
file = "data/query_result.csv"

[output]
file = "/tmp/titles.csv"

[store]
root = "../ai_detect/data/content"

[run]
max_records = 500
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.file, PathBuf::from("data/query_result.csv"));
        assert_eq!(config.store.root, PathBuf::from("../ai_detect/data/content"));

        let audit = config.audit_config();
        assert_eq!(audit.output_file, PathBuf::from("/tmp/titles.csv"));
        assert_eq!(audit.max_records, Some(500));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[run]\nmax_records = 10\n").unwrap();
        assert_eq!(config.input.file, PathBuf::from("input.csv"));
        assert_eq!(config.run.max_records, 10);
    }

    #[test]
    fn unset_store_variable_is_an_error() {
        let toml = "[store]\nroot = \"${NONEXISTENT_VAR_67890}\"\n";
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("titlecheck.toml");
        std::fs::write(&path, "[output]\nfile = \"out.csv\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.file, PathBuf::from("out.csv"));
    }
}
