//! Migration configuration.

use caravel_dest::DestConfig;
use caravel_error::{CaravelResult, ConfigError};
use caravel_source::SourceConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the source basic-auth password.
pub const SOURCE_PASSWORD_VAR: &str = "CARAVEL_SOURCE_PASSWORD";
/// Environment variable holding the destination migration password.
pub const DEST_PASSWORD_VAR: &str = "CARAVEL_DEST_PASSWORD";

/// Top-level migration configuration, loaded from a TOML file.
///
/// Passwords never live in the file; they are injected from the environment
/// after parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationConfig {
    /// Root directory of the local cache
    #[serde(default = "default_cache_root")]
    pub cache_root: PathBuf,
    /// Source system connection settings
    pub source: SourceConfig,
    /// Destination system connection settings
    pub destination: DestConfig,
    /// Base URL of the comment attachment store
    pub asset_store: String,
}

fn default_cache_root() -> PathBuf {
    PathBuf::from(".cache")
}

impl MigrationConfig {
    /// Load configuration from a TOML file and fill in secrets from the
    /// environment.
    ///
    /// Missing secrets abort startup rather than surfacing later as
    /// authentication failures mid-run.
    pub fn from_file(path: impl AsRef<Path>) -> CaravelResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.source.password = require_env(SOURCE_PASSWORD_VAR)?;
        config.destination.password = require_env(DEST_PASSWORD_VAR)?;
        Ok(config)
    }

    /// Path of the identity mapping file.
    pub fn mapping_path(&self) -> PathBuf {
        self.cache_root.join("mapping.json")
    }

    /// Path of the video ownership table.
    pub fn ownership_path(&self) -> PathBuf {
        self.cache_root.join("mapping_video_user.json")
    }
}

fn require_env(var: &str) -> CaravelResult<String> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::new(format!("{} must be set", var)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let toml = r#"
            cache_root = "/tmp/caravel-cache"
            asset_store = "https://assets.example.org"

            [source]
            url = "https://records.example.org"
            bucket = "classea12"
            user = "migrator"

            [destination]
            url = "https://videos.example.org"
            user = "root"
            quarantine_review_user = "review"
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        // SAFETY: test-only environment mutation.
        unsafe {
            std::env::set_var(SOURCE_PASSWORD_VAR, "s3cret");
            std::env::set_var(DEST_PASSWORD_VAR, "s3cret");
        }
        let config = MigrationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source.bucket, "classea12");
        assert_eq!(config.destination.api_url(), "https://videos.example.org/api/v1");
        assert_eq!(
            config.mapping_path(),
            PathBuf::from("/tmp/caravel-cache/mapping.json")
        );
        assert_eq!(config.source.password, "s3cret");
    }

    #[test]
    fn cache_root_defaults() {
        let toml = r#"
            asset_store = "https://assets.example.org"

            [source]
            url = "https://records.example.org"
            bucket = "classea12"
            user = "migrator"

            [destination]
            url = "https://videos.example.org"
            user = "root"
        "#;
        let config: MigrationConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cache_root, PathBuf::from(".cache"));
        assert!(config.destination.quarantine_review_user.is_none());
    }
}
