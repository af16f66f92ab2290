use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::PoolConfig;
use crate::error::{ErrorCode, WoolError, WoolResult};

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("yml") | Some("yaml") => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl PoolConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> WoolResult<Self> {
        parse_config(content, ConfigFormat::Toml, Path::new("<inline>"))
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> WoolResult<Self> {
        parse_config(content, ConfigFormat::Yaml, Path::new("<inline>"))
    }

    /// Load from a `.toml`, `.yml` or `.yaml` file
    pub async fn load(path: impl AsRef<Path>) -> WoolResult<Self> {
        load_config(path).await
    }
}

/// Parse and validate a configuration document; `origin` only labels errors.
pub fn parse_config(content: &str, format: ConfigFormat, origin: &Path) -> WoolResult<PoolConfig> {
    let config: PoolConfig = match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
            WoolError::config_load(ErrorCode::CONFIG_INVALID_TOML, origin, e.to_string())
                .with_source(e)
        })?,
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            WoolError::config_load(ErrorCode::CONFIG_INVALID_YAML, origin, e.to_string())
                .with_source(e)
        })?,
    };
    config.validate()?;
    Ok(config)
}

/// Load a configuration file, choosing the format from its extension
pub async fn load_config(path: impl AsRef<Path>) -> WoolResult<PoolConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        WoolError::config_load(
            ErrorCode::CONFIG_UNSUPPORTED_FORMAT,
            path,
            "expected a .toml, .yml or .yaml file",
        )
    })?;

    let content = fs::read_to_string(path).await.map_err(|e| {
        let code = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorCode::CONFIG_NOT_FOUND
        } else {
            ErrorCode::CONFIG_GENERIC
        };
        WoolError::config_load(code, path, e.to_string()).with_source(e)
    })?;

    debug!("Loading pool configuration from {}", path.display());
    parse_config(&content, format, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResultOrder;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_str() {
        let config = PoolConfig::from_toml_str(
            r#"
            worker_count = 5
            job_queue_capacity = 32
            order = "sequence"
            timeout = "1m 30s"
            "#,
        )
        .unwrap();
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.job_queue_capacity, 32);
        assert_eq!(config.result_queue_capacity, 10);
        assert_eq!(config.order, ResultOrder::Sequence);
        assert_eq!(config.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_from_yaml_str() {
        let config =
            PoolConfig::from_yaml_str("worker_count: 2\nresult_queue_capacity: 4\n").unwrap();
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.result_queue_capacity, 4);
        assert_eq!(config.order, ResultOrder::Arrival);
    }

    #[test]
    fn test_invalid_values_are_rejected_after_parsing() {
        let err = PoolConfig::from_toml_str("worker_count = 0").unwrap_err();
        assert!(matches!(err, WoolError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PoolConfig::from_toml_str("worker_count = [").unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), None);
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pool.yaml");
        std::fs::write(&path, "worker_count: 7\ntimeout: 2s\n").unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.worker_count, 7);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_pool_config_load_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pool.toml");
        std::fs::write(&path, "worker_count = 3\norder = \"arrival\"\n").unwrap();

        let config = PoolConfig::load(&path).await.unwrap();
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.order, ResultOrder::Arrival);
        assert_eq!(config.timeout, None);
    }

    #[tokio::test]
    async fn test_load_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(temp_dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_load_config_unsupported_extension() {
        let err = load_config("pool.json").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_UNSUPPORTED_FORMAT);
    }
}
