//! TOML configuration for the search client and the `hn` binary.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! client pointed at the public endpoint.
//!
//! ```toml
//! [client]
//! base_url = "https://hn.algolia.com/api/v1"
//! user_agent = "hn-search/0.1.0"
//! timeout_secs = 30
//!
//! [search]
//! hits_per_page = 20
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Largest page size the service accepts.
pub const MAX_HITS_PER_PAGE: u32 = 1000;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://hn.algolia.com/api/v1".to_string()
}
fn default_user_agent() -> String {
    format!("hn-search/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchConfig {
    /// Page size sent when the caller does not pick one.
    #[serde(default)]
    pub hits_per_page: Option<u32>,
}

impl Config {
    /// Check value ranges that the type system does not cover.
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.client.base_url)
            .with_context(|| format!("client.base_url is not a URL: {}", self.client.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("client.base_url must use http or https");
        }

        if self.client.timeout_secs == 0 {
            anyhow::bail!("client.timeout_secs must be > 0");
        }

        if self.client.user_agent.trim().is_empty() {
            anyhow::bail!("client.user_agent must not be empty");
        }

        if let Some(n) = self.search.hits_per_page {
            if n > MAX_HITS_PER_PAGE {
                anyhow::bail!("search.hits_per_page must be <= {}", MAX_HITS_PER_PAGE);
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.client.base_url, "https://hn.algolia.com/api/v1");
        assert_eq!(config.client.timeout_secs, 30);
        assert!(config.client.user_agent.starts_with("hn-search/"));
        assert_eq!(config.search.hits_per_page, None);
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"
[client]
base_url = "http://localhost:8080/api/v1"
user_agent = "test-agent"
timeout_secs = 5

[search]
hits_per_page = 50
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.client.base_url, "http://localhost:8080/api/v1");
        assert_eq!(config.client.user_agent, "test-agent");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.search.hits_per_page, Some(50));
    }

    #[test]
    fn test_rejects_bad_values() {
        for content in [
            "[client]\ntimeout_secs = 0",
            "[client]\nbase_url = \"not a url\"",
            "[client]\nbase_url = \"ftp://example.com\"",
            "[client]\nuser_agent = \"  \"",
            "[search]\nhits_per_page = 5000",
        ] {
            let file = write_config(content);
            assert!(load_config(file.path()).is_err(), "{} should fail", content);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/hn.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }
}
