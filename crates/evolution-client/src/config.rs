//! Configuration management
//!
//! Settings are read with the following precedence:
//! 1. Environment variables
//! 2. `evolution-client.toml`
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the TOML file is expanded from the environment.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::delay::SendDelay;
use crate::error::{EvolutionError, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "evolution-client.toml";

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Evolution API server
    pub url: String,

    /// Global API key
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Instance to select at startup
    #[serde(default)]
    pub instance: Option<String>,

    /// Per-request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Bulk send throttling
    #[serde(default)]
    pub delay: SendDelay,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Check that the settings needed to reach the server are present
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(EvolutionError::Config("EVOLUTION_API_URL not set".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(EvolutionError::Config("EVOLUTION_API_KEY not set".to_string()));
        }
        Ok(())
    }

    /// Load from `./evolution-client.toml` when present, else from the environment
    pub fn load() -> Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }
        Self::from_env()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EvolutionError::Config(format!("Failed to read config file: {}", e)))?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, expanding `${VAR}` references first
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content);
        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| EvolutionError::Config(format!("Failed to parse TOML: {}", e)))?;
        Ok(Self::from_toml_config(toml))
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let api = toml.api.unwrap_or_default();
        let delay = toml.delay.unwrap_or_default();
        let defaults = SendDelay::default();

        Self {
            url: api.url.unwrap_or_default(),
            api_key: api.key.unwrap_or_default(),
            instance: api.instance,
            timeout_secs: api.timeout_secs,
            delay: SendDelay {
                min: delay.min.unwrap_or(defaults.min),
                max: delay.max.unwrap_or(defaults.max),
                const_rounds: delay.const_rounds.unwrap_or(defaults.const_rounds),
            },
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EVOLUTION_API_URL") {
            if !url.is_empty() {
                self.url = url;
            }
        }
        if let Ok(key) = std::env::var("EVOLUTION_API_KEY") {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
        if let Ok(instance) = std::env::var("EVOLUTION_INSTANCE") {
            if !instance.is_empty() {
                self.instance = Some(instance);
            }
        }
        if let Some(secs) = env_number("EVOLUTION_TIMEOUT_SECS") {
            self.timeout_secs = Some(u64::from(secs));
        }
        if let Some(min) = env_number("EVOLUTION_DELAY_MIN") {
            self.delay.min = min;
        }
        if let Some(max) = env_number("EVOLUTION_DELAY_MAX") {
            self.delay.max = max;
        }
        if let Some(rounds) = env_number("EVOLUTION_DELAY_CONST") {
            self.delay.const_rounds = rounds;
        }
    }
}

fn env_number(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

static ENV_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").expect("valid env reference pattern"));

/// Replace `${VAR_NAME}` with the variable's value; unset variables become empty.
fn expand_env_vars(value: &str) -> String {
    ENV_REFERENCE
        .replace_all(value, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    api: Option<TomlApiConfig>,
    delay: Option<TomlDelayConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    instance: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlDelayConfig {
    #[serde(default)]
    min: Option<u32>,
    #[serde(default)]
    max: Option<u32>,
    #[serde(default)]
    const_rounds: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert!(config.url.is_empty());
        assert!(config.instance.is_none());
        assert!(config.timeout().is_none());
        assert_eq!(config.delay, SendDelay::default());
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().validate().is_err());
        assert!(ClientConfig::new("https://evo.example.com", "").validate().is_err());
        assert!(ClientConfig::new("https://evo.example.com", "key").validate().is_ok());
    }

    #[test]
    fn test_api_key_from_env_reference() {
        unsafe {
            std::env::set_var("EVOLUTION_CLIENT_TEST_KEY", "secret-from-env");
        }

        let content = r#"
[api]
url = "https://evo.example.com"
key = "${EVOLUTION_CLIENT_TEST_KEY}"
"#;
        let config = ClientConfig::from_toml_str(content).unwrap();
        assert_eq!(config.api_key, "secret-from-env");
        assert!(config.validate().is_ok());

        unsafe {
            std::env::remove_var("EVOLUTION_CLIENT_TEST_KEY");
        }
    }

    #[test]
    fn test_unset_reference_leaves_key_empty() {
        let content = r#"
[api]
url = "https://evo.example.com"
key = "${EVOLUTION_CLIENT_UNSET_KEY}"
"#;
        let config = ClientConfig::from_toml_str(content).unwrap();
        assert!(config.api_key.is_empty());
        assert!(matches!(config.validate(), Err(EvolutionError::Config(_))));
    }

    #[test]
    fn test_dollar_without_braces_is_literal() {
        let content = r#"
[api]
url = "https://evo.example.com/$path"
key = "k$y"
"#;
        let config = ClientConfig::from_toml_str(content).unwrap();
        assert_eq!(config.url, "https://evo.example.com/$path");
        assert_eq!(config.api_key, "k$y");
    }

    #[test]
    fn test_toml_parsing() {
        let content = r#"
[api]
url = "https://evo.example.com"
key = "global-key"
instance = "bot1"
timeout_secs = 30

[delay]
min = 2
max = 20
"#;
        let config = ClientConfig::from_toml_str(content).unwrap();
        assert_eq!(config.url, "https://evo.example.com");
        assert_eq!(config.api_key, "global-key");
        assert_eq!(config.instance.as_deref(), Some("bot1"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.delay.min, 2);
        assert_eq!(config.delay.max, 20);
        assert_eq!(config.delay.const_rounds, 10);
    }

    #[test]
    fn test_toml_empty_file() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert!(config.url.is_empty());
        assert_eq!(config.delay, SendDelay::default());
    }

    #[test]
    fn test_toml_invalid() {
        let result = ClientConfig::from_toml_str("[api\nurl = ");
        assert!(matches!(result, Err(EvolutionError::Config(_))));
    }
}
