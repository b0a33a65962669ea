use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// secretsctl configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Per-directory settings
    #[serde(default)]
    pub scopes: Vec<ScopeConfig>,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// API base URL
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// HTTP request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Settings that apply to commands run inside `path`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
}

impl ScopeConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.project.is_none() && self.api_host.is_none()
    }

    pub fn set(&mut self, key: ConfigKey, value: Option<String>) {
        match key {
            ConfigKey::Token => self.token = value,
            ConfigKey::Project => self.project = value,
            ConfigKey::ApiHost => self.api_host = value,
        }
    }
}

/// Settings that can be stored per scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Token,
    Project,
    ApiHost,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::Token => write!(f, "token"),
            ConfigKey::Project => write!(f, "project"),
            ConfigKey::ApiHost => write!(f, "api_host"),
        }
    }
}

impl SecretsConfig {
    /// Scope entry for `path`, created if missing
    pub fn scope_mut(&mut self, path: &str) -> &mut ScopeConfig {
        let index = match self.scopes.iter().position(|s| s.path == path) {
            Some(index) => index,
            None => {
                self.scopes.push(ScopeConfig {
                    path: path.to_string(),
                    ..Default::default()
                });
                self.scopes.len() - 1
            }
        };
        &mut self.scopes[index]
    }

    /// Drop scope entries that no longer hold any setting
    pub fn prune_scopes(&mut self) {
        self.scopes.retain(|s| !s.is_empty());
    }
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

pub fn default_api_host() -> String {
    "https://api.secretsctl.dev".to_string()
}

fn default_timeout() -> u64 {
    10_000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_host: default_api_host(),
            timeout_ms: default_timeout(),
        }
    }
}

/// Where a resolved setting came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Flag,
    Environment,
    ConfigFile { scope: String },
    Default,
    Unset,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Flag => write!(f, "flag"),
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::ConfigFile { scope } => write!(f, "config file ({})", scope),
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Unset => write!(f, "unset"),
        }
    }
}

/// A resolved setting and its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub value: Option<String>,
    pub source: ConfigSource,
}

impl ConfigValue {
    pub fn new(value: impl Into<String>, source: ConfigSource) -> Self {
        Self {
            value: Some(value.into()),
            source,
        }
    }

    pub fn unset() -> Self {
        Self {
            value: None,
            source: ConfigSource::Unset,
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Configuration resolved once per process and passed to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    pub token: ConfigValue,
    pub project: ConfigValue,
    pub api_host: ConfigValue,
    pub timeout: Duration,
}
