use crate::domain::config::{
    ConfigSource, ConfigValue, GlobalConfig, LocalConfig, ScopeConfig, SecretsConfig,
};
use crate::domain::error::{SecretsError, SecretsResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const TOKEN_ENV: &str = "SECRETSCTL_TOKEN";
pub const PROJECT_ENV: &str = "SECRETSCTL_PROJECT";
pub const API_HOST_ENV: &str = "SECRETSCTL_API_HOST";

/// Loads and saves the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the default config file under the user's home directory
    pub fn new() -> SecretsResult<Self> {
        Ok(Self {
            config_path: Self::default_config_path()?,
        })
    }

    /// Manager for an explicit config file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Default config file location
    fn default_config_path() -> SecretsResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SecretsError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("secretsctl").join("config.toml"))
    }

    /// Load the config file; a missing file yields the default configuration
    pub fn load_config(&self) -> SecretsResult<SecretsConfig> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(SecretsConfig::default());
        }
        self.load_config_from_path(&self.config_path)
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> SecretsResult<SecretsConfig> {
        let content = fs::read_to_string(path).map_err(|e| SecretsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| SecretsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save to the managed config file, creating its directory
    pub fn save_config(&self, config: &SecretsConfig) -> SecretsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SecretsError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }
        self.save_config_to_path(&self.config_path, config)
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &SecretsConfig) -> SecretsResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| SecretsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SecretsError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }
}

/// One layer of setting overrides (command line flags or environment)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingOverrides {
    pub token: Option<String>,
    pub project: Option<String>,
    pub api_host: Option<String>,
}

impl SettingOverrides {
    /// Read overrides from `SECRETSCTL_*` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            token: lookup(TOKEN_ENV),
            project: lookup(PROJECT_ENV),
            api_host: lookup(API_HOST_ENV),
        }
    }
}

/// Resolves the active settings for a directory.
///
/// Per setting the first non-empty value wins: flag, environment, the most
/// specific scope containing the directory that sets it, then the global
/// default.
pub struct ConfigResolver<'a> {
    config: &'a SecretsConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(config: &'a SecretsConfig) -> Self {
        Self { config }
    }

    /// Scopes containing `dir`, most specific first
    pub fn matching_scopes(&self, dir: &Path) -> Vec<&'a ScopeConfig> {
        let mut scopes: Vec<&'a ScopeConfig> = self
            .config
            .scopes
            .iter()
            .filter(|scope| dir.starts_with(Path::new(&scope.path)))
            .collect();
        scopes.sort_by_key(|scope| std::cmp::Reverse(Path::new(&scope.path).components().count()));
        scopes
    }

    pub fn resolve(
        &self,
        dir: &Path,
        flags: &SettingOverrides,
        env: &SettingOverrides,
    ) -> LocalConfig {
        let scopes = self.matching_scopes(dir);
        debug!(dir = %dir.display(), matched = scopes.len(), "resolving configuration");
        let global: &GlobalConfig = &self.config.global;

        let scoped = |get: fn(&ScopeConfig) -> Option<&str>| {
            scopes
                .iter()
                .find_map(|&s| get(s).filter(|v| !v.is_empty()).map(|v| (v, s.path.as_str())))
        };

        let token = pick(
            flags.token.as_deref(),
            env.token.as_deref(),
            scoped(|s| s.token.as_deref()),
            None,
        );
        let project = pick(
            flags.project.as_deref(),
            env.project.as_deref(),
            scoped(|s| s.project.as_deref()),
            None,
        );
        let api_host = pick(
            flags.api_host.as_deref(),
            env.api_host.as_deref(),
            scoped(|s| s.api_host.as_deref()),
            Some(global.api_host.as_str()),
        );

        LocalConfig {
            token,
            project,
            api_host,
            timeout: Duration::from_millis(global.timeout_ms),
        }
    }
}

fn pick(
    flag: Option<&str>,
    env: Option<&str>,
    scoped: Option<(&str, &str)>,
    default: Option<&str>,
) -> ConfigValue {
    let non_empty = |v: &&str| !v.is_empty();

    if let Some(value) = flag.filter(non_empty) {
        return ConfigValue::new(value, ConfigSource::Flag);
    }
    if let Some(value) = env.filter(non_empty) {
        return ConfigValue::new(value, ConfigSource::Environment);
    }
    if let Some((value, scope)) = scoped {
        return ConfigValue::new(
            value,
            ConfigSource::ConfigFile {
                scope: scope.to_string(),
            },
        );
    }
    match default {
        Some(value) => ConfigValue::new(value, ConfigSource::Default),
        None => ConfigValue::unset(),
    }
}

/// Absolute form of a scope directory, relative paths taken from `cwd`
pub fn normalize_scope(scope: &Path, cwd: &Path) -> PathBuf {
    let absolute = if scope.is_absolute() {
        scope.to_path_buf()
    } else {
        cwd.join(scope)
    };
    fs::canonicalize(&absolute).unwrap_or(absolute)
}
