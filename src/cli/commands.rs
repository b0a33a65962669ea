use crate::cli::args::{
    Args, Command, ConfigureArgs, ConfigureCommand, ProjectsArgs, ProjectsCommand,
};
use crate::cli::command_set::{check_required_flags, CommandSet, Confirmer, Verb};
use crate::cli::output::{ConsoleWriter, OutputFormat, OutputWriter};
use crate::core::invocation::{mask_token, CommandFlags, CommandInvocation, Credential};
use crate::domain::config::{ConfigKey, ConfigValue, LocalConfig};
use crate::domain::error::{SecretsError, SecretsResult};
use crate::domain::record::Record;
use crate::infrastructure::config::{
    normalize_scope, ConfigManager, ConfigResolver, SettingOverrides, TOKEN_ENV,
};
use crate::infrastructure::http::{ApiClient, HttpResourceClient, Projects};
use crate::infrastructure::logging::init_logging;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute CLI command
pub async fn execute_command(args: Args) -> SecretsResult<()> {
    let config_manager = match &args.configuration {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let file_config = config_manager.load_config()?;

    if !args.quiet {
        init_logging(&file_config.global.log_level, args.verbose)?;
    }
    debug!(path = %config_manager.config_path().display(), "loaded configuration");

    let scope_dir = scope_dir(args.scope.as_deref())?;
    let local_config = ConfigResolver::new(&file_config).resolve(
        &scope_dir,
        &args.setting_overrides(),
        &SettingOverrides::from_env(),
    );

    match args.command {
        Command::Projects(projects_args) => execute_projects_command(projects_args, &local_config).await,
        Command::Configure(configure_args) => {
            execute_configure_command(configure_args, &local_config, &config_manager, scope_dir)
        }
    }
}

async fn execute_projects_command(args: ProjectsArgs, config: &LocalConfig) -> SecretsResult<()> {
    let (verb, positional, flags) = match args.command {
        None => (
            Verb::List,
            None,
            CommandFlags {
                json: args.json,
                ..Default::default()
            },
        ),
        Some(command) => {
            let verb = match &command {
                ProjectsCommand::Get { .. } => Verb::Get,
                ProjectsCommand::Create { .. } => Verb::Create,
                ProjectsCommand::Update { .. } => Verb::Update,
                ProjectsCommand::Delete { .. } => Verb::Delete,
            };
            let (positional, flags) = command.into_parts();
            (verb, positional, flags)
        }
    };

    check_required_flags(verb, positional.as_deref(), &flags)?;

    let invocation = CommandInvocation::new(require_token(config)?, flags)
        .with_positional(positional)
        .with_configured(config.project.value.clone());

    let api_host = config
        .api_host
        .as_deref()
        .ok_or_else(|| SecretsError::ConfigResolution {
            message: "No API host configured".to_string(),
        })?;
    let api = ApiClient::new(api_host, invocation.credential.clone(), config.timeout)?;

    let mut commands = CommandSet::new(HttpResourceClient::<Projects>::new(api), ConsoleWriter::stdout())
        .with_confirmer(Box::new(TerminalConfirmer));
    commands.execute(verb, &invocation).await
}

/// Credential from the resolved configuration
pub fn require_token(config: &LocalConfig) -> SecretsResult<Credential> {
    config
        .token
        .as_deref()
        .map(Credential::new)
        .ok_or_else(|| SecretsError::ConfigResolution {
            message: format!(
                "You must provide a token with --token, {} or `secretsctl configure set token=<token>`",
                TOKEN_ENV
            ),
        })
}

fn scope_dir(scope: Option<&str>) -> SecretsResult<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| SecretsError::Config {
        message: format!("Failed to get current directory: {}", e),
    })?;
    Ok(match scope {
        Some(scope) => normalize_scope(Path::new(scope), &cwd),
        None => normalize_scope(&cwd, &cwd),
    })
}

fn execute_configure_command(
    args: ConfigureArgs,
    config: &LocalConfig,
    config_manager: &ConfigManager,
    scope_dir: PathBuf,
) -> SecretsResult<()> {
    let mut writer = ConsoleWriter::stdout();
    let format = OutputFormat::from_json_flag(args.json);
    let scope = scope_dir.to_string_lossy().into_owned();

    match args.command {
        None => {
            writer.write_records(&config_rows(config, args.json), format)?;
            Ok(())
        }
        Some(ConfigureCommand::Set { settings }) => {
            let mut file_config = config_manager.load_config()?;
            let entry = file_config.scope_mut(&scope);
            for (key, value) in settings {
                entry.set(key, Some(value).filter(|v| !v.is_empty()));
            }
            file_config.prune_scopes();
            config_manager.save_config(&file_config)?;
            writer.write_message(&format!("Saved configuration for scope '{}'", scope), format)?;
            Ok(())
        }
        Some(ConfigureCommand::Unset { keys }) => {
            let mut file_config = config_manager.load_config()?;
            let entry = file_config.scope_mut(&scope);
            for key in keys {
                entry.set(ConfigKey::from(key), None);
            }
            file_config.prune_scopes();
            config_manager.save_config(&file_config)?;
            writer.write_message(&format!("Removed settings from scope '{}'", scope), format)?;
            Ok(())
        }
    }
}

/// One resolved setting as shown by `configure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRow {
    pub name: String,
    pub value: String,
    pub source: String,
}

impl Record for ConfigRow {
    const HEADERS: &'static [&'static str] = &["name", "value", "source"];

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.value.clone(), self.source.clone()]
    }
}

/// Resolved settings as rows; the token is masked unless `reveal` is set.
pub fn config_rows(config: &LocalConfig, reveal: bool) -> Vec<ConfigRow> {
    let row = |key: ConfigKey, value: &ConfigValue, mask: bool| ConfigRow {
        name: key.to_string(),
        value: match value.as_deref() {
            Some(v) if mask => mask_token(v),
            Some(v) => v.to_string(),
            None => String::new(),
        },
        source: value.source.to_string(),
    };

    vec![
        row(ConfigKey::Token, &config.token, !reveal),
        row(ConfigKey::Project, &config.project, false),
        row(ConfigKey::ApiHost, &config.api_host, false),
    ]
}

/// Prompts on stderr when stdin is a terminal; otherwise proceeds
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> SecretsResult<bool> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return Ok(true);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{} (y/N) ", prompt)?;
        stderr.flush()?;

        let mut answer = String::new();
        stdin.lock().read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::ConfigSource;
    use std::time::Duration;

    fn local_config() -> LocalConfig {
        LocalConfig {
            token: ConfigValue::new("st_0123456789", ConfigSource::Environment),
            project: ConfigValue::unset(),
            api_host: ConfigValue::new("https://api.example.test", ConfigSource::Default),
            timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_require_token() {
        let config = local_config();
        assert_eq!(require_token(&config).unwrap().expose(), "st_0123456789");

        let mut missing = local_config();
        missing.token = ConfigValue::unset();
        let err = require_token(&missing).unwrap_err();
        assert!(matches!(err, SecretsError::ConfigResolution { .. }));
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn test_config_rows_mask_token() {
        let rows = config_rows(&local_config(), false);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "token");
        assert_eq!(rows[0].value, "st_012…");
        assert_eq!(rows[0].source, "environment");
        assert_eq!(rows[1].value, "");
        assert_eq!(rows[1].source, "unset");
        assert_eq!(rows[2].name, "api_host");

        let revealed = config_rows(&local_config(), true);
        assert_eq!(revealed[0].value, "st_0123456789");
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }
}
