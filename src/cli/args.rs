use crate::core::invocation::CommandFlags;
use crate::domain::config::ConfigKey;
use crate::infrastructure::config::SettingOverrides;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Command line arguments for secretsctl
#[derive(Parser, Debug)]
#[command(
    name = "secretsctl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage projects on a secrets-management service",
    long_about = "A command line client for a secrets-management service. Lists, inspects, creates, updates and deletes projects, printing tables for people and JSON for scripts."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub configuration: Option<String>,

    /// API token
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_host: Option<String>,

    /// Directory used to select scoped configuration (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub scope: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Settings given on the command line
    pub fn setting_overrides(&self) -> SettingOverrides {
        let project = match &self.command {
            Command::Projects(ProjectsArgs {
                command: Some(ProjectsCommand::Get { project, .. }),
                ..
            }) => project.clone(),
            _ => None,
        };
        SettingOverrides {
            token: self.token.clone(),
            project,
            api_host: self.api_host.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List and manage projects
    Projects(ProjectsArgs),
    /// Show and edit local configuration
    Configure(ConfigureArgs),
}

/// Arguments for `secretsctl projects`
#[derive(ClapArgs, Debug)]
pub struct ProjectsArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Projects subcommand (lists projects when omitted)
    #[command(subcommand)]
    pub command: Option<ProjectsCommand>,
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// Get info for a project
    Get {
        /// Project id (defaults to the configured project)
        project_id: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Project id, used when no positional id is given
        #[arg(long, value_name = "ID")]
        project: Option<String>,
    },
    /// Create a project
    Create {
        /// Project name
        name: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Don't output the response
        #[arg(long)]
        silent: bool,
        /// Project name, used when no positional name is given
        #[arg(long = "name", value_name = "NAME")]
        name_flag: Option<String>,
        /// Project description
        #[arg(long, value_name = "DESCRIPTION")]
        description: Option<String>,
    },
    /// Delete a project
    Delete {
        /// Project id (defaults to the configured project)
        project_id: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Don't output the remaining projects
        #[arg(long)]
        silent: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Update a project
    Update {
        /// Project id (defaults to the configured project)
        project_id: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Don't output the response
        #[arg(long)]
        silent: bool,
        /// New project name (required)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// New project description (required)
        #[arg(long, value_name = "DESCRIPTION")]
        description: Option<String>,
    },
}

impl ProjectsCommand {
    /// Positional identifier or name, and the typed flags
    pub fn into_parts(self) -> (Option<String>, CommandFlags) {
        match self {
            ProjectsCommand::Get { project_id, json, .. } => (
                project_id,
                CommandFlags {
                    json,
                    ..Default::default()
                },
            ),
            ProjectsCommand::Create {
                name,
                json,
                silent,
                name_flag,
                description,
            } => (
                name,
                CommandFlags {
                    json,
                    silent,
                    name: name_flag,
                    description,
                    ..Default::default()
                },
            ),
            ProjectsCommand::Delete {
                project_id,
                json,
                silent,
                yes,
            } => (
                project_id,
                CommandFlags {
                    json,
                    silent,
                    yes,
                    ..Default::default()
                },
            ),
            ProjectsCommand::Update {
                project_id,
                json,
                silent,
                name,
                description,
            } => (
                project_id,
                CommandFlags {
                    json,
                    silent,
                    name,
                    description,
                    ..Default::default()
                },
            ),
        }
    }
}

/// Arguments for `secretsctl configure`
#[derive(ClapArgs, Debug)]
pub struct ConfigureArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Configure subcommand (shows resolved settings when omitted)
    #[command(subcommand)]
    pub command: Option<ConfigureCommand>,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigureCommand {
    /// Save settings for a directory scope
    Set {
        /// Settings as KEY=VALUE (keys: token, project, api-host)
        #[arg(required = true, value_name = "KEY=VALUE", value_parser = parse_setting)]
        settings: Vec<(ConfigKey, String)>,
    },
    /// Remove settings from a directory scope
    Unset {
        /// Keys to remove
        #[arg(required = true, value_enum)]
        keys: Vec<ConfigKeyArg>,
    },
}

/// Configuration key argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ConfigKeyArg {
    Token,
    Project,
    ApiHost,
}

fn parse_setting(raw: &str) -> Result<(ConfigKey, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = ConfigKeyArg::from_str(key.trim(), true)
        .or_else(|_| ConfigKeyArg::from_str(&key.trim().replace('_', "-"), true))
        .map_err(|_| format!("unknown setting '{}'", key))?;
    Ok((key.into(), value.to_string()))
}

impl From<ConfigKeyArg> for ConfigKey {
    fn from(key: ConfigKeyArg) -> Self {
        match key {
            ConfigKeyArg::Token => Self::Token,
            ConfigKeyArg::Project => Self::Project,
            ConfigKeyArg::ApiHost => Self::ApiHost,
        }
    }
}
