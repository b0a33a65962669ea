use crate::domain::error::{SecretsError, SecretsResult};
use std::fmt;

/// Typed flags shared by every resource command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFlags {
    pub json: bool,
    pub silent: bool,
    pub yes: bool,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Bearer credential; never printed in full
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First few characters followed by an ellipsis
    pub fn masked(&self) -> String {
        mask_token(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.masked())
    }
}

pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(6).collect();
    if visible.len() == token.len() {
        "*".repeat(token.chars().count())
    } else {
        format!("{}…", visible)
    }
}

/// Everything one command execution needs, resolved up front.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub credential: Credential,
    /// Identifier given on the command line
    pub positional: Option<String>,
    /// Identifier from flags, environment or config file
    pub configured: Option<String>,
    pub flags: CommandFlags,
}

impl CommandInvocation {
    pub fn new(credential: Credential, flags: CommandFlags) -> Self {
        Self {
            credential,
            positional: None,
            configured: None,
            flags,
        }
    }

    pub fn with_positional(mut self, positional: Option<String>) -> Self {
        self.positional = positional.filter(|p| !p.is_empty());
        self
    }

    pub fn with_configured(mut self, configured: Option<String>) -> Self {
        self.configured = configured.filter(|c| !c.is_empty());
        self
    }

    /// Effective identifier: the positional argument wins over the configured default.
    pub fn resolved_identifier(&self, resource: &str) -> SecretsResult<&str> {
        resolve_identifier(self.positional.as_deref(), self.configured.as_deref()).ok_or_else(|| {
            SecretsError::ConfigResolution {
                message: format!(
                    "No {resource} specified. Pass it as an argument or configure a default {resource}."
                ),
            }
        })
    }
}

pub fn resolve_identifier<'a>(positional: Option<&'a str>, configured: Option<&'a str>) -> Option<&'a str> {
    positional.or(configured)
}
