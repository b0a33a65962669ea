//! secretsctl Library
//!
//! Command line client for a secrets-management service: resource
//! clients over HTTP, layered local configuration and table or JSON
//! output shared by every resource command.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::cli::command_set::{CommandSet, Confirmer, Verb};
pub use crate::cli::output::{ConsoleWriter, OutputFormat, OutputWriter};
pub use crate::core::client::ResourceClient;
pub use crate::core::invocation::{CommandFlags, CommandInvocation, Credential};
pub use crate::domain::config::{LocalConfig, SecretsConfig};
pub use crate::domain::error::{ClientError, SecretsError, SecretsResult};
pub use crate::domain::project::ProjectInfo;
pub use crate::domain::record::{Record, ResourceFields};
