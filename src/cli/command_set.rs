use crate::cli::output::{OutputFormat, OutputWriter};
use crate::core::client::ResourceClient;
use crate::core::invocation::{CommandFlags, CommandInvocation};
use crate::domain::error::{SecretsError, SecretsResult};
use crate::domain::record::ResourceFields;
use tracing::{debug, info};

/// CRUD verbs exposed for every resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// Asks the operator before a destructive action
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> SecretsResult<bool>;
}

/// Confirms everything; used for `--yes` and non-interactive runs
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &str) -> SecretsResult<bool> {
        Ok(true)
    }
}

/// One command per verb over a resource client and an output writer.
pub struct CommandSet<C, W> {
    client: C,
    writer: W,
    confirmer: Box<dyn Confirmer>,
}

impl<C, W> CommandSet<C, W>
where
    C: ResourceClient,
    W: OutputWriter,
{
    pub fn new(client: C, writer: W) -> Self {
        Self {
            client,
            writer,
            confirmer: Box::new(AssumeYes),
        }
    }

    pub fn with_confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run one verb to completion. Client and output failures are returned as-is.
    pub async fn execute(&mut self, verb: Verb, invocation: &CommandInvocation) -> SecretsResult<()> {
        debug!(?verb, resource = self.client.resource_name(), "executing command");
        match verb {
            Verb::List => self.list(invocation).await,
            Verb::Get => self.get(invocation).await,
            Verb::Create => self.create(invocation).await,
            Verb::Update => self.update(invocation).await,
            Verb::Delete => self.delete(invocation).await,
        }
    }

    async fn list(&mut self, invocation: &CommandInvocation) -> SecretsResult<()> {
        let records = self.client.list().await?;
        self.writer.write_records(&records, format_of(invocation))?;
        Ok(())
    }

    async fn get(&mut self, invocation: &CommandInvocation) -> SecretsResult<()> {
        let id = invocation.resolved_identifier(self.client.resource_name())?;
        let record = self.client.get(id).await?;
        self.writer.write_record(&record, format_of(invocation))?;
        Ok(())
    }

    async fn create(&mut self, invocation: &CommandInvocation) -> SecretsResult<()> {
        let flags = &invocation.flags;
        let fields = create_fields(invocation.positional.as_deref(), flags)?;

        let record = self.client.create(&fields).await?;
        info!(resource = self.client.resource_name(), name = %fields.name, "created");

        if !flags.silent {
            self.writer.write_record(&record, format_of(invocation))?;
        }
        Ok(())
    }

    async fn update(&mut self, invocation: &CommandInvocation) -> SecretsResult<()> {
        let flags = &invocation.flags;
        let fields = update_fields(flags)?;
        let id = invocation.resolved_identifier(self.client.resource_name())?;

        let record = self.client.update(id, &fields).await?;
        info!(resource = self.client.resource_name(), id, "updated");

        if !flags.silent {
            self.writer.write_record(&record, format_of(invocation))?;
        }
        Ok(())
    }

    async fn delete(&mut self, invocation: &CommandInvocation) -> SecretsResult<()> {
        let flags = &invocation.flags;
        let id = invocation.resolved_identifier(self.client.resource_name())?;

        if !flags.yes {
            let prompt = format!("Delete {} '{}'?", self.client.resource_name(), id);
            if !self.confirmer.confirm(&prompt)? {
                return Err(SecretsError::Cancelled);
            }
        }

        self.client.delete(id).await?;
        info!(resource = self.client.resource_name(), id, "deleted");

        // Show what remains. This read races with other writers and is only feedback.
        if !flags.silent {
            let records = self.client.list().await?;
            self.writer.write_records(&records, format_of(invocation))?;
        }
        Ok(())
    }
}

/// Reject missing required flags before any credential or network work.
pub fn check_required_flags(verb: Verb, positional: Option<&str>, flags: &CommandFlags) -> SecretsResult<()> {
    match verb {
        Verb::Create => create_fields(positional, flags).map(|_| ()),
        Verb::Update => update_fields(flags).map(|_| ()),
        Verb::List | Verb::Get | Verb::Delete => Ok(()),
    }
}

// A positional name takes precedence over --name.
fn create_fields(positional: Option<&str>, flags: &CommandFlags) -> SecretsResult<ResourceFields> {
    let name = positional
        .or(flags.name.as_deref())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SecretsError::missing_flags(&["name"]))?;
    Ok(ResourceFields::new(name, flags.description.clone().unwrap_or_default()))
}

fn update_fields(flags: &CommandFlags) -> SecretsResult<ResourceFields> {
    match (&flags.name, &flags.description) {
        (Some(name), Some(description)) => Ok(ResourceFields::new(name.clone(), description.clone())),
        (None, Some(_)) => Err(SecretsError::missing_flags(&["name"])),
        (Some(_), None) => Err(SecretsError::missing_flags(&["description"])),
        (None, None) => Err(SecretsError::missing_flags(&["name", "description"])),
    }
}

fn format_of(invocation: &CommandInvocation) -> OutputFormat {
    OutputFormat::from_json_flag(invocation.flags.json)
}
