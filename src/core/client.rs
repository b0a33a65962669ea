use crate::domain::error::ClientError;
use crate::domain::record::{Record, ResourceFields};
use async_trait::async_trait;

pub type ClientResult<T> = Result<T, ClientError>;

/// CRUD operations against one remote resource type.
///
/// Each call is a single request: it either succeeds completely or fails
/// with a `ClientError`. Credentials are bound when the client is built.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Record type returned by this resource
    type Record: Record;

    /// Resource name used in prompts and logs, e.g. "project"
    fn resource_name(&self) -> &'static str;

    /// List every record visible to the credential, in server order
    async fn list(&self) -> ClientResult<Vec<Self::Record>>;

    /// Fetch one record
    async fn get(&self, id: &str) -> ClientResult<Self::Record>;

    /// Create a record
    async fn create(&self, fields: &ResourceFields) -> ClientResult<Self::Record>;

    /// Replace the writable fields of a record
    async fn update(&self, id: &str, fields: &ResourceFields) -> ClientResult<Self::Record>;

    /// Delete a record
    async fn delete(&self, id: &str) -> ClientResult<()>;
}
