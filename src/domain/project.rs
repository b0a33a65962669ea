use crate::domain::record::Record;
use serde::{Deserialize, Deserializer, Serialize};

/// Project as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub setup_at: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

// The API sends `null` for projects that were never set up.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Record for ProjectInfo {
    const HEADERS: &'static [&'static str] = &["id", "name", "description", "setup_at", "created_at"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.description.clone(),
            self.setup_at.clone(),
            self.created_at.clone(),
        ]
    }
}
