use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A flat record returned by the API.
///
/// `HEADERS` fixes the table column order; `row` must return values in that
/// same order and with the same arity.
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Column headers, in display order
    const HEADERS: &'static [&'static str];

    /// Row values, index-aligned with `HEADERS`
    fn row(&self) -> Vec<String>;
}

/// Writable fields for create and update requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ResourceFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}
